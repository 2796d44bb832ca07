//! Image asset storage.
//!
//! Uploaded product images live in a flat directory and are addressed by
//! generated filenames, never by client-supplied names. Asset lifetime is
//! derived from record lifetime: every repository mutation that changes or
//! removes an image goes through exactly one of [`ImageStore::store`],
//! [`ImageStore::replace`] or [`ImageStore::release`].

use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extensions and MIME types accepted for product images.
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Errors produced by the asset store.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The upload is not an accepted image format.
    #[error("unsupported media type: {mime} ({name})")]
    UnsupportedMediaType { mime: String, name: String },
    /// The upload exceeds the configured size limit.
    #[error("payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },
    /// Underlying filesystem fault.
    #[error("asset i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a stored asset as persisted on a product record.
///
/// Either a public upload path (`/uploads/products/<generated-name>`) or an
/// inline-encoded `data:` URL produced by deployments without a durable
/// filesystem. Inline references occupy no file and are passed through
/// untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this reference carries its payload inline instead of
    /// pointing at a stored file.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Generated filename component of an upload-path reference.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_inline() {
            return None;
        }
        self.0.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

impl Display for ImageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image received from a client, before it is persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub original_name: String,
}

/// Filesystem-backed store for product images.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl ImageStore {
    /// Public path prefix under which stored files are served.
    pub const PUBLIC_PREFIX: &'static str = "/uploads/products";

    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_prefix: Self::PUBLIC_PREFIX.to_string(),
            max_bytes,
        }
    }

    /// Directory holding the stored files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded image under a collision-resistant generated name.
    ///
    /// The name combines a millisecond timestamp with a random component and
    /// preserves the original extension (lowercased). Non-image MIME or
    /// extension combinations and oversized payloads are rejected before
    /// anything touches the filesystem.
    pub fn store(&self, upload: &UploadedImage) -> Result<ImageRef, AssetError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(AssetError::PayloadTooLarge {
                size: upload.bytes.len(),
                limit: self.max_bytes,
            });
        }

        let extension = Path::new(&upload.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str())
            || !ALLOWED_MIME_TYPES.contains(&upload.content_type.as_str())
        {
            return Err(AssetError::UnsupportedMediaType {
                mime: upload.content_type.clone(),
                name: upload.original_name.clone(),
            });
        }

        let file_name = format!(
            "{}_{}.{extension}",
            Utc::now().timestamp_millis(),
            rand::thread_rng().gen_range(0..1_000_000_000u32)
        );

        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(&file_name), &upload.bytes)?;

        Ok(ImageRef(format!("{}/{file_name}", self.public_prefix)))
    }

    /// Store a replacement image, or keep the previous reference when no new
    /// file is supplied.
    ///
    /// When a new file is stored the previous asset is removed best-effort;
    /// its absence is not an error.
    pub fn replace(
        &self,
        old: Option<&ImageRef>,
        upload: Option<&UploadedImage>,
    ) -> Result<Option<ImageRef>, AssetError> {
        match upload {
            Some(upload) => {
                let stored = self.store(upload)?;
                if let Some(old) = old {
                    self.release(old);
                }
                Ok(Some(stored))
            }
            None => Ok(old.cloned()),
        }
    }

    /// Best-effort removal of a stored asset.
    ///
    /// Inline references occupy no file; a missing file is not an error.
    pub fn release(&self, reference: &ImageRef) {
        let Some(path) = self.resolve_path(reference) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                log::warn!("Failed to remove asset {}: {err}", path.display());
            }
        }
    }

    /// Filesystem path backing an upload reference, if it has one.
    pub fn resolve_path(&self, reference: &ImageRef) -> Option<PathBuf> {
        reference.file_name().map(|name| self.root.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_upload(name: &str) -> UploadedImage {
        UploadedImage {
            bytes: vec![0x89, b'P', b'N', b'G'],
            content_type: "image/png".to_string(),
            original_name: name.to_string(),
        }
    }

    fn store_in(dir: &Path) -> ImageStore {
        ImageStore::new(dir, 1024)
    }

    #[test]
    fn stores_under_generated_name_preserving_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let reference = store.store(&png_upload("photo.PNG")).unwrap();
        assert!(reference.as_str().starts_with("/uploads/products/"));
        assert!(reference.as_str().ends_with(".png"));

        let path = store.resolve_path(&reference).unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn generated_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let first = store.store(&png_upload("a.png")).unwrap();
        let second = store.store(&png_upload("a.png")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_non_image_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut upload = png_upload("notes.txt");
        assert!(matches!(
            store.store(&upload),
            Err(AssetError::UnsupportedMediaType { .. })
        ));

        upload.original_name = "photo.png".to_string();
        upload.content_type = "application/octet-stream".to_string();
        assert!(matches!(
            store.store(&upload),
            Err(AssetError::UnsupportedMediaType { .. })
        ));
    }

    #[test]
    fn rejects_oversized_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 2);

        assert!(matches!(
            store.store(&png_upload("photo.png")),
            Err(AssetError::PayloadTooLarge { size: 4, limit: 2 })
        ));
    }

    #[test]
    fn replace_removes_the_previous_asset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let old = store.store(&png_upload("a.png")).unwrap();
        let old_path = store.resolve_path(&old).unwrap();

        let new = store
            .replace(Some(&old), Some(&png_upload("b.png")))
            .unwrap()
            .unwrap();
        assert_ne!(new, old);
        assert!(!old_path.exists());
        assert!(store.resolve_path(&new).unwrap().exists());
    }

    #[test]
    fn replace_without_upload_keeps_the_old_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let old = store.store(&png_upload("a.png")).unwrap();
        let kept = store.replace(Some(&old), None).unwrap();
        assert_eq!(kept.as_ref(), Some(&old));
        assert!(store.resolve_path(&old).unwrap().exists());

        assert_eq!(store.replace(None, None).unwrap(), None);
    }

    #[test]
    fn release_tolerates_missing_files_and_inline_refs() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.release(&ImageRef::from(
            "/uploads/products/12345_678.png".to_string(),
        ));

        let inline = ImageRef::from("data:image/png;base64,iVBORw0KGgo=".to_string());
        assert!(inline.is_inline());
        assert_eq!(store.resolve_path(&inline), None);
        store.release(&inline);
    }
}
