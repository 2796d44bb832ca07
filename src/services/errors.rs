use thiserror::Error;

use crate::assets::AssetError;
use crate::forms::products::ProductFormError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller did not present a valid credential.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// A request field failed validation.
    #[error("{0}")]
    Validation(String),
    /// An uploaded file is not an accepted image format.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// An uploaded file exceeds the size limit.
    #[error("payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<AssetError> for ServiceError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::UnsupportedMediaType { mime, name } => {
                Self::UnsupportedMediaType(format!("{mime} ({name})"))
            }
            AssetError::PayloadTooLarge { size, limit } => Self::PayloadTooLarge { size, limit },
            AssetError::Io(err) => {
                log::error!("Asset store i/o failure: {err}");
                Self::Internal
            }
        }
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(err: ProductFormError) -> Self {
        Self::Validation(err.to_string())
    }
}
