use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::Category;
use crate::domain::product::NewProduct;
use crate::domain::types::{PriceTag, TypeConstraintError};

/// Raw client input for creating or fully replacing a product.
///
/// Update carries the same shape as create: any omitted field blanks the
/// stored value. Only the image is handled separately (it falls back to the
/// stored asset when no new upload accompanies the request).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductDraft {
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
    #[validate(length(min = 1))]
    pub price: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<ProductDraft> for NewProduct {
    type Error = ProductFormError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        draft.validate()?;

        let name_zh = normalize(draft.name_zh);
        let name_en = normalize(draft.name_en);
        if name_zh.is_none() && name_en.is_none() {
            return Err(TypeConstraintError::EmptyString("name").into());
        }

        // The category identifier is matched exactly, without normalization.
        let category = Category::from_id(draft.category.as_deref().unwrap_or(""))?;
        let price = PriceTag::new(draft.price.unwrap_or_default())?;

        Ok(NewProduct {
            name_zh,
            name_en,
            description_zh: normalize(draft.description_zh),
            description_en: normalize(draft.description_en),
            price,
            category,
            image: None,
        })
    }
}

#[cfg(feature = "server")]
mod multipart {
    use actix_multipart::form::MultipartForm;
    use actix_multipart::form::tempfile::TempFile;
    use actix_multipart::form::text::Text;

    use super::ProductDraft;
    use crate::assets::UploadedImage;

    /// Multipart request body for product create/update.
    #[derive(Debug, MultipartForm)]
    pub struct ProductForm {
        pub name_zh: Option<Text<String>>,
        pub name_en: Option<Text<String>>,
        pub description_zh: Option<Text<String>>,
        pub description_en: Option<Text<String>>,
        pub price: Option<Text<String>>,
        pub category: Option<Text<String>>,
        #[multipart(limit = "10MiB")]
        pub image: Option<TempFile>,
    }

    impl ProductForm {
        /// Split the form into a draft and the uploaded image, if any.
        pub fn into_parts(self) -> std::io::Result<(ProductDraft, Option<UploadedImage>)> {
            let draft = ProductDraft {
                name_zh: self.name_zh.map(|t| t.0),
                name_en: self.name_en.map(|t| t.0),
                description_zh: self.description_zh.map(|t| t.0),
                description_en: self.description_en.map(|t| t.0),
                price: self.price.map(|t| t.0),
                category: self.category.map(|t| t.0),
            };

            let upload = match self.image {
                Some(file) => {
                    let bytes = std::fs::read(file.file.path())?;
                    Some(UploadedImage {
                        bytes,
                        content_type: file
                            .content_type
                            .map(|mime| mime.to_string())
                            .unwrap_or_default(),
                        original_name: file.file_name.unwrap_or_default(),
                    })
                }
                None => None,
            };

            Ok((draft, upload))
        }
    }
}

#[cfg(feature = "server")]
pub use multipart::ProductForm;
