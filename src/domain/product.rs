use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::assets::ImageRef;
use crate::domain::category::Category;
use crate::domain::types::{PriceTag, ProductId};

/// A stored catalog product.
///
/// `name` and `description` are the legacy single-locale columns kept for
/// records created before multilingual support; they are derived from the
/// multilingual fields on every write and serve reads only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
    pub price: PriceTag,
    pub category: Category,
    pub image: Option<ImageRef>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a [`Product`] or fully replace its state.
///
/// Invariant: at least one of `name_zh`/`name_en` is present; empty and
/// whitespace-only inputs have already been normalized away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
    pub price: PriceTag,
    pub category: Category,
    pub image: Option<ImageRef>,
}

impl NewProduct {
    /// Attach the resolved image reference, replacing any previous one.
    pub fn with_image(mut self, image: Option<ImageRef>) -> Self {
        self.image = image;
        self
    }

    /// Legacy single-locale name, preferring the Chinese field.
    pub fn legacy_name(&self) -> &str {
        self.name_zh
            .as_deref()
            .or(self.name_en.as_deref())
            .unwrap_or_default()
    }

    /// Legacy single-locale description, preferring the Chinese field.
    pub fn legacy_description(&self) -> Option<&str> {
        self.description_zh
            .as_deref()
            .or(self.description_en.as_deref())
    }
}
