use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::assets::ImageRef;
use crate::domain::category::Category;
use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{PriceTag, TypeConstraintError};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
}

/// Insertable form of [`Product`].
///
/// The legacy `name`/`description` columns are derived from the
/// multilingual fields; both timestamps are assigned at insert time.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
}

/// Full-replace changeset for [`Product`].
///
/// `treat_none_as_null` makes an omitted field overwrite the stored value
/// with NULL instead of leaving it untouched; `created_at` is never part of
/// the changeset.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products, treat_none_as_null = true)]
pub struct ProductChangeset {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: String,
    pub image: Option<String>,
    pub updated_at: NaiveDateTime,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: product.name,
            description: product.description,
            name_zh: product.name_zh,
            name_en: product.name_en,
            description_zh: product.description_zh,
            description_en: product.description_en,
            price: PriceTag::new(product.price)?,
            category: Category::from_id(&product.category)?,
            image: product.image.map(ImageRef::from),
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<&DomainNewProduct> for NewProduct {
    fn from(new_product: &DomainNewProduct) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            name: new_product.legacy_name().to_string(),
            description: new_product.legacy_description().map(str::to_string),
            price: new_product.price.as_str().to_string(),
            category: new_product.category.into(),
            image: new_product.image.clone().map(ImageRef::into_inner),
            created_at: now,
            updated_at: now,
            name_zh: new_product.name_zh.clone(),
            name_en: new_product.name_en.clone(),
            description_zh: new_product.description_zh.clone(),
            description_en: new_product.description_en.clone(),
        }
    }
}

impl From<&DomainNewProduct> for ProductChangeset {
    fn from(new_product: &DomainNewProduct) -> Self {
        Self {
            name: new_product.legacy_name().to_string(),
            description: new_product.legacy_description().map(str::to_string),
            price: new_product.price.as_str().to_string(),
            category: new_product.category.into(),
            image: new_product.image.clone().map(ImageRef::into_inner),
            updated_at: Utc::now().naive_utc(),
            name_zh: new_product.name_zh.clone(),
            name_en: new_product.name_en.clone(),
            description_zh: new_product.description_zh.clone(),
            description_en: new_product.description_en.clone(),
        }
    }
}
