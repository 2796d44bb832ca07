//! Read-side projections of stored products.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::locale::Locale;
use crate::domain::product::Product;

/// A product projected into a single display locale.
///
/// `name` and `description` carry the resolved values; the raw multilingual
/// fields are still included so clients can render language switches.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayProduct {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub description_zh: Option<String>,
    pub description_en: Option<String>,
    pub price: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl DisplayProduct {
    /// Project a stored record into the requested locale.
    ///
    /// Fallback chain for the display name: locale field, then the zh
    /// field, then the legacy single-locale field. The description uses the
    /// identical chain. Pure derivation; the stored record is consumed, not
    /// mutated.
    pub fn localized(product: Product, locale: Locale) -> Self {
        let (name, description) = match locale {
            Locale::En => (
                non_blank(product.name_en.as_deref())
                    .or(non_blank(product.name_zh.as_deref()))
                    .unwrap_or(&product.name)
                    .to_string(),
                non_blank(product.description_en.as_deref())
                    .or(non_blank(product.description_zh.as_deref()))
                    .or(non_blank(product.description.as_deref()))
                    .map(str::to_string),
            ),
            Locale::Zh => (
                non_blank(product.name_zh.as_deref())
                    .unwrap_or(&product.name)
                    .to_string(),
                non_blank(product.description_zh.as_deref())
                    .or(non_blank(product.description.as_deref()))
                    .map(str::to_string),
            ),
        };

        Self {
            id: product.id.get(),
            name,
            description,
            name_zh: product.name_zh,
            name_en: product.name_en,
            description_zh: product.description_zh,
            description_en: product.description_en,
            price: product.price.into_inner(),
            category: product.category.into(),
            image: product.image.map(Into::into),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::category::Category;
    use crate::domain::types::{PriceTag, ProductId};

    fn product(name_zh: Option<&str>, name_en: Option<&str>, legacy: &str) -> Product {
        let now = Utc::now().naive_utc();
        Product {
            id: ProductId::new(1).unwrap(),
            name: legacy.to_string(),
            description: Some("挪威进口".to_string()),
            name_zh: name_zh.map(str::to_string),
            name_en: name_en.map(str::to_string),
            description_zh: None,
            description_en: None,
            price: PriceTag::new("¥180/kg").unwrap(),
            category: Category::Fresh,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn english_locale_prefers_the_english_name() {
        let display = DisplayProduct::localized(
            product(Some("三文鱼"), Some("Salmon"), "legacy"),
            Locale::En,
        );
        assert_eq!(display.name, "Salmon");
    }

    #[test]
    fn english_locale_falls_back_to_chinese_then_legacy() {
        let display =
            DisplayProduct::localized(product(Some("三文鱼"), None, "legacy"), Locale::En);
        assert_eq!(display.name, "三文鱼");

        let display = DisplayProduct::localized(product(None, None, "legacy"), Locale::En);
        assert_eq!(display.name, "legacy");

        // Whitespace-only fields count as empty.
        let display =
            DisplayProduct::localized(product(Some("  "), Some(" "), "legacy"), Locale::En);
        assert_eq!(display.name, "legacy");
    }

    #[test]
    fn chinese_locale_falls_back_to_legacy_only() {
        let display = DisplayProduct::localized(
            product(Some("三文鱼"), Some("Salmon"), "legacy"),
            Locale::Zh,
        );
        assert_eq!(display.name, "三文鱼");

        let display =
            DisplayProduct::localized(product(None, Some("Salmon"), "legacy"), Locale::Zh);
        assert_eq!(display.name, "legacy");
    }

    #[test]
    fn description_uses_the_same_chain() {
        let mut p = product(Some("三文鱼"), None, "legacy");
        p.description_en = Some("Norwegian import".to_string());
        let display = DisplayProduct::localized(p.clone(), Locale::En);
        assert_eq!(display.description.as_deref(), Some("Norwegian import"));

        p.description_en = None;
        let display = DisplayProduct::localized(p, Locale::En);
        assert_eq!(display.description.as_deref(), Some("挪威进口"));
    }
}
