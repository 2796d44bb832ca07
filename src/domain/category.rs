//! The fixed product taxonomy.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Product category drawn from a fixed, small set.
///
/// The set is immutable at runtime and not persisted as its own table;
/// products store the identifier string.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fresh,
    Frozen,
    Dry,
    Supply,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Fresh,
        Category::Frozen,
        Category::Dry,
        Category::Supply,
    ];

    /// Identifier string used in persistence and request paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Frozen => "frozen",
            Self::Dry => "dry",
            Self::Supply => "supply",
        }
    }

    /// Human-readable display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "新鲜",
            Self::Frozen => "冷冻",
            Self::Dry => "干货",
            Self::Supply => "器具",
        }
    }

    /// Validates a category identifier.
    ///
    /// The match is exact and case-sensitive; no trimming or normalization
    /// is applied.
    pub fn from_id(value: &str) -> Result<Self, TypeConstraintError> {
        match value {
            "fresh" => Ok(Self::Fresh),
            "frozen" => Ok(Self::Frozen),
            "dry" => Ok(Self::Dry),
            "supply" => Ok(Self::Supply),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "category must be one of fresh, frozen, dry, supply; got: {other}"
            ))),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_id(value)
    }
}

impl TryFrom<String> for Category {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_id(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_whole_fixed_set() {
        for id in ["fresh", "frozen", "dry", "supply"] {
            let category = Category::from_id(id).unwrap();
            assert_eq!(category.as_str(), id);
        }
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!(Category::from_id("seafood").is_err());
        assert!(Category::from_id("").is_err());
    }

    #[test]
    fn matching_is_case_sensitive_and_exact() {
        assert!(Category::from_id("Fresh").is_err());
        assert!(Category::from_id("FRESH").is_err());
        assert!(Category::from_id(" fresh").is_err());
        assert!(Category::from_id("fresh ").is_err());
    }

    #[test]
    fn labels_cover_every_category() {
        for category in Category::ALL {
            assert!(!category.label().is_empty());
        }
    }
}
