//! Closed registry of business category tags.
//!
//! Every category a business can belong to is a variant here; there is no
//! dynamic model resolution beyond this enum. Adding a vertical means adding
//! a variant, a record table, and its model — nothing resolves at runtime
//! from arbitrary strings.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "category_tag")]
pub enum CategoryTag {
    Health,
    Hotel,
    BeautySpa,
}

impl CategoryTag {
    /// All registered categories, in registry order.
    pub const ALL: [CategoryTag; 3] = [CategoryTag::Health, CategoryTag::Hotel, CategoryTag::BeautySpa];

    /// Resolve a raw tag string to a registered category.
    ///
    /// Unregistered tags are rejected explicitly rather than falling through
    /// to any dynamic lookup.
    pub fn resolve(raw: &str) -> Result<Self, AppError> {
        match raw {
            "Health" => Ok(CategoryTag::Health),
            "Hotel" => Ok(CategoryTag::Hotel),
            "BeautySpa" => Ok(CategoryTag::BeautySpa),
            other => Err(AppError::InvalidCategory(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Health => "Health",
            CategoryTag::Hotel => "Hotel",
            CategoryTag::BeautySpa => "BeautySpa",
        }
    }

    /// Name of the table holding this category's records.
    pub fn table(&self) -> &'static str {
        match self {
            CategoryTag::Health => "health_records",
            CategoryTag::Hotel => "hotel_records",
            CategoryTag::BeautySpa => "beauty_spa_records",
        }
    }
}

impl std::fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_registered_tags() {
        assert_eq!(CategoryTag::resolve("Health").unwrap(), CategoryTag::Health);
        assert_eq!(CategoryTag::resolve("Hotel").unwrap(), CategoryTag::Hotel);
        assert_eq!(
            CategoryTag::resolve("BeautySpa").unwrap(),
            CategoryTag::BeautySpa
        );
    }

    #[test]
    fn resolve_rejects_unregistered_tag() {
        let err = CategoryTag::resolve("Garage").unwrap_err();
        assert!(matches!(err, AppError::InvalidCategory(tag) if tag == "Garage"));
    }

    #[test]
    fn resolve_is_case_sensitive() {
        assert!(CategoryTag::resolve("health").is_err());
    }

    #[test]
    fn tag_serialization() {
        let json = serde_json::to_string(&CategoryTag::BeautySpa).unwrap();
        assert_eq!(json, "\"BeautySpa\"");
    }

    #[test]
    fn every_tag_has_a_table() {
        for tag in CategoryTag::ALL {
            assert!(tag.table().ends_with("_records"));
        }
    }
}
