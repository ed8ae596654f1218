//! Category model
//!
//! A category is a named budget bucket with a planned amount. The actual
//! amount is never stored; it is derived from assigned transactions by the
//! rollup service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;

/// A budget category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Planned amount for this category
    #[serde(default)]
    pub planned: Money,

    /// Sort order for display
    #[serde(default)]
    pub sort_order: i32,

    /// Notes about this category
    #[serde(default)]
    pub notes: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, planned: Money) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            planned,
            sort_order: 0,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new category with a specific sort order
    pub fn with_sort_order(name: impl Into<String>, planned: Money, sort_order: i32) -> Self {
        let mut category = Self::new(name, planned);
        category.sort_order = sort_order;
        category
    }

    /// Rename the category
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Change the planned amount
    pub fn set_planned(&mut self, planned: Money) {
        self.planned = planned;
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.planned.is_negative() {
            return Err(CategoryValidationError::NegativePlanned);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativePlanned,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::NegativePlanned => write!(f, "Planned amount cannot be negative"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", Money::from_cents(40000));
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.planned.cents(), 40000);
        assert_eq!(category.sort_order, 0);
    }

    #[test]
    fn test_set_planned() {
        let mut category = Category::new("Rent", Money::zero());
        category.set_planned(Money::from_cents(120000));
        assert_eq!(category.planned.cents(), 120000);
    }

    #[test]
    fn test_rename() {
        let mut category = Category::new("Food", Money::zero());
        category.rename("Groceries");
        assert_eq!(category.name, "Groceries");
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid", Money::zero());
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(_))
        ));

        category.name = "Valid".to_string();
        category.planned = Money::from_cents(-100);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NegativePlanned)
        );
    }

    #[test]
    fn test_serialization() {
        let category = Category::new("Utilities", Money::from_cents(15000));
        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category.id, deserialized.id);
        assert_eq!(category.name, deserialized.name);
        assert_eq!(category.planned, deserialized.planned);
    }
}
