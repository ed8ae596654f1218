//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::KasboekPaths;
use crate::error::KasboekError;
use crate::models::{Category, Money};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Default category names for a fresh installation
///
/// Kept in line with the keyword table used by the heuristic classifier so
/// imported transactions can be categorised out of the box.
const DEFAULT_CATEGORIES: &[&str] = &[
    "Housing",
    "Rent",
    "Groceries",
    "Utilities",
    "Transport",
    "Dining",
    "Insurance",
    "Healthcare",
    "Income",
    "Savings",
];

/// Initialize storage for a fresh installation
///
/// Creates the data directories and a default category set.
pub fn initialize_storage(paths: &KasboekPaths) -> Result<(), KasboekError> {
    paths.ensure_directories()?;

    // Create default categories if categories.json doesn't exist
    if !paths.categories_file().exists() {
        create_default_categories(paths)?;
    }

    Ok(())
}

/// Create the default categories with zero planned amounts
fn create_default_categories(paths: &KasboekPaths) -> Result<(), KasboekError> {
    let categories = DEFAULT_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, name)| Category::with_sort_order(*name, Money::zero(), i as i32))
        .collect();

    let data = CategoryData { categories };
    write_json_atomic(paths.categories_file(), &data)?;

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &KasboekPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::categories::CategoryRepository;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KasboekPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let repo = CategoryRepository::new(paths.categories_file());
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), DEFAULT_CATEGORIES.len());
        assert!(repo.get_by_name("Groceries").unwrap().is_some());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KasboekPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        // A second run must not clobber user data
        let repo = CategoryRepository::new(paths.categories_file());
        repo.load().unwrap();
        let custom = Category::new("Vacation", Money::zero());
        repo.upsert(custom).unwrap();
        repo.save().unwrap();

        initialize_storage(&paths).unwrap();

        let repo2 = CategoryRepository::new(paths.categories_file());
        repo2.load().unwrap();
        assert!(repo2.get_by_name("Vacation").unwrap().is_some());
    }
}
