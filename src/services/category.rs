//! Category service
//!
//! Provides business logic for category management: CRUD operations,
//! duplicate-name rejection, and the transaction cascade on delete.

use crate::error::{KasboekError, KasboekResult};
use crate::models::{Category, CategoryId, Money};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, planned: Money) -> KasboekResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KasboekError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        // Check for duplicate name
        if self.storage.categories.get_by_name(name)?.is_some() {
            return Err(KasboekError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        // Append after the current highest sort order
        let categories = self.storage.categories.get_all()?;
        let max_order = categories.iter().map(|c| c.sort_order).max().unwrap_or(-1);

        let category = Category::with_sort_order(name, planned, max_order + 1);

        category
            .validate()
            .map_err(|e| KasboekError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> KasboekResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> KasboekResult<Option<Category>> {
        // Try by name first
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        Ok(None)
    }

    /// List all categories
    pub fn list(&self) -> KasboekResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Update a category's name and/or planned amount
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        planned: Option<Money>,
    ) -> KasboekResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| KasboekError::category_not_found(id.to_string()))?;

        if let Some(new_name) = name {
            let new_name = new_name.trim();

            // Reject a rename onto another existing category
            if let Some(existing) = self.storage.categories.get_by_name(new_name)? {
                if existing.id != id {
                    return Err(KasboekError::Duplicate {
                        entity_type: "Category",
                        identifier: new_name.to_string(),
                    });
                }
            }

            category.rename(new_name);
        }

        if let Some(new_planned) = planned {
            category.set_planned(new_planned);
        }

        category
            .validate()
            .map_err(|e| KasboekError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        Ok(category)
    }

    /// Delete a category and the transactions assigned to it
    ///
    /// Returns the number of transactions removed along with the category.
    pub fn delete(&self, id: CategoryId) -> KasboekResult<usize> {
        if self.storage.categories.get(id)?.is_none() {
            return Err(KasboekError::category_not_found(id.to_string()));
        }

        let removed = self.storage.transactions.delete_by_category(id)?;
        self.storage.categories.delete(id)?;

        self.storage.categories.save()?;
        self.storage.transactions.save()?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::KasboekPaths;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KasboekPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Groceries", Money::from_cents(40000)).unwrap();
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.planned.cents(), 40000);
        assert_eq!(category.sort_order, 0);

        let second = service.create("Rent", Money::zero()).unwrap();
        assert_eq!(second.sort_order, 1);
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Groceries", Money::zero()).unwrap();
        let err = service.create("groceries", Money::zero()).unwrap_err();
        assert!(matches!(err, KasboekError::Duplicate { .. }));
    }

    #[test]
    fn test_create_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let err = service.create("   ", Money::zero()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_and_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Utilities", Money::zero()).unwrap();

        let by_name = service.find("utilities").unwrap().unwrap();
        assert_eq!(by_name.id, category.id);

        let by_id = service
            .find(&category.id.as_uuid().to_string())
            .unwrap()
            .unwrap();
        assert_eq!(by_id.id, category.id);

        assert!(service.find("nope").unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Food", Money::zero()).unwrap();
        let updated = service
            .update(category.id, Some("Groceries"), Some(Money::from_cents(35000)))
            .unwrap();

        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.planned.cents(), 35000);
    }

    #[test]
    fn test_update_rename_collision() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Groceries", Money::zero()).unwrap();
        let other = service.create("Food", Money::zero()).unwrap();

        let err = service.update(other.id, Some("Groceries"), None).unwrap_err();
        assert!(matches!(err, KasboekError::Duplicate { .. }));
    }

    #[test]
    fn test_delete_cascades_to_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Groceries", Money::zero()).unwrap();

        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(-5000),
            "Albert Heijn",
        );
        txn.set_category(category.id);
        storage.transactions.upsert(txn).unwrap();

        let unrelated = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            Money::from_cents(-1000),
            "Other",
        );
        storage.transactions.upsert(unrelated).unwrap();

        let removed = service.delete(category.id).unwrap();
        assert_eq!(removed, 1);
        assert!(service.get(category.id).unwrap().is_none());
        assert_eq!(storage.transactions.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_missing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let err = service.delete(CategoryId::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
