//! Transaction service
//!
//! Provides business logic for transaction management including CRUD
//! operations, filtered listing, and category assignment.

use chrono::NaiveDate;

use crate::error::{KasboekError, KasboekResult};
use crate::models::{CategoryId, Money, Transaction, TransactionId};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Only transactions without a category
    pub unassigned_only: bool,
    /// Filter by date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Only unassigned transactions
    pub fn unassigned(mut self) -> Self {
        self.unassigned_only = true;
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub account_iban: Option<String>,
    pub account_name: Option<String>,
    pub counterparty: Option<String>,
    pub reference: Option<String>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> KasboekResult<Transaction> {
        // Verify category exists if provided
        if let Some(cat_id) = input.category_id {
            self.storage
                .categories
                .get(cat_id)?
                .ok_or_else(|| KasboekError::category_not_found(cat_id.to_string()))?;
        }

        let mut txn = Transaction::new(input.date, input.amount, input.description);
        txn.category_id = input.category_id;
        txn.account_iban = input.account_iban;
        txn.account_name = input.account_name;
        txn.counterparty = input.counterparty;
        txn.reference = input.reference;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> KasboekResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by ID string
    pub fn find(&self, identifier: &str) -> KasboekResult<Option<Transaction>> {
        let id = identifier
            .parse::<TransactionId>()
            .map_err(|_| KasboekError::transaction_not_found(identifier))?;
        self.storage.transactions.get(id)
    }

    /// List transactions matching a filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> KasboekResult<Vec<Transaction>> {
        let all = self.storage.transactions.get_all()?;

        let filtered = all.into_iter().filter(|txn| {
            if let Some(cat_id) = filter.category_id {
                if txn.category_id != Some(cat_id) {
                    return false;
                }
            }
            if filter.unassigned_only && txn.is_assigned() {
                return false;
            }
            if let Some(start) = filter.start_date {
                if txn.date < start {
                    return false;
                }
            }
            if let Some(end) = filter.end_date {
                if txn.date > end {
                    return false;
                }
            }
            true
        });

        Ok(match filter.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        })
    }

    /// List all unassigned transactions
    pub fn list_unassigned(&self) -> KasboekResult<Vec<Transaction>> {
        self.list(&TransactionFilter::new().unassigned())
    }

    /// Assign a transaction to a category
    pub fn assign_category(
        &self,
        id: TransactionId,
        category_id: CategoryId,
    ) -> KasboekResult<Transaction> {
        let assigned = self.assign_category_bulk(&[id], category_id)?;
        Ok(assigned.into_iter().next().expect("one transaction assigned"))
    }

    /// Assign multiple transactions to a category in one save
    pub fn assign_category_bulk(
        &self,
        ids: &[TransactionId],
        category_id: CategoryId,
    ) -> KasboekResult<Vec<Transaction>> {
        self.storage
            .categories
            .get(category_id)?
            .ok_or_else(|| KasboekError::category_not_found(category_id.to_string()))?;

        let mut assigned = Vec::with_capacity(ids.len());
        for id in ids {
            let mut txn = self
                .storage
                .transactions
                .get(*id)?
                .ok_or_else(|| KasboekError::transaction_not_found(id.to_string()))?;
            txn.set_category(category_id);
            self.storage.transactions.upsert(txn.clone())?;
            assigned.push(txn);
        }

        self.storage.transactions.save()?;
        Ok(assigned)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> KasboekResult<()> {
        if !self.storage.transactions.delete(id)? {
            return Err(KasboekError::transaction_not_found(id.to_string()));
        }
        self.storage.transactions.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::KasboekPaths;
    use crate::services::CategoryService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KasboekPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(description: &str, cents: i64, d: NaiveDate) -> CreateTransactionInput {
        CreateTransactionInput {
            date: d,
            amount: Money::from_cents(cents),
            description: description.to_string(),
            category_id: None,
            account_iban: None,
            account_name: None,
            counterparty: None,
            reference: None,
        }
    }

    #[test]
    fn test_create_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service
            .create(input("Albert Heijn", -5000, date(2025, 1, 15)))
            .unwrap();
        assert_eq!(txn.description, "Albert Heijn");
        assert!(service.get(txn.id).unwrap().is_some());
    }

    #[test]
    fn test_create_with_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let mut i = input("Albert Heijn", -5000, date(2025, 1, 15));
        i.category_id = Some(CategoryId::new());

        let err = service.create(i).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_with_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let cat_service = CategoryService::new(&storage);
        let service = TransactionService::new(&storage);

        let category = cat_service.create("Groceries", Money::zero()).unwrap();

        let mut grocery = input("Albert Heijn", -5000, date(2025, 1, 15));
        grocery.category_id = Some(category.id);
        service.create(grocery).unwrap();

        service.create(input("Unknown shop", -2000, date(2025, 1, 20))).unwrap();
        service.create(input("Old txn", -1000, date(2024, 12, 1))).unwrap();

        let by_category = service
            .list(&TransactionFilter::new().category(category.id))
            .unwrap();
        assert_eq!(by_category.len(), 1);

        let unassigned = service.list_unassigned().unwrap();
        assert_eq!(unassigned.len(), 2);

        let january = service
            .list(&TransactionFilter::new().date_range(date(2025, 1, 1), date(2025, 1, 31)))
            .unwrap();
        assert_eq!(january.len(), 2);

        let limited = service.list(&TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited.len(), 1);
        // Newest first
        assert_eq!(limited[0].description, "Unknown shop");
    }

    #[test]
    fn test_assign_category() {
        let (_temp_dir, storage) = create_test_storage();
        let cat_service = CategoryService::new(&storage);
        let service = TransactionService::new(&storage);

        let category = cat_service.create("Groceries", Money::zero()).unwrap();
        let txn = service
            .create(input("Albert Heijn", -5000, date(2025, 1, 15)))
            .unwrap();

        let assigned = service.assign_category(txn.id, category.id).unwrap();
        assert_eq!(assigned.category_id, Some(category.id));

        let err = service
            .assign_category(txn.id, CategoryId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_assign_category_bulk() {
        let (_temp_dir, storage) = create_test_storage();
        let cat_service = CategoryService::new(&storage);
        let service = TransactionService::new(&storage);

        let category = cat_service.create("Groceries", Money::zero()).unwrap();
        let a = service.create(input("A", -100, date(2025, 1, 1))).unwrap();
        let b = service.create(input("B", -200, date(2025, 1, 2))).unwrap();

        let assigned = service
            .assign_category_bulk(&[a.id, b.id], category.id)
            .unwrap();
        assert_eq!(assigned.len(), 2);
        assert!(service.list_unassigned().unwrap().is_empty());
    }

    #[test]
    fn test_delete_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service
            .create(input("Albert Heijn", -5000, date(2025, 1, 15)))
            .unwrap();
        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap().is_none());

        let err = service.delete(txn.id).unwrap_err();
        assert!(err.is_not_found());
    }
}
