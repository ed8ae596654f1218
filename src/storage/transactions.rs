//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KasboekError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
    /// Bank references of stored transactions, for import dedup
    references: RwLock<HashSet<String>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
            references: RwLock::new(HashSet::new()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), KasboekError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut references = self
            .references
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_category.clear();
        references.clear();

        for txn in file_data.transactions {
            let id = txn.id;

            if let Some(cat_id) = txn.category_id {
                by_category.entry(cat_id).or_default().push(id);
            }
            if let Some(reference) = &txn.reference {
                references.insert(reference.clone());
            }

            data.insert(id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), KasboekError> {
        let data = self
            .data
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = TransactionData { transactions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, KasboekError> {
        let data = self
            .data
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, KasboekError> {
        let data = self
            .data
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Get transactions assigned to a category
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, KasboekError> {
        let data = self
            .data
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_category = self
            .by_category
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = by_category
            .get(&category_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Check whether a bank reference is already stored
    pub fn has_reference(&self, reference: &str) -> Result<bool, KasboekError> {
        let references = self
            .references
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(references.contains(reference))
    }

    /// Insert or update a transaction, maintaining indexes
    pub fn upsert(&self, txn: Transaction) -> Result<(), KasboekError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut references = self
            .references
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove old index entries when replacing
        if let Some(old) = data.get(&txn.id) {
            if let Some(old_cat) = old.category_id {
                if let Some(ids) = by_category.get_mut(&old_cat) {
                    ids.retain(|id| *id != txn.id);
                }
            }
        }

        if let Some(cat_id) = txn.category_id {
            by_category.entry(cat_id).or_default().push(txn.id);
        }
        if let Some(reference) = &txn.reference {
            references.insert(reference.clone());
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, KasboekError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.remove(&id) {
            Some(old) => {
                if let Some(cat_id) = old.category_id {
                    if let Some(ids) = by_category.get_mut(&cat_id) {
                        ids.retain(|i| *i != id);
                    }
                }
                // References are left in the dedup set so a deleted import
                // does not silently come back on the next run.
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete all transactions assigned to a category, returning how many were removed
    pub fn delete_by_category(&self, category_id: CategoryId) -> Result<usize, KasboekError> {
        let ids: Vec<TransactionId> = {
            let by_category = self.by_category.read().map_err(|e| {
                KasboekError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            by_category.get(&category_id).cloned().unwrap_or_default()
        };

        let mut removed = 0;
        for id in ids {
            if self.delete(id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, KasboekError> {
        let data = self
            .data
            .read()
            .map_err(|e| KasboekError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
