//! Classification service
//!
//! Bridges the classifier with the storage layer: gathers labelled examples,
//! walks the unassigned transactions, and applies accepted suggestions,
//! creating the category when it does not exist yet.

use crate::classify::{Classifier, LabelledExample, Suggestion};
use crate::error::{KasboekError, KasboekResult};
use crate::models::{Category, Money, Transaction, TransactionId};
use crate::storage::Storage;

/// A suggestion tied to the transaction it was produced for
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub transaction_id: TransactionId,
    pub description: String,
    pub suggestion: Suggestion,
}

/// Service for batch classification
pub struct ClassifyService<'a> {
    storage: &'a Storage,
}

impl<'a> ClassifyService<'a> {
    /// Create a new classification service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Names of all current categories
    pub fn category_names(&self) -> KasboekResult<Vec<String>> {
        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Transactions already assigned to an existing category, as few-shot
    /// examples, oldest first
    pub fn labelled_examples(&self) -> KasboekResult<Vec<LabelledExample>> {
        let mut transactions = self.storage.transactions.get_all()?;
        // get_all is newest first; examples read better oldest first so the
        // most recent assignment wins ties in the classifier
        transactions.reverse();

        let mut examples = Vec::new();
        for transaction in transactions {
            let Some(cat_id) = transaction.category_id else {
                continue;
            };
            let Some(category) = self.storage.categories.get(cat_id)? else {
                continue;
            };
            examples.push(LabelledExample {
                transaction,
                category: category.name,
            });
        }
        Ok(examples)
    }

    /// Produce suggestions for every unassigned transaction
    ///
    /// Transactions the classifier cannot place are simply absent from the
    /// result; classification never fails a batch.
    pub fn suggest_for_unassigned(
        &self,
        classifier: &mut Classifier,
        log: &dyn Fn(&str),
    ) -> KasboekResult<Vec<SuggestionOutcome>> {
        let unassigned: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| !t.is_assigned())
            .collect();

        if unassigned.is_empty() {
            log("No unassigned transactions to classify.");
            return Ok(Vec::new());
        }

        log(&format!(
            "Attempting to classify {} unassigned transaction{}.",
            unassigned.len(),
            if unassigned.len() == 1 { "" } else { "s" }
        ));

        let category_names = self.category_names()?;
        let examples = self.labelled_examples()?;

        let mut outcomes = Vec::new();
        for transaction in unassigned {
            let txn_id = transaction.id;
            let txn_log = |message: &str| log(&format!("[{}] {}", txn_id, message));

            match classifier.suggest(&transaction, &category_names, &examples, &txn_log) {
                Some(suggestion) => {
                    log(&format!(
                        "Accepted suggestion '{}' for transaction '{}'.",
                        suggestion.category, transaction.description
                    ));
                    outcomes.push(SuggestionOutcome {
                        transaction_id: transaction.id,
                        description: transaction.description.clone(),
                        suggestion,
                    });
                }
                None => {
                    log(&format!(
                        "No suggestion produced for '{}'.",
                        transaction.description
                    ));
                }
            }
        }

        Ok(outcomes)
    }

    /// Apply a suggestion: assign the category, creating it if needed
    ///
    /// Returns `true` when the category had to be created.
    pub fn apply_suggestion(
        &self,
        transaction_id: TransactionId,
        category_name: &str,
    ) -> KasboekResult<bool> {
        let mut transaction = self
            .storage
            .transactions
            .get(transaction_id)?
            .ok_or_else(|| KasboekError::transaction_not_found(transaction_id.to_string()))?;

        let (category_id, created) = match self.storage.categories.get_by_name(category_name)? {
            Some(category) => (category.id, false),
            None => {
                let category = Category::new(category_name, Money::zero());
                let id = category.id;
                self.storage.categories.upsert(category)?;
                self.storage.categories.save()?;
                (id, true)
            }
        };

        transaction.set_category(category_id);
        self.storage.transactions.upsert(transaction)?;
        self.storage.transactions.save()?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::KasboekPaths;
    use crate::config::settings::ClassifierSettings;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KasboekPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_txn(storage: &Storage, description: &str, category: Option<&Category>) -> Transaction {
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(-1000),
            description,
        );
        if let Some(category) = category {
            txn.set_category(category.id);
        }
        storage.transactions.upsert(txn.clone()).unwrap();
        txn
    }

    fn no_log(_: &str) {}

    #[test]
    fn test_labelled_examples_skip_dangling() {
        let (_temp_dir, storage) = create_test_storage();

        let category = Category::new("Groceries", Money::zero());
        storage.categories.upsert(category.clone()).unwrap();

        add_txn(&storage, "Labelled", Some(&category));
        add_txn(&storage, "Unlabelled", None);

        // Dangling reference to a deleted category
        let ghost = Category::new("Ghost", Money::zero());
        add_txn(&storage, "Dangling", Some(&ghost));

        let service = ClassifyService::new(&storage);
        let examples = service.labelled_examples().unwrap();

        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].category, "Groceries");
    }

    #[test]
    fn test_suggest_for_unassigned() {
        let (_temp_dir, storage) = create_test_storage();

        let category = Category::new("Groceries", Money::zero());
        storage.categories.upsert(category.clone()).unwrap();

        add_txn(&storage, "ALBERT HEIJN 1234", None);
        add_txn(&storage, "Completely opaque", None);

        let service = ClassifyService::new(&storage);
        let mut classifier = Classifier::with_remote(ClassifierSettings::default(), None);

        let outcomes = service
            .suggest_for_unassigned(&mut classifier, &no_log)
            .unwrap();

        // The keyword heuristic places the supermarket, not the opaque one
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].suggestion.category, "Groceries");
    }

    #[test]
    fn test_suggest_with_nothing_unassigned() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClassifyService::new(&storage);
        let mut classifier = Classifier::with_remote(ClassifierSettings::default(), None);

        let outcomes = service
            .suggest_for_unassigned(&mut classifier, &no_log)
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_apply_suggestion_existing_category() {
        let (_temp_dir, storage) = create_test_storage();

        let category = Category::new("Groceries", Money::zero());
        storage.categories.upsert(category.clone()).unwrap();
        let txn = add_txn(&storage, "ALBERT HEIJN 1234", None);

        let service = ClassifyService::new(&storage);
        // Case-insensitive match against the existing category
        let created = service.apply_suggestion(txn.id, "groceries").unwrap();

        assert!(!created);
        let stored = storage.transactions.get(txn.id).unwrap().unwrap();
        assert_eq!(stored.category_id, Some(category.id));
    }

    #[test]
    fn test_apply_suggestion_creates_category() {
        let (_temp_dir, storage) = create_test_storage();
        let txn = add_txn(&storage, "Boat supplies", None);

        let service = ClassifyService::new(&storage);
        let created = service.apply_suggestion(txn.id, "Hobby").unwrap();

        assert!(created);
        let category = storage.categories.get_by_name("Hobby").unwrap().unwrap();
        assert!(category.planned.is_zero());

        let stored = storage.transactions.get(txn.id).unwrap().unwrap();
        assert_eq!(stored.category_id, Some(category.id));
    }

    #[test]
    fn test_apply_suggestion_missing_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClassifyService::new(&storage);

        let err = service
            .apply_suggestion(TransactionId::new(), "Hobby")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
