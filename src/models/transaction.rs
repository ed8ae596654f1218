//! Transaction model
//!
//! A dated, signed monetary record attributed to a source account, optionally
//! assigned to a category. Bank-import metadata (IBAN, counterparty,
//! reference) is carried on the transaction itself.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Category this transaction is assigned to (None = unassigned)
    pub category_id: Option<CategoryId>,

    /// IBAN of the source account (set on imported transactions)
    pub account_iban: Option<String>,

    /// Account holder name, when the export provides one
    pub account_name: Option<String>,

    /// Counterparty name
    pub counterparty: Option<String>,

    /// Bank reference, used for duplicate detection during import
    pub reference: Option<String>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(date: NaiveDate, amount: Money, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            amount,
            description: description.into(),
            category_id: None,
            account_iban: None,
            account_name: None,
            counterparty: None,
            reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is an inflow (positive amount)
    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }

    /// Check if this is an outflow (negative amount)
    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    /// Check if this transaction has been assigned to a category
    pub fn is_assigned(&self) -> bool {
        self.category_id.is_some()
    }

    /// Assign to a category
    pub fn set_category(&mut self, category_id: CategoryId) {
        self.category_id = Some(category_id);
        self.updated_at = Utc::now();
    }

    /// Remove the category assignment
    pub fn clear_category(&mut self) {
        self.category_id = None;
        self.updated_at = Utc::now();
    }

    /// Account label for display: holder name when known, else the IBAN
    pub fn account_label(&self) -> Option<&str> {
        self.account_name
            .as_deref()
            .or(self.account_iban.as_deref())
    }

    /// Concatenated text used by the classifier for keying and matching
    pub fn classifier_text(&self) -> String {
        let parts = [
            Some(self.description.as_str()),
            self.counterparty.as_deref(),
            self.account_label(),
            self.reference.as_deref(),
        ];
        parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(test_date(), Money::from_cents(-5000), "Albert Heijn");
        assert_eq!(txn.date, test_date());
        assert_eq!(txn.amount.cents(), -5000);
        assert_eq!(txn.description, "Albert Heijn");
        assert!(!txn.is_assigned());
    }

    #[test]
    fn test_inflow_outflow() {
        let inflow = Transaction::new(test_date(), Money::from_cents(1000), "Salary");
        assert!(inflow.is_inflow());
        assert!(!inflow.is_outflow());

        let outflow = Transaction::new(test_date(), Money::from_cents(-1000), "Rent");
        assert!(!outflow.is_inflow());
        assert!(outflow.is_outflow());
    }

    #[test]
    fn test_category_assignment() {
        let mut txn = Transaction::new(test_date(), Money::from_cents(-1000), "Shop");
        let cat_id = CategoryId::new();

        txn.set_category(cat_id);
        assert_eq!(txn.category_id, Some(cat_id));
        assert!(txn.is_assigned());

        txn.clear_category();
        assert!(!txn.is_assigned());
    }

    #[test]
    fn test_account_label() {
        let mut txn = Transaction::new(test_date(), Money::from_cents(-1000), "Shop");
        assert!(txn.account_label().is_none());

        txn.account_iban = Some("NL91RABO0123456789".to_string());
        assert_eq!(txn.account_label(), Some("NL91RABO0123456789"));

        txn.account_name = Some("J Jansen".to_string());
        assert_eq!(txn.account_label(), Some("J Jansen"));
    }

    #[test]
    fn test_classifier_text() {
        let mut txn = Transaction::new(test_date(), Money::from_cents(-1000), "Albert Heijn");
        txn.counterparty = Some("ALBERT HEIJN 1234".to_string());
        txn.reference = Some("REF001".to_string());

        let text = txn.classifier_text();
        assert!(text.contains("Albert Heijn"));
        assert!(text.contains("ALBERT HEIJN 1234"));
        assert!(text.contains("REF001"));
    }

    #[test]
    fn test_serialization() {
        let mut txn = Transaction::new(test_date(), Money::from_cents(-5000), "Albert Heijn");
        txn.account_iban = Some("NL91RABO0123456789".to_string());
        txn.reference = Some("REF001".to_string());

        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn.id, deserialized.id);
        assert_eq!(txn.amount, deserialized.amount);
        assert_eq!(txn.reference, deserialized.reference);
    }

    #[test]
    fn test_display() {
        let txn = Transaction::new(test_date(), Money::from_cents(-5000), "Albert Heijn");
        assert_eq!(format!("{}", txn), "2025-01-15 Albert Heijn -€50.00");
    }
}
