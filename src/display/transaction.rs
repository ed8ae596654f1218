//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display as a
//! register view.

use std::collections::HashMap;

use crate::models::{CategoryId, Transaction};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(
    txn: &Transaction,
    category_names: &HashMap<CategoryId, String>,
    symbol: &str,
) -> String {
    let category = txn
        .category_id
        .and_then(|id| category_names.get(&id).cloned())
        .unwrap_or_else(|| "Unassigned".to_string());

    let account = txn.account_label().unwrap_or("");

    format!(
        "{} {:10} {:30} {:18} {:>12} {:16}",
        txn.id,
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.description, 30),
        truncate(account, 18),
        txn.amount.format_with_symbol(symbol),
        truncate(&category, 16)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:30} {:18} {:>12} {:16}\n",
        "Id", "Date", "Description", "Account", "Amount", "Category"
    ));
    output.push_str(&"-".repeat(104));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, category_names, symbol));
        output.push('\n');
    }

    output
}

/// Truncate a string to a maximum display width
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn txn(description: &str, cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(cents),
            description,
        )
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }

    #[test]
    fn test_row_unassigned() {
        let row = format_transaction_row(&txn("Albert Heijn", -5000), &HashMap::new(), "€");
        assert!(row.contains("2025-01-15"));
        assert!(row.contains("Albert Heijn"));
        assert!(row.contains("-€50.00"));
        assert!(row.contains("Unassigned"));
    }

    #[test]
    fn test_row_with_category() {
        let mut transaction = txn("Albert Heijn", -5000);
        let cat_id = CategoryId::new();
        transaction.set_category(cat_id);

        let mut names = HashMap::new();
        names.insert(cat_id, "Groceries".to_string());

        let row = format_transaction_row(&transaction, &names, "€");
        assert!(row.contains("Groceries"));
    }

    #[test]
    fn test_register() {
        let transactions = vec![txn("Albert Heijn", -5000), txn("Salaris", 250000)];
        let output = format_transaction_register(&transactions, &HashMap::new(), "€");

        assert!(output.contains("Description"));
        assert!(output.contains("Albert Heijn"));
        assert!(output.contains("€2500.00"));
    }

    #[test]
    fn test_empty_register() {
        let output = format_transaction_register(&[], &HashMap::new(), "€");
        assert_eq!(output, "No transactions found.\n");
    }
}
