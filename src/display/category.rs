//! Category display formatting
//!
//! Formats the budget overview table and category details for terminal
//! output.

use crate::models::Category;
use crate::services::rollup::{BudgetOverview, CategoryRollup};

/// Format the budget overview as a planned/actual/difference table
pub fn format_budget_overview(overview: &BudgetOverview, symbol: &str) -> String {
    if overview.rollups.is_empty() && overview.unassigned_count == 0 {
        return "No categories found.\n\nRun 'kasboek init' to create default categories."
            .to_string();
    }

    let name_width = overview
        .rollups
        .iter()
        .map(|r| r.category.name.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:name_width$}  {:>12}  {:>12}  {:>12}  {:>5}\n",
        "Category", "Planned", "Actual", "Diff", "Txns"
    ));
    output.push_str(&"-".repeat(name_width + 2 + 12 + 2 + 12 + 2 + 12 + 2 + 5));
    output.push('\n');

    for rollup in &overview.rollups {
        output.push_str(&format!(
            "{:name_width$}  {:>12}  {:>12}  {:>12}  {:>5}\n",
            rollup.category.name,
            rollup.category.planned.format_with_symbol(symbol),
            rollup.actual.format_with_symbol(symbol),
            rollup.difference.format_with_symbol(symbol),
            rollup.transaction_count
        ));
    }

    output.push_str(&"-".repeat(name_width + 2 + 12 + 2 + 12 + 2 + 12 + 2 + 5));
    output.push('\n');
    output.push_str(&format!(
        "{:name_width$}  {:>12}  {:>12}\n",
        "Total",
        overview.total_planned.format_with_symbol(symbol),
        overview.total_actual.format_with_symbol(symbol)
    ));

    if overview.unassigned_count > 0 {
        output.push_str(&format!(
            "\n{} unassigned transaction{} totalling {}\n",
            overview.unassigned_count,
            if overview.unassigned_count == 1 { "" } else { "s" },
            overview.unassigned_total.format_with_symbol(symbol)
        ));
    }

    output
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    for category in categories {
        output.push_str(&format!(
            "{:name_width$}  planned {}  ({})\n",
            category.name, category.planned, category.id
        ));
    }
    output
}

/// Format details for a single category with its rollup
pub fn format_category_details(rollup: &CategoryRollup, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Category: {}\n", rollup.category.name));
    output.push_str(&format!("  ID:         {}\n", rollup.category.id));
    output.push_str(&format!(
        "  Planned:    {}\n",
        rollup.category.planned.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Actual:     {}\n",
        rollup.actual.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Difference: {}\n",
        rollup.difference.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Transactions: {}\n", rollup.transaction_count));

    if !rollup.category.notes.is_empty() {
        output.push_str(&format!("  Notes: {}\n", rollup.category.notes));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn rollup(name: &str, planned: i64, actual: i64, count: usize) -> CategoryRollup {
        let category = Category::new(name, Money::from_cents(planned));
        CategoryRollup {
            actual: Money::from_cents(actual),
            difference: category.planned - Money::from_cents(actual),
            transaction_count: count,
            category,
        }
    }

    #[test]
    fn test_empty_overview() {
        let overview = BudgetOverview {
            rollups: Vec::new(),
            total_planned: Money::zero(),
            total_actual: Money::zero(),
            unassigned_total: Money::zero(),
            unassigned_count: 0,
        };

        let output = format_budget_overview(&overview, "€");
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_overview_table() {
        let overview = BudgetOverview {
            rollups: vec![rollup("Groceries", 40000, -12500, 3)],
            total_planned: Money::from_cents(40000),
            total_actual: Money::from_cents(-12500),
            unassigned_total: Money::from_cents(-2000),
            unassigned_count: 1,
        };

        let output = format_budget_overview(&overview, "€");
        assert!(output.contains("Groceries"));
        assert!(output.contains("€400.00"));
        assert!(output.contains("-€125.00"));
        assert!(output.contains("Total"));
        assert!(output.contains("1 unassigned transaction totalling -€20.00"));
    }

    #[test]
    fn test_category_details() {
        let output = format_category_details(&rollup("Groceries", 40000, -12500, 3), "€");
        assert!(output.contains("Category: Groceries"));
        assert!(output.contains("Planned:    €400.00"));
        assert!(output.contains("Actual:     -€125.00"));
        assert!(output.contains("Transactions: 3"));
    }

    #[test]
    fn test_category_list() {
        let categories = vec![Category::new("Groceries", Money::from_cents(40000))];
        let output = format_category_list(&categories);
        assert!(output.contains("Groceries"));

        assert_eq!(format_category_list(&[]), "No categories found.");
    }
}
