//! Rollup service
//!
//! Computes derived planned/actual/difference figures per category from the
//! transaction list. Actual amounts are never stored; every rollup is
//! recomputed from scratch, so edits, imports, and deletes cannot leave
//! stale totals behind.

use std::collections::{HashMap, HashSet};

use crate::error::KasboekResult;
use crate::models::{Category, CategoryId, Money};
use crate::storage::Storage;

/// Derived figures for one category
#[derive(Debug, Clone)]
pub struct CategoryRollup {
    pub category: Category,
    /// Sum of amounts of the transactions assigned to this category
    pub actual: Money,
    /// planned - actual
    pub difference: Money,
    /// Number of assigned transactions
    pub transaction_count: usize,
}

/// Overview of the whole budget
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub rollups: Vec<CategoryRollup>,
    pub total_planned: Money,
    pub total_actual: Money,
    /// Sum of amounts of transactions without a category
    pub unassigned_total: Money,
    /// Number of transactions without a category
    pub unassigned_count: usize,
}

/// Service computing category rollups
pub struct RollupService<'a> {
    storage: &'a Storage,
}

impl<'a> RollupService<'a> {
    /// Create a new rollup service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Compute rollups for all categories plus the unassigned remainder
    ///
    /// Transactions pointing at a category that no longer exists are counted
    /// as unassigned rather than dropped.
    pub fn overview(&self) -> KasboekResult<BudgetOverview> {
        let categories = self.storage.categories.get_all()?;
        let transactions = self.storage.transactions.get_all()?;

        let mut actuals: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        let mut unassigned_total = Money::zero();
        let mut unassigned_count = 0;

        let known: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();

        for txn in &transactions {
            match txn.category_id {
                Some(cat_id) if known.contains(&cat_id) => {
                    let entry = actuals.entry(cat_id).or_insert((Money::zero(), 0));
                    entry.0 += txn.amount;
                    entry.1 += 1;
                }
                _ => {
                    unassigned_total += txn.amount;
                    unassigned_count += 1;
                }
            }
        }

        let mut total_planned = Money::zero();
        let mut total_actual = Money::zero();

        let rollups = categories
            .into_iter()
            .map(|category| {
                let (actual, transaction_count) = actuals
                    .get(&category.id)
                    .copied()
                    .unwrap_or((Money::zero(), 0));
                total_planned += category.planned;
                total_actual += actual;
                let difference = category.planned - actual;
                CategoryRollup {
                    category,
                    actual,
                    difference,
                    transaction_count,
                }
            })
            .collect();

        Ok(BudgetOverview {
            rollups,
            total_planned,
            total_actual,
            unassigned_total,
            unassigned_count,
        })
    }

    /// Compute the rollup for a single category
    pub fn for_category(&self, category: Category) -> KasboekResult<CategoryRollup> {
        let transactions = self.storage.transactions.get_by_category(category.id)?;
        let actual: Money = transactions.iter().map(|t| t.amount).sum();
        let difference = category.planned - actual;
        Ok(CategoryRollup {
            category,
            actual,
            difference,
            transaction_count: transactions.len(),
        })
    }
}
