//! Budget CLI commands
//!
//! Shows the planned/actual rollup overview and the unassigned register.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::format_budget_overview;
use crate::display::transaction::format_transaction_register;
use crate::error::KasboekResult;
use crate::services::{RollupService, TransactionService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show planned vs actual per category
    Overview,

    /// List transactions that have no category yet
    Unassigned,
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> KasboekResult<()> {
    match cmd {
        BudgetCommands::Overview => {
            let overview = RollupService::new(storage).overview()?;
            print!(
                "{}",
                format_budget_overview(&overview, &settings.currency_symbol)
            );
        }

        BudgetCommands::Unassigned => {
            let transactions = TransactionService::new(storage).list_unassigned()?;
            let names: HashMap<_, _> = storage
                .categories
                .get_all()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!(
                "{}",
                format_transaction_register(&transactions, &names, &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
