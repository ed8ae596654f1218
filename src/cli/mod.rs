//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod classify;
pub mod import;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use classify::{handle_classify_command, ClassifyArgs};
pub use import::{handle_import_command, ImportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};
