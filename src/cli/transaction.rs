//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing, assigning, and deleting
//! transactions.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::format_transaction_register;
use crate::error::{KasboekError, KasboekResult};
use crate::models::{Money, TransactionId};
use crate::services::{
    CategoryService, CreateTransactionInput, TransactionFilter, TransactionService,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Amount (negative for outflow, e.g., "-12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Description
        description: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Counterparty name
        #[arg(long)]
        counterparty: Option<String>,
    },

    /// List transactions
    List {
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Only unassigned transactions
        #[arg(short, long)]
        unassigned: bool,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Assign one or more transactions to a category
    Assign {
        /// Transaction IDs
        #[arg(required = true)]
        transactions: Vec<String>,
        /// Target category name or ID
        #[arg(short, long)]
        to: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        transaction: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> KasboekResult<()> {
    let service = TransactionService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            category,
            date,
            counterparty,
        } => {
            let amount = Money::parse(&amount)
                .map_err(|e| KasboekError::Validation(format!("Invalid amount: {}", e)))?;

            let category_id = match category {
                Some(identifier) => Some(
                    categories
                        .find(&identifier)?
                        .ok_or_else(|| KasboekError::category_not_found(&identifier))?
                        .id,
                ),
                None => None,
            };

            let date = parse_date(date.as_deref(), &settings.date_format)?;

            let txn = service.create(CreateTransactionInput {
                date,
                amount,
                description,
                category_id,
                account_iban: None,
                account_name: None,
                counterparty,
                reference: None,
            })?;

            println!("Recorded transaction: {}", txn);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            category,
            unassigned,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(identifier) = category {
                let cat = categories
                    .find(&identifier)?
                    .ok_or_else(|| KasboekError::category_not_found(&identifier))?;
                filter = filter.category(cat.id);
            }
            if unassigned {
                filter = filter.unassigned();
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(Some(from.as_str()), &settings.date_format)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(Some(to.as_str()), &settings.date_format)?);
            }

            let transactions = service.list(&filter)?;
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

        TransactionCommands::Assign { transactions, to } => {
            let category = categories
                .find(&to)?
                .ok_or_else(|| KasboekError::category_not_found(&to))?;

            let ids = transactions
                .iter()
                .map(|s| {
                    s.parse::<TransactionId>()
                        .map_err(|_| KasboekError::transaction_not_found(s.clone()))
                })
                .collect::<KasboekResult<Vec<_>>>()?;

            let assigned = service.assign_category_bulk(&ids, category.id)?;
            println!(
                "Assigned {} transaction(s) to '{}'",
                assigned.len(),
                category.name
            );
        }

        TransactionCommands::Delete { transaction } => {
            let txn = service
                .find(&transaction)?
                .ok_or_else(|| KasboekError::transaction_not_found(&transaction))?;

            service.delete(txn.id)?;
            println!("Deleted transaction: {}", txn);
        }
    }

    Ok(())
}

/// Parse a date argument, defaulting to today
fn parse_date(value: Option<&str>, format: &str) -> KasboekResult<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, format)
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map_err(|_| KasboekError::Validation(format!("Invalid date: '{}'", s))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
