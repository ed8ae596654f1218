//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::{KasboekError, KasboekResult};
use crate::models::Money;
use crate::services::{CategoryService, RollupService};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Planned amount (e.g., "500" or "500.00")
        #[arg(short, long)]
        planned: Option<String>,
    },

    /// Show category details with its rollup
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New planned amount
        #[arg(short, long)]
        planned: Option<String>,
    },

    /// Delete a category and the transactions assigned to it
    Delete {
        /// Category name or ID
        category: String,
        /// Delete even when transactions are assigned
        #[arg(long)]
        force: bool,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> KasboekResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create { name, planned } => {
            let planned = parse_planned(planned.as_deref())?;
            let category = service.create(&name, planned)?;

            println!("Created category: {}", category.name);
            println!("  Planned: {}", category.planned.format_with_symbol(&settings.currency_symbol));
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KasboekError::category_not_found(&category))?;

            let rollup = RollupService::new(storage).for_category(cat)?;
            print!(
                "{}",
                format_category_details(&rollup, &settings.currency_symbol)
            );
        }

        CategoryCommands::Edit {
            category,
            name,
            planned,
        } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KasboekError::category_not_found(&category))?;

            if name.is_none() && planned.is_none() {
                println!("No changes specified. Use --name or --planned.");
                return Ok(());
            }

            let planned = match planned.as_deref() {
                Some(s) => Some(parse_planned(Some(s))?),
                None => None,
            };

            let updated = service.update(cat.id, name.as_deref(), planned)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category, force } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KasboekError::category_not_found(&category))?;

            let rollup = RollupService::new(storage).for_category(cat.clone())?;
            if rollup.transaction_count > 0 && !force {
                return Err(KasboekError::Validation(format!(
                    "Category '{}' has {} assigned transaction(s) that would be deleted with it. \
                     Use --force to delete anyway.",
                    cat.name, rollup.transaction_count
                )));
            }

            let removed = service.delete(cat.id)?;
            println!("Deleted category: {}", cat.name);
            if removed > 0 {
                println!("  Removed {} assigned transaction(s)", removed);
            }
        }
    }

    Ok(())
}

/// Parse an optional planned amount, defaulting to zero
fn parse_planned(value: Option<&str>) -> KasboekResult<Money> {
    match value {
        Some(s) => Money::parse(s)
            .map_err(|e| KasboekError::Validation(format!("Invalid planned amount: {}", e))),
        None => Ok(Money::zero()),
    }
}
