//! Import CLI command
//!
//! Imports a Rabobank CSV export into the transaction store.

use clap::Args;

use crate::error::{KasboekError, KasboekResult};
use crate::services::{CategoryService, ImportService};
use crate::services::import::ImportOptions;
use crate::storage::Storage;

/// Arguments for the import command
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the CSV export
    pub file: String,

    /// Default category (name or ID) for imported transactions
    #[arg(short, long)]
    pub category: Option<String>,

    /// Per-account category mapping, as IBAN=CATEGORY (repeatable)
    #[arg(long = "account-category", value_name = "IBAN=CATEGORY")]
    pub account_category: Vec<String>,

    /// Import rows whose bank reference is already stored
    #[arg(long)]
    pub include_duplicates: bool,
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, args: ImportArgs) -> KasboekResult<()> {
    let categories = CategoryService::new(storage);

    let mut options = ImportOptions {
        include_duplicates: args.include_duplicates,
        ..Default::default()
    };

    if let Some(identifier) = &args.category {
        let category = categories
            .find(identifier)?
            .ok_or_else(|| KasboekError::category_not_found(identifier))?;
        options.default_category = Some(category.id);
    }

    for mapping in &args.account_category {
        let (iban, identifier) = mapping.split_once('=').ok_or_else(|| {
            KasboekError::Validation(format!(
                "Invalid account mapping '{}': expected IBAN=CATEGORY",
                mapping
            ))
        })?;
        let category = categories
            .find(identifier)?
            .ok_or_else(|| KasboekError::category_not_found(identifier))?;
        options
            .category_by_iban
            .insert(iban.trim().to_string(), category.id);
    }

    let service = ImportService::new(storage);
    let result = service.import_file(&args.file, &options)?;

    println!("Imported {} transaction(s) from {}", result.imported, args.file);
    if result.duplicates_skipped > 0 {
        println!("  Skipped {} duplicate(s)", result.duplicates_skipped);
    }
    if result.errors > 0 {
        println!("  {} row(s) could not be imported:", result.errors);
        let mut rows: Vec<_> = result.error_messages.iter().collect();
        rows.sort_by_key(|(row, _)| **row);
        for (row, message) in rows {
            println!("    row {}: {}", row + 2, message); // +2: header and 1-based rows
        }
    }

    Ok(())
}
