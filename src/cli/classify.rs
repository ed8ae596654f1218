//! Classify CLI command
//!
//! Suggests categories for unassigned transactions and optionally applies
//! them.

use clap::Args;

use crate::classify::Classifier;
use crate::config::Settings;
use crate::error::KasboekResult;
use crate::services::ClassifyService;
use crate::storage::Storage;

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Apply the suggestions instead of only printing them
    #[arg(long)]
    pub apply: bool,

    /// Print per-transaction classifier progress
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the classify command
pub fn handle_classify_command(
    storage: &Storage,
    settings: &Settings,
    args: ClassifyArgs,
) -> KasboekResult<()> {
    let service = ClassifyService::new(storage);
    let mut classifier = Classifier::new(settings.classifier.clone());

    if !classifier.has_remote() {
        println!("No OPENAI_API_KEY configured; using the local heuristic classifier.");
    }

    let log: Box<dyn Fn(&str)> = if args.verbose {
        Box::new(|message: &str| println!("{}", message))
    } else {
        Box::new(|_: &str| {})
    };

    let outcomes = service.suggest_for_unassigned(&mut classifier, log.as_ref())?;

    if outcomes.is_empty() {
        println!("No suggestions produced.");
        return Ok(());
    }

    for outcome in &outcomes {
        println!(
            "{} '{}' -> {} (confidence {:.2})",
            outcome.transaction_id,
            outcome.description,
            outcome.suggestion.category,
            outcome.suggestion.confidence
        );
    }

    if args.apply {
        let mut created = 0;
        for outcome in &outcomes {
            if service.apply_suggestion(outcome.transaction_id, &outcome.suggestion.category)? {
                created += 1;
            }
        }
        println!("Applied {} suggestion(s)", outcomes.len());
        if created > 0 {
            println!("  Created {} new categor{}", created, if created == 1 { "y" } else { "ies" });
        }
    } else {
        println!();
        println!("Run with --apply to assign these categories.");
    }

    Ok(())
}
