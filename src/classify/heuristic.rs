//! Local heuristic classifier
//!
//! Best-effort categorisation when the remote model is unavailable or
//! unreliable: first by token overlap with previously labelled transactions,
//! then by a keyword table of common merchants and terms.

use std::collections::HashSet;

use crate::models::Transaction;

use super::{LabelledExample, Suggestion};

/// Keyword fragments mapped to suggested category names
///
/// Matched against the lowercased transaction text. Suggested names are
/// resolved against the user's existing categories before being returned.
const KEYWORD_MAP: &[(&str, &str)] = &[
    ("grocery", "Groceries"),
    ("supermarket", "Groceries"),
    ("albert heijn", "Groceries"),
    ("jumbo", "Groceries"),
    ("aldi", "Groceries"),
    ("lidl", "Groceries"),
    ("rent", "Rent"),
    ("huur", "Rent"),
    ("mortgage", "Housing"),
    ("hypotheek", "Housing"),
    ("uber", "Transport"),
    ("taxi", "Transport"),
    ("fuel", "Transport"),
    ("shell", "Transport"),
    ("ns reizigers", "Transport"),
    ("starbucks", "Dining"),
    ("coffee", "Dining"),
    ("restaurant", "Dining"),
    ("dining", "Dining"),
    ("thuisbezorgd", "Dining"),
    ("salary", "Income"),
    ("salaris", "Income"),
    ("payroll", "Income"),
    ("bonus", "Income"),
    ("electric", "Utilities"),
    ("energie", "Utilities"),
    ("internet", "Utilities"),
    ("broadband", "Utilities"),
    ("water", "Utilities"),
    ("insurance", "Insurance"),
    ("verzekering", "Insurance"),
    ("pharmacy", "Healthcare"),
    ("apotheek", "Healthcare"),
    ("gym", "Healthcare"),
    ("fitness", "Healthcare"),
];

/// Suggest a category without calling the remote model
pub fn suggest(
    transaction: &Transaction,
    existing_categories: &[String],
    examples: &[LabelledExample],
    max_examples: usize,
) -> Option<Suggestion> {
    match_from_examples(transaction, examples, max_examples)
        .or_else(|| match_from_keywords(transaction, existing_categories))
}

/// Look for similar, previously categorised transactions
pub fn match_from_examples(
    transaction: &Transaction,
    examples: &[LabelledExample],
    max_examples: usize,
) -> Option<Suggestion> {
    let tokens = tokenize(&transaction.classifier_text());
    if tokens.is_empty() {
        return None;
    }

    let recent = &examples[examples.len().saturating_sub(max_examples)..];
    for example in recent.iter().rev() {
        let example_tokens = tokenize(&example.transaction.classifier_text());
        if example_tokens.is_empty() {
            continue;
        }
        if tokens.intersection(&example_tokens).next().is_some() {
            let confidence = if transaction.description == example.transaction.description {
                0.85
            } else {
                0.7
            };
            return Some(Suggestion {
                category: example.category.clone(),
                confidence,
            });
        }
    }
    None
}

/// Apply the keyword table to the transaction text
pub fn match_from_keywords(
    transaction: &Transaction,
    existing_categories: &[String],
) -> Option<Suggestion> {
    let text = transaction.classifier_text().to_lowercase();
    if text.is_empty() {
        return None;
    }

    for (keyword, category) in KEYWORD_MAP {
        if text.contains(keyword) {
            return Some(Suggestion {
                category: resolve_category_name(category, existing_categories),
                confidence: 0.6,
            });
        }
    }
    None
}

/// Adjust a suggested name to match an existing category name
///
/// Exact case-insensitive match wins, then substring match in either
/// direction; otherwise the suggestion is returned as-is (and a new category
/// may be created when it is applied).
pub fn resolve_category_name(suggestion: &str, existing_categories: &[String]) -> String {
    let suggestion_lower = suggestion.to_lowercase();

    for name in existing_categories {
        if name.to_lowercase() == suggestion_lower {
            return name.clone();
        }
    }
    for name in existing_categories {
        let lowered = name.to_lowercase();
        if lowered.contains(&suggestion_lower) || suggestion_lower.contains(&lowered) {
            return name.clone();
        }
    }
    suggestion.to_string()
}

/// Lowercase keyword set for a piece of transaction text
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
