//! Remote classifier backend
//!
//! Sends a chat-completion request to an OpenAI-compatible API and parses the
//! category suggestion out of the reply. Every failure mode surfaces as a
//! `KasboekError::Classify` so the caller can fall back to the heuristic.

use std::time::Duration;

use crate::config::settings::ClassifierSettings;
use crate::error::{KasboekError, KasboekResult};
use crate::models::Transaction;

use super::{LabelledExample, Suggestion};

const SYSTEM_PROMPT: &str = "You categorise personal finance transactions for a budgeting app. \
     Return concise JSON only. Prefer categories that already exist \
     and be consistent with prior assignments.";

/// Client for the chat-completions endpoint
pub struct RemoteClassifier {
    agent: ureq::Agent,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl RemoteClassifier {
    /// Build a client from settings and the `OPENAI_API_KEY` environment
    /// variable; returns None when no key is configured or the remote
    /// backend is disabled.
    pub fn from_env(settings: &ClassifierSettings) -> Option<Self> {
        if !settings.remote_enabled {
            return None;
        }
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self::new(settings, api_key))
    }

    /// Build a client with an explicit API key
    pub fn new(settings: &ClassifierSettings, api_key: String) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// The model name this client sends
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a classification for one transaction
    pub fn classify(
        &self,
        transaction: &Transaction,
        existing_categories: &[String],
        examples: &[LabelledExample],
        max_examples: usize,
    ) -> KasboekResult<Suggestion> {
        let prompt = build_prompt(transaction, existing_categories, examples, max_examples);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(serde_json::json!({
                "model": self.model,
                "temperature": self.temperature,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": prompt},
                ],
            }))
            .map_err(|e| KasboekError::Classify(format!("API request failed: {}", e)))?;

        let body: serde_json::Value = response
            .into_json()
            .map_err(|e| KasboekError::Classify(format!("Failed to read API response: {}", e)))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("");
        if content.is_empty() {
            return Err(KasboekError::Classify(
                "Model response did not contain any content".into(),
            ));
        }

        parse_response(content).ok_or_else(|| {
            KasboekError::Classify("Could not parse a classification from the model response".into())
        })
    }
}

/// Create a prompt that guides the model to classify the transaction
fn build_prompt(
    transaction: &Transaction,
    existing_categories: &[String],
    examples: &[LabelledExample],
    max_examples: usize,
) -> String {
    let category_section = if existing_categories.is_empty() {
        "(no existing categories)".to_string()
    } else {
        let mut names: Vec<&str> = existing_categories
            .iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.join(", ")
    };

    let recent = &examples[examples.len().saturating_sub(max_examples)..];
    let examples_section = if recent.is_empty() {
        "(no prior examples)".to_string()
    } else {
        recent
            .iter()
            .map(|example| {
                let mut line = describe_transaction(&example.transaction);
                line.push_str(&format!("; Category: {}", example.category));
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut transaction_section = describe_transaction(transaction);
    transaction_section.push_str(&format!("; Occurred On: {}", transaction.date));

    format!(
        "The budgeting app currently has the following categories: {category_section}.\n\
         Here are previously labelled transactions (use them as few-shot learning examples):\n\
         {examples_section}\n\n\
         Classify the following transaction. If no category fits, suggest a concise new one.\n\
         Transaction: {transaction_section}\n\n\
         Respond with strictly valid JSON: {{\"category\": \"<name>\", \"confidence\": <number between 0 and 1>}}"
    )
}

/// One-line summary of a transaction for the prompt
fn describe_transaction(transaction: &Transaction) -> String {
    let mut parts = vec![
        format!(
            "Description: {}",
            if transaction.description.is_empty() {
                "-"
            } else {
                &transaction.description
            }
        ),
        format!("Amount: {}", transaction.amount),
    ];
    if let Some(counterparty) = &transaction.counterparty {
        parts.push(format!("Counterparty: {}", counterparty));
    }
    if let Some(account) = transaction.account_label() {
        parts.push(format!("Account: {}", account));
    }
    if let Some(reference) = &transaction.reference {
        parts.push(format!("Reference: {}", reference));
    }
    parts.join("; ")
}

/// Parse the JSON payload returned by the model
pub fn parse_response(message: &str) -> Option<Suggestion> {
    let payload = extract_json_object(message)?;

    let category = payload.get("category")?.as_str()?.trim().to_string();
    if category.is_empty() {
        return None;
    }

    let confidence = match payload.get("confidence") {
        Some(value) => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(0.5),
        None => 0.5,
    };

    Some(Suggestion {
        category,
        confidence: confidence.clamp(0.0, 1.0),
    })
}

/// Extract the first JSON object embedded in a string
fn extract_json_object(message: &str) -> Option<serde_json::Value> {
    let start = message.find('{')?;
    let end = message.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&message[start..=end]).ok()
}
