//! Rabobank CSV import service
//!
//! Parses the bank's transaction export into transaction records,
//! deduplicates against existing data by bank reference, and tracks the
//! source account of every imported row.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{KasboekError, KasboekResult};
use crate::models::{CategoryId, Money, Transaction};
use crate::storage::Storage;

/// Column positions resolved from the export's header row
///
/// Rabobank exports are header-keyed, not position-keyed; column order has
/// changed between export revisions, so every lookup goes through here.
#[derive(Debug, Clone)]
struct RabobankLayout {
    iban: usize,
    date: usize,
    interest_date: Option<usize>,
    amount: usize,
    counterparty: Option<usize>,
    initiating_party: Option<usize>,
    descriptions: Vec<usize>,
    reference: Option<usize>,
    mandate: Option<usize>,
    batch_id: Option<usize>,
    sequence: Option<usize>,
}

impl RabobankLayout {
    /// Resolve the layout from a header record
    ///
    /// The "Naam initiërende partij" header is matched by prefix: exports in
    /// the bank's legacy encoding mangle the accented character.
    fn from_headers(headers: &StringRecord) -> KasboekResult<Self> {
        let mut iban = None;
        let mut date = None;
        let mut interest_date = None;
        let mut amount = None;
        let mut counterparty = None;
        let mut initiating_party = None;
        let mut descriptions = Vec::new();
        let mut reference = None;
        let mut mandate = None;
        let mut batch_id = None;
        let mut sequence = None;

        for (idx, header) in headers.iter().enumerate() {
            // The first header may carry a UTF-8 BOM
            let h = header.trim_start_matches('\u{feff}').trim();

            match h {
                "IBAN/BBAN" => iban = Some(idx),
                "Datum" => date = Some(idx),
                "Rentedatum" => interest_date = Some(idx),
                "Bedrag" => amount = Some(idx),
                "Naam tegenpartij" => counterparty = Some(idx),
                "Transactiereferentie" => reference = Some(idx),
                "Machtigingskenmerk" => mandate = Some(idx),
                "Batch ID" => batch_id = Some(idx),
                "Volgnr" => sequence = Some(idx),
                "Omschrijving-1" | "Omschrijving-2" | "Omschrijving-3" => {
                    descriptions.push(idx)
                }
                _ if h.starts_with("Naam initi") => initiating_party = Some(idx),
                _ => {}
            }
        }

        match (iban, date, amount) {
            (Some(iban), Some(date), Some(amount)) => Ok(Self {
                iban,
                date,
                interest_date,
                amount,
                counterparty,
                initiating_party,
                descriptions,
                reference,
                mandate,
                batch_id,
                sequence,
            }),
            _ => Err(KasboekError::Import(
                "File does not look like a Rabobank export (missing IBAN/BBAN, Datum, or Bedrag column)"
                    .into(),
            )),
        }
    }
}

/// A transaction parsed from the CSV before import
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub account_iban: String,
    pub account_name: Option<String>,
    pub counterparty: Option<String>,
    pub reference: Option<String>,
    /// Original row number in the CSV (0-indexed, excluding header)
    pub row_number: usize,
}

/// Status of a record for import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Record will be imported
    New,
    /// Record matches an existing reference and will be skipped
    Duplicate,
    /// Record has an error and cannot be imported
    Error(String),
}

/// Preview entry for import review
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub record: Option<ParsedRecord>,
    pub status: ImportStatus,
    pub row_number: usize,
}

/// Options controlling how parsed records become transactions
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Category per source IBAN
    pub category_by_iban: HashMap<String, CategoryId>,
    /// Fallback category when no IBAN mapping matches
    pub default_category: Option<CategoryId>,
    /// Import rows whose reference already exists
    pub include_duplicates: bool,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of transactions imported
    pub imported: usize,
    /// Number of duplicates skipped
    pub duplicates_skipped: usize,
    /// Number of rows with errors
    pub errors: usize,
    /// Error messages by row
    pub error_messages: HashMap<usize, String>,
}

/// Service for Rabobank CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read and parse an export file
    ///
    /// Row-level problems are returned as per-row errors; only an unreadable
    /// file or an unrecognized header row fails the whole call.
    pub fn parse_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> KasboekResult<Vec<Result<ParsedRecord, String>>> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            KasboekError::Import(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        // Exports are UTF-8 (optionally with BOM) or Windows-1252; lossy
        // decoding keeps the latter importable.
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        self.parse_reader(&mut reader)
    }

    /// Parse an export from any reader
    pub fn parse_reader<R: std::io::Read>(
        &self,
        reader: &mut csv::Reader<R>,
    ) -> KasboekResult<Vec<Result<ParsedRecord, String>>> {
        let headers = reader
            .headers()
            .map_err(|e| KasboekError::Import(format!("Failed to read CSV headers: {}", e)))?
            .clone();
        let layout = RabobankLayout::from_headers(&headers)?;

        let mut results = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    results.push(Err(format!("Error reading CSV record: {}", e)));
                    continue;
                }
            };

            // Rows without an IBAN are trailer/padding lines, not data
            let iban = field(&record, Some(layout.iban));
            if iban.is_empty() {
                continue;
            }

            results.push(parse_record(&record, idx, &layout, iban));
        }

        Ok(results)
    }

    /// Generate an import preview, checking for duplicates
    ///
    /// A reference counts as duplicate when it is already stored, or when an
    /// earlier row in the same file carries it.
    pub fn generate_preview(
        &self,
        parsed: &[Result<ParsedRecord, String>],
    ) -> KasboekResult<Vec<ImportPreviewEntry>> {
        let mut preview = Vec::with_capacity(parsed.len());
        let mut seen_in_batch: std::collections::HashSet<String> = std::collections::HashSet::new();

        for (idx, result) in parsed.iter().enumerate() {
            match result {
                Ok(record) => {
                    let duplicate = match &record.reference {
                        Some(reference) => {
                            self.storage.transactions.has_reference(reference)?
                                || !seen_in_batch.insert(reference.clone())
                        }
                        None => false,
                    };

                    preview.push(ImportPreviewEntry {
                        row_number: record.row_number,
                        record: Some(record.clone()),
                        status: if duplicate {
                            ImportStatus::Duplicate
                        } else {
                            ImportStatus::New
                        },
                    });
                }
                Err(e) => {
                    preview.push(ImportPreviewEntry {
                        record: None,
                        status: ImportStatus::Error(e.clone()),
                        row_number: idx,
                    });
                }
            }
        }

        Ok(preview)
    }

    /// Import transactions from a preview
    pub fn import_from_preview(
        &self,
        preview: &[ImportPreviewEntry],
        options: &ImportOptions,
    ) -> KasboekResult<ImportResult> {
        // Validate category mappings up front so a typo doesn't half-import
        for cat_id in options
            .category_by_iban
            .values()
            .chain(options.default_category.iter())
        {
            self.storage
                .categories
                .get(*cat_id)?
                .ok_or_else(|| KasboekError::category_not_found(cat_id.to_string()))?;
        }

        let mut result = ImportResult::default();

        for entry in preview {
            match &entry.status {
                ImportStatus::New => {
                    if let Some(record) = &entry.record {
                        self.insert_record(record, options)?;
                        result.imported += 1;
                    }
                }
                ImportStatus::Duplicate => {
                    if options.include_duplicates {
                        if let Some(record) = &entry.record {
                            self.insert_record(record, options)?;
                            result.imported += 1;
                        }
                    } else {
                        result.duplicates_skipped += 1;
                    }
                }
                ImportStatus::Error(e) => {
                    result.errors += 1;
                    result.error_messages.insert(entry.row_number, e.clone());
                }
            }
        }

        if result.imported > 0 {
            self.storage.transactions.save()?;
        }

        Ok(result)
    }

    /// Insert one parsed record as a transaction
    fn insert_record(&self, record: &ParsedRecord, options: &ImportOptions) -> KasboekResult<()> {
        let category_id = options
            .category_by_iban
            .get(&record.account_iban)
            .copied()
            .or(options.default_category);

        let mut txn = Transaction::new(record.date, record.amount, record.description.clone());
        txn.category_id = category_id;
        txn.account_iban = Some(record.account_iban.clone());
        txn.account_name = record.account_name.clone();
        txn.counterparty = record.counterparty.clone();
        txn.reference = record.reference.clone();

        self.storage.transactions.upsert(txn)
    }

    /// Parse, preview, and import a file in one call
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ImportOptions,
    ) -> KasboekResult<ImportResult> {
        let parsed = self.parse_file(path)?;
        let preview = self.generate_preview(&parsed)?;
        self.import_from_preview(&preview, options)
    }
}

/// Get a trimmed field by optional column index
fn field<'r>(record: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

/// Parse a single data row
fn parse_record(
    record: &StringRecord,
    row_number: usize,
    layout: &RabobankLayout,
    iban: &str,
) -> Result<ParsedRecord, String> {
    let date = pick_date(record, layout)
        .ok_or_else(|| format!("Row {}: unable to determine transaction date", row_number))?;

    let amount = Money::parse_eu(field(record, Some(layout.amount)))
        .map_err(|e| format!("Row {}: {}", row_number, e))?;

    let counterparty = non_empty(field(record, layout.counterparty));
    let reference = pick_reference(record, layout);
    let description = build_description(record, layout, counterparty.as_deref(), reference.as_deref());
    let account_name = pick_account_name(record, layout, counterparty.as_deref());

    Ok(ParsedRecord {
        date,
        amount,
        description,
        account_iban: iban.to_string(),
        account_name,
        counterparty,
        reference,
        row_number,
    })
}

/// Take the booking date, falling back to the interest date
fn pick_date(record: &StringRecord, layout: &RabobankLayout) -> Option<NaiveDate> {
    for idx in [Some(layout.date), layout.interest_date].into_iter().flatten() {
        let value = field(record, Some(idx));
        if value.is_empty() {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

/// Assemble a description from counterparty, description columns, and reference
fn build_description(
    record: &StringRecord,
    layout: &RabobankLayout,
    counterparty: Option<&str>,
    reference: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();

    let candidates = counterparty
        .into_iter()
        .map(str::to_string)
        .chain(layout.descriptions.iter().map(|idx| field(record, Some(*idx)).to_string()));

    for value in candidates {
        if !value.is_empty() && seen.insert(value.clone()) {
            parts.push(value);
        }
    }

    if let Some(reference) = reference {
        if !seen.contains(reference) {
            parts.push(reference.to_string());
        }
    }

    if parts.is_empty() {
        "Transaction".to_string()
    } else {
        parts.join(" | ")
    }
}

/// First non-empty of the reference-bearing columns
fn pick_reference(record: &StringRecord, layout: &RabobankLayout) -> Option<String> {
    [
        layout.reference,
        layout.mandate,
        layout.batch_id,
        layout.sequence,
    ]
    .into_iter()
    .flatten()
    .map(|idx| field(record, Some(idx)))
    .find(|value| !value.is_empty())
    .map(str::to_string)
}

/// Initiating party name, unless it just repeats the counterparty
fn pick_account_name(
    record: &StringRecord,
    layout: &RabobankLayout,
    counterparty: Option<&str>,
) -> Option<String> {
    let party = field(record, layout.initiating_party);
    if party.is_empty() || Some(party) == counterparty {
        None
    } else {
        Some(party.to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
