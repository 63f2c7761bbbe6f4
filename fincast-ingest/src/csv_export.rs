//! Parse bank CSV exports into typed transaction records.
//!
//! Exports differ per bank but usually carry a header row naming at least
//! Date and Amount columns, sometimes preceded by preamble rows. Rows before
//! a recognizable header are skipped, as are rows without a date cell.

use anyhow::{Context, Result};
use fincast_core::TransactionRecord;
use regex::Regex;
use std::io::Read;
use std::path::Path;

/// Column layout detected from a header row.
struct Columns {
    date: usize,
    amount: usize,
    category: Option<usize>,
    id: Option<usize>,
}

impl Columns {
    /// A header row must name at least date and amount columns.
    fn detect(record: &csv::StringRecord) -> Option<Self> {
        let mut date = None;
        let mut amount = None;
        let mut category = None;
        let mut id = None;

        for (i, field) in record.iter().enumerate() {
            match field.trim().to_lowercase().as_str() {
                "date" | "transaction date" | "trans date" => date = Some(i),
                "amount" | "debit" => amount = Some(i),
                "category" => category = Some(i),
                "id" | "reference" | "transaction id" => id = Some(i),
                _ => {}
            }
        }

        Some(Self {
            date: date?,
            amount: amount?,
            category,
            id,
        })
    }
}

/// Parse a CSV export file, returning all usable transactions.
pub fn parse_transactions_csv(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_transactions_reader(file)
}

/// Parse CSV transaction data from any reader.
///
/// Amount cells are cleaned of currency symbols and thousands separators;
/// anything still unparseable coerces to 0.0. Dates pass through as text
/// for the engine's aggregator to parse.
pub fn parse_transactions_reader(reader: impl Read) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let amount_re = Regex::new(r"[^0-9.\-]")?;

    let mut columns: Option<Columns> = None;
    let mut txns = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let Some(cols) = &columns else {
            columns = Columns::detect(&record);
            continue;
        };

        let date = record.get(cols.date).unwrap_or("").trim();
        if date.is_empty() {
            continue;
        }

        let raw_amount = record.get(cols.amount).unwrap_or("0");
        let amount: f64 = amount_re
            .replace_all(raw_amount, "")
            .parse()
            .unwrap_or(0.0);

        let category = cols
            .category
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string();
        let id = cols
            .id
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("csv-{:04}", txns.len() + 1));

        txns.push(TransactionRecord {
            id,
            category,
            amount,
            date: date.to_string(),
        });
    }

    Ok(txns)
}
