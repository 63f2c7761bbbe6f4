//! fincast-ingest: bank CSV export ingestion into engine transaction records.

pub mod csv_export;

pub use csv_export::{parse_transactions_csv, parse_transactions_reader};
