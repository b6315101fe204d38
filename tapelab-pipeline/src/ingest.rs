//! CSV ingest — headered raw-record input with per-row rejection.
//!
//! A row that fails to parse (missing or malformed required field,
//! wrong field count, negative volume) is skipped and reported with its
//! line number; a single bad record never aborts the run. Empty
//! `dividends`/`stock_splits` fields deserialize to null and are filled
//! by the Cleaner downstream.

use std::io;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;
use thiserror::Error;

use tapelab_core::domain::RawRecord;

/// Required input columns, matched by name against the header row.
pub const EXPECTED_COLUMNS: [&str; 10] = [
    "trade_timestamp",
    "symbol",
    "company",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "dividends",
    "stock_splits",
];

/// Errors that abort ingest entirely (as opposed to per-row rejection).
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read input CSV: {0}")]
    Read(#[from] csv::Error),

    #[error("missing required column '{0}' in header")]
    MissingColumn(String),
}

/// One rejected input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    /// 1-based line number in the input file.
    pub line: u64,
    pub reason: String,
}

/// Outcome of reading an input file: parsed records plus rejections.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<RowRejection>,
}

/// Read raw records from a CSV file on disk.
pub fn read_records_from_path(path: &Path) -> Result<IngestReport, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_records(&mut reader)
}

/// Read raw records from any CSV reader.
///
/// Validates the header against [`EXPECTED_COLUMNS`], then reads row by
/// row: parse failures and negative-volume rows are collected as
/// [`RowRejection`]s rather than errors.
pub fn read_records<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<IngestReport, IngestError> {
    let headers = reader.headers()?.clone();
    for column in EXPECTED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut row = StringRecord::new();

    loop {
        match reader.read_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {
                let line = row.position().map(|p| p.line()).unwrap_or(0);
                match row.deserialize::<RawRecord>(Some(&headers)) {
                    Ok(raw) if raw.volume < 0 => rejected.push(RowRejection {
                        line,
                        reason: format!("negative volume {}", raw.volume),
                    }),
                    Ok(raw) => records.push(raw),
                    Err(err) => rejected.push(RowRejection {
                        line,
                        reason: err.to_string(),
                    }),
                }
            }
            Err(err) => {
                // Structural row errors (e.g. wrong field count) reject
                // the row and reading continues on the next one.
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                rejected.push(RowRejection {
                    line,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(IngestReport { records, rejected })
}
