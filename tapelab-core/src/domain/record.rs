//! Raw and clean trading records — the fundamental data units.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Nanoseconds per second, for trade-timestamp truncation.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A daily trading record as it arrives from the source, one per row.
///
/// `trade_timestamp` is nanoseconds since the Unix epoch. Prices carry
/// 3-fraction-digit precision by upstream convention. `dividends` and
/// `stock_splits` are the only nullable columns; price fields are
/// required and the ingest layer rejects rows where they are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub trade_timestamp: i64,
    pub symbol: String,
    pub company: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub dividends: Option<f64>,
    pub stock_splits: Option<f64>,
}

/// A trading record after sign-clamping and null-filling.
///
/// Invariants established by [`crate::clean::clean`]:
/// - `open`, `high`, `low`, `close` are all `>= 0`
/// - `dividends` and `stock_splits` are never null
/// - `trade_date` is the calendar timestamp of the floor-truncated
///   second of `trade_timestamp`
///
/// No ordering invariant is enforced between open/high/low/close; the
/// source data is trusted as-is apart from sign. Records are immutable
/// once cleaned, and duplicate `(company, symbol, trade_date)` tuples
/// are legal upstream — the views sum and average across them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub trade_timestamp: i64,
    pub trade_date: NaiveDateTime,
    pub symbol: String,
    pub company: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub dividends: f64,
    pub stock_splits: f64,
}

impl CleanRecord {
    /// Calendar year of the trade date.
    pub fn year(&self) -> i32 {
        self.trade_date.year()
    }

    /// Calendar month of the trade date (1–12).
    pub fn month(&self) -> u32 {
        self.trade_date.month()
    }
}
