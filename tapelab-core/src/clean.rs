//! The Cleaner — pure, total, per-record normalization.
//!
//! `clean` never fails and never drops a record: every `RawRecord` maps
//! to exactly one `CleanRecord`. Each field rule applies independently,
//! so records can be cleaned in any order (or in parallel).

use chrono::DateTime;

use crate::domain::{CleanRecord, RawRecord, NANOS_PER_SEC};

/// Normalize one raw record into a clean record.
///
/// Rules, per field:
/// - `trade_date`: epoch + floor(`trade_timestamp` / 1e9) seconds.
///   Floor division (`div_euclid`), so pre-epoch timestamps truncate
///   downward rather than toward zero.
/// - `open`, `high`, `low`, `close`: negative values clamp to 0.
/// - `dividends`, `stock_splits`: null fills to 0; no sign clamp on
///   these two (asymmetric with prices, intentional).
/// - `symbol`, `company`, `volume`, `trade_timestamp`: pass through.
pub fn clean(raw: RawRecord) -> CleanRecord {
    let secs = raw.trade_timestamp.div_euclid(NANOS_PER_SEC);
    // Any i64 nanosecond count floors to within ±293 years of the epoch,
    // inside chrono's representable range.
    let trade_date = DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default();

    CleanRecord {
        trade_timestamp: raw.trade_timestamp,
        trade_date,
        symbol: raw.symbol,
        company: raw.company,
        open: clamp_price(raw.open),
        high: clamp_price(raw.high),
        low: clamp_price(raw.low),
        close: clamp_price(raw.close),
        volume: raw.volume,
        dividends: fill_null(raw.dividends),
        stock_splits: fill_null(raw.stock_splits),
    }
}

/// Negative prices clamp to 0; everything else passes through unchanged.
pub fn clamp_price(price: f64) -> f64 {
    if price < 0.0 {
        0.0
    } else {
        price
    }
}

/// Null fills to 0; present values pass through unchanged.
pub fn fill_null(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}
