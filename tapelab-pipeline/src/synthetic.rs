//! Deterministic synthetic raw records for demos and tests.
//!
//! Each symbol's series is a random walk seeded from a BLAKE3 hash of
//! the symbol name, so the same symbol always produces the same data
//! and different symbols diverge. The generator emits the occasional
//! dividend, split day, absent corporate-action field, and negative
//! price so the Cleaner's rules are exercised end to end.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tapelab_core::domain::{RawRecord, NANOS_PER_SEC};

/// Generate `days` calendar days of raw records for one symbol,
/// starting at `start` and skipping weekends.
pub fn generate_raw_records(
    symbol: &str,
    company: &str,
    start: NaiveDate,
    days: u32,
) -> Vec<RawRecord> {
    // Deterministic seed from the symbol name.
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut records = Vec::new();
    let mut price = rng.gen_range(50.0..500.0_f64);
    let mut current = start;

    for _ in 0..days {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(100_000..5_000_000i64);

        // Quarterly-ish dividends; rare split days; absent otherwise.
        let dividends = if rng.gen_ratio(1, 60) {
            Some(round3(rng.gen_range(0.1..2.0)))
        } else {
            None
        };
        let stock_splits = if rng.gen_ratio(1, 400) {
            Some(if rng.gen_bool(0.5) { 2.0 } else { 5.0 })
        } else {
            None
        };

        // A rare dirty row: negative open, clamped by the Cleaner.
        let open = if rng.gen_ratio(1, 200) { -open } else { open };

        let ts = current
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp()
            * NANOS_PER_SEC;

        records.push(RawRecord {
            trade_timestamp: ts,
            symbol: symbol.to_string(),
            company: company.to_string(),
            open: round3(open),
            high: round3(high),
            low: round3(low),
            close: round3(close),
            volume,
            dividends,
            stock_splits,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    records
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
