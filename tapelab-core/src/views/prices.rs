//! Price aggregation: yearly averages and monthly first-to-last change.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::CleanRecord;
use crate::round::round_dp;

/// Mean open and close price for one (company, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAvgPriceRow {
    pub company: String,
    pub year: i32,
    pub avg_open: f64,
    pub avg_close: f64,
}

/// First-to-last close change for one (company, symbol, year, month),
/// with the running yearly mean of those changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPriceChangeRow {
    pub company: String,
    pub symbol: String,
    pub year: i32,
    pub month: u32,
    pub monthly_price_change: f64,
    pub yearly_price_change_running: f64,
}

/// Mean open and close price per (company, year), each rounded to 3
/// decimals. Sorted company ascending, year ascending.
pub fn yearly_avg_price(records: &[CleanRecord]) -> Vec<YearlyAvgPriceRow> {
    let mut groups: BTreeMap<(String, i32), (f64, f64, u64)> = BTreeMap::new();
    for rec in records {
        let entry = groups.entry((rec.company.clone(), rec.year())).or_insert((0.0, 0.0, 0));
        entry.0 += rec.open;
        entry.1 += rec.close;
        entry.2 += 1;
    }

    // Key order already matches the output contract.
    groups
        .into_iter()
        .map(|((company, year), (open_sum, close_sum, count))| YearlyAvgPriceRow {
            company,
            year,
            avg_open: round_dp(open_sum / count as f64, 3),
            avg_close: round_dp(close_sum / count as f64, 3),
        })
        .collect()
}

/// Close endpoints of one (company, year, month) partition.
struct MonthEnds {
    first_date: NaiveDateTime,
    first_close: f64,
    last_date: NaiveDateTime,
    last_close: f64,
}

/// Monthly price change per (company, symbol, year, month) with a
/// running yearly mean.
///
/// The first/last close window is computed per (company, year, month)
/// partition ordered by trade date; one row is then emitted per
/// distinct (company, symbol, year, month), carrying its partition's
/// value. When several records share the earliest (or latest) trade
/// date in a partition, the first-encountered record in input order
/// wins at both ends.
///
/// `monthly_price_change = round(last_close - first_close, 3)`. The
/// running value is the mean of the changes seen so far within the
/// (company, symbol, year) partition ordered by month, left unrounded.
/// Rows sort by company, year, month, then symbol.
pub fn monthly_price_change(records: &[CleanRecord]) -> Vec<MonthlyPriceChangeRow> {
    let mut ends: BTreeMap<(String, i32, u32), MonthEnds> = BTreeMap::new();
    let mut output_keys: BTreeSet<(String, String, i32, u32)> = BTreeSet::new();

    for rec in records {
        output_keys.insert((rec.company.clone(), rec.symbol.clone(), rec.year(), rec.month()));

        match ends.entry((rec.company.clone(), rec.year(), rec.month())) {
            Entry::Vacant(slot) => {
                slot.insert(MonthEnds {
                    first_date: rec.trade_date,
                    first_close: rec.close,
                    last_date: rec.trade_date,
                    last_close: rec.close,
                });
            }
            Entry::Occupied(slot) => {
                let e = slot.into_mut();
                // Strict comparisons keep the first-encountered record
                // on a trade-date tie, at both ends.
                if rec.trade_date < e.first_date {
                    e.first_date = rec.trade_date;
                    e.first_close = rec.close;
                }
                if rec.trade_date > e.last_date {
                    e.last_date = rec.trade_date;
                    e.last_close = rec.close;
                }
            }
        }
    }

    let mut rows = Vec::with_capacity(output_keys.len());
    let mut partition: Option<(String, String, i32)> = None;
    let mut running_sum = 0.0;
    let mut running_months = 0u32;

    for (company, symbol, year, month) in output_keys {
        let key = (company.clone(), symbol.clone(), year);
        if partition.as_ref() != Some(&key) {
            partition = Some(key);
            running_sum = 0.0;
            running_months = 0;
        }

        let month_ends = &ends[&(company.clone(), year, month)];
        let monthly_price_change = round_dp(month_ends.last_close - month_ends.first_close, 3);
        running_sum += monthly_price_change;
        running_months += 1;

        rows.push(MonthlyPriceChangeRow {
            company,
            symbol,
            year,
            month,
            monthly_price_change,
            yearly_price_change_running: running_sum / f64::from(running_months),
        });
    }

    rows.sort_by_key(|r| (r.company.clone(), r.year, r.month, r.symbol.clone()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::domain::{RawRecord, NANOS_PER_SEC};
    use chrono::NaiveDate;

    fn rec_at(
        company: &str,
        symbol: &str,
        open: f64,
        close: f64,
        y: i32,
        m: u32,
        d: u32,
        extra_nanos: i64,
    ) -> CleanRecord {
        let ts = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
            * NANOS_PER_SEC
            + extra_nanos;
        clean(RawRecord {
            trade_timestamp: ts,
            symbol: symbol.into(),
            company: company.into(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1_000,
            dividends: None,
            stock_splits: None,
        })
    }

    fn rec(company: &str, open: f64, close: f64, y: i32, m: u32, d: u32) -> CleanRecord {
        rec_at(company, &format!("{company}-S"), open, close, y, m, d, 0)
    }

    // ── Yearly average price ──

    #[test]
    fn yearly_avg_price_means_and_rounding() {
        let records = vec![
            rec("A", 100.0, 110.0, 2024, 1, 2),
            rec("A", 101.0, 111.0, 2024, 1, 3),
            rec("A", 99.0001, 109.0001, 2024, 1, 4),
        ];
        let rows = yearly_avg_price(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_open, 100.0); // (100 + 101 + 99.0001) / 3 = 100.00003…
        assert_eq!(rows[0].avg_close, 110.0);
    }

    #[test]
    fn yearly_avg_price_sorted_company_then_year() {
        let records = vec![
            rec("B", 10.0, 10.0, 2023, 1, 2),
            rec("A", 10.0, 10.0, 2024, 1, 2),
            rec("A", 10.0, 10.0, 2023, 1, 2),
        ];
        let rows = yearly_avg_price(&records);
        let order: Vec<(&str, i32)> = rows.iter().map(|r| (r.company.as_str(), r.year)).collect();
        assert_eq!(order, vec![("A", 2023), ("A", 2024), ("B", 2023)]);
    }

    #[test]
    fn yearly_avg_price_empty() {
        assert!(yearly_avg_price(&[]).is_empty());
    }

    // ── Monthly price change ──

    #[test]
    fn change_is_last_minus_first_close() {
        let records = vec![
            rec("A", 100.0, 100.0, 2024, 1, 2),
            rec("A", 100.0, 104.5, 2024, 1, 15),
            rec("A", 100.0, 103.25, 2024, 1, 31),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].monthly_price_change, 3.25);
    }

    #[test]
    fn endpoints_ignore_input_order() {
        // Same records, shuffled: endpoints come from trade-date order.
        let records = vec![
            rec("A", 100.0, 104.5, 2024, 1, 15),
            rec("A", 100.0, 103.25, 2024, 1, 31),
            rec("A", 100.0, 100.0, 2024, 1, 2),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows[0].monthly_price_change, 3.25);
    }

    #[test]
    fn date_ties_resolve_to_first_encountered() {
        // Two records on the same (final) trade date: the one seen
        // first in input order supplies the last close.
        let records = vec![
            rec("A", 100.0, 100.0, 2024, 1, 2),
            rec_at("A", "A-S", 100.0, 107.0, 2024, 1, 31, 0),
            rec_at("A", "A-S", 100.0, 120.0, 2024, 1, 31, 0),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows[0].monthly_price_change, 7.0);
    }

    #[test]
    fn single_record_month_has_zero_change() {
        let records = vec![rec("A", 100.0, 105.0, 2024, 1, 2)];
        let rows = monthly_price_change(&records);
        assert_eq!(rows[0].monthly_price_change, 0.0);
    }

    #[test]
    fn running_value_is_mean_not_sum() {
        // Jan change +2, Feb change +4 -> running after Feb is 3.
        let records = vec![
            rec("A", 100.0, 100.0, 2024, 1, 2),
            rec("A", 100.0, 102.0, 2024, 1, 31),
            rec("A", 100.0, 100.0, 2024, 2, 1),
            rec("A", 100.0, 104.0, 2024, 2, 28),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].yearly_price_change_running, 2.0);
        assert_eq!(rows[1].yearly_price_change_running, 3.0);
    }

    #[test]
    fn running_mean_resets_each_year() {
        let records = vec![
            rec("A", 100.0, 100.0, 2023, 12, 1),
            rec("A", 100.0, 110.0, 2023, 12, 29),
            rec("A", 100.0, 100.0, 2024, 1, 2),
            rec("A", 100.0, 101.0, 2024, 1, 31),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows[0].yearly_price_change_running, 10.0);
        assert_eq!(rows[1].yearly_price_change_running, 1.0);
    }

    #[test]
    fn running_mean_at_month_k_is_mean_of_first_k_changes() {
        let records = vec![
            rec("A", 100.0, 100.0, 2024, 1, 2),
            rec("A", 100.0, 103.0, 2024, 1, 31),
            rec("A", 100.0, 100.0, 2024, 2, 1),
            rec("A", 100.0, 99.0, 2024, 2, 28),
            rec("A", 100.0, 100.0, 2024, 3, 1),
            rec("A", 100.0, 106.0, 2024, 3, 29),
        ];
        let rows = monthly_price_change(&records);
        assert_eq!(rows.len(), 3);
        for k in 1..=rows.len() {
            let mean: f64 =
                rows[..k].iter().map(|r| r.monthly_price_change).sum::<f64>() / k as f64;
            assert!((rows[k - 1].yearly_price_change_running - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn monthly_price_change_empty() {
        assert!(monthly_price_change(&[]).is_empty());
    }
}
