//! Return aggregation: monthly sums of daily returns with a running
//! yearly prefix sum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::CleanRecord;
use crate::round::round_dp;

/// One month of summed daily returns for a (company, symbol), with the
/// running yearly total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturnRow {
    pub company: String,
    pub symbol: String,
    pub year: i32,
    pub month: u32,
    pub monthly_return: f64,
    pub yearly_return_running: f64,
}

/// Monthly and yearly returns per (company, symbol).
///
/// Per record, `daily_return = ((close - open) / open) * 100`, rounded
/// to 3 decimals. Records with `open == 0` are excluded from this view
/// only — a division guard, not a global filter. Monthly returns sum
/// the daily values per (company, symbol, year, month); the yearly
/// value is a running prefix sum over months, reset at each new
/// (company, symbol, year) partition. Rows sort by company, year,
/// month, then symbol.
pub fn monthly_and_yearly_return(records: &[CleanRecord]) -> Vec<MonthlyReturnRow> {
    let mut groups: BTreeMap<(String, String, i32, u32), f64> = BTreeMap::new();
    for rec in records {
        if rec.open == 0.0 {
            continue;
        }
        let daily_return = round_dp((rec.close - rec.open) / rec.open * 100.0, 3);
        *groups
            .entry((rec.company.clone(), rec.symbol.clone(), rec.year(), rec.month()))
            .or_insert(0.0) += daily_return;
    }

    let mut rows = Vec::with_capacity(groups.len());
    let mut partition: Option<(String, String, i32)> = None;
    let mut running = 0.0;

    for ((company, symbol, year, month), monthly_return) in groups {
        let key = (company.clone(), symbol.clone(), year);
        if partition.as_ref() != Some(&key) {
            partition = Some(key);
            running = 0.0;
        }
        running += monthly_return;

        rows.push(MonthlyReturnRow {
            company,
            symbol,
            year,
            month,
            monthly_return,
            yearly_return_running: running,
        });
    }

    rows.sort_by_key(|r| (r.company.clone(), r.year, r.month, r.symbol.clone()));
    rows
}
