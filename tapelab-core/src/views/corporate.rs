//! Corporate actions: dividend totals and split-day counts per company.
//!
//! The two views filter on different sides of the aggregation, and that
//! asymmetry is part of the contract: dividends are summed first and
//! the zero-total groups dropped afterwards (HAVING semantics), while
//! split counting drops non-qualifying rows before grouping (WHERE
//! semantics), so a company with no qualifying split rows never forms a
//! group at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::CleanRecord;

/// Summed dividends for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDividends {
    pub company: String,
    pub total_dividends: f64,
}

/// Count of split days for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySplitCount {
    pub company: String,
    pub split_count: u64,
}

/// Summed dividends per company, excluding groups whose total is not
/// positive (post-aggregation filter). Company ascending.
pub fn dividends_by_company(records: &[CleanRecord]) -> Vec<CompanyDividends> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in records {
        *totals.entry(rec.company.as_str()).or_insert(0.0) += rec.dividends;
    }

    totals
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(company, total_dividends)| CompanyDividends {
            company: company.to_string(),
            total_dividends,
        })
        .collect()
}

/// Count of records with `stock_splits > 0` per company. Rows are
/// filtered before grouping, so only companies with at least one
/// qualifying record appear. The count is of qualifying rows, not the
/// split ratio itself. Company ascending.
pub fn stock_splits_by_company(records: &[CleanRecord]) -> Vec<CompanySplitCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in records.iter().filter(|r| r.stock_splits > 0.0) {
        *counts.entry(rec.company.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(company, split_count)| CompanySplitCount {
            company: company.to_string(),
            split_count,
        })
        .collect()
}
