//! Record counting and company enumeration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::CleanRecord;

/// A distinct (company, symbol) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanySymbol {
    pub company: String,
    pub symbol: String,
}

/// Count of all clean records. Zero on empty input.
pub fn total_records(records: &[CleanRecord]) -> u64 {
    records.len() as u64
}

/// Unique (company, symbol) pairs, each appearing once.
///
/// Emitted in ascending (company, symbol) order for determinism; the
/// contract itself requires no particular ordering.
pub fn distinct_companies(records: &[CleanRecord]) -> Vec<CompanySymbol> {
    let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();
    for rec in records {
        pairs.insert((rec.company.as_str(), rec.symbol.as_str()));
    }
    pairs
        .into_iter()
        .map(|(company, symbol)| CompanySymbol {
            company: company.to_string(),
            symbol: symbol.to_string(),
        })
        .collect()
}
