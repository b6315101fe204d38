//! TapeLab Core — record types, cleaning rules, and aggregation views.
//!
//! This crate contains the heart of the pipeline:
//! - Domain types (raw and clean trading records)
//! - The Cleaner: a pure, total, per-record normalization transform
//! - The ten aggregation views (counts, volumes, returns, prices,
//!   dividends, splits) as pure functions over the clean record set
//! - Deterministic decimal rounding shared by every view
//!
//! No I/O lives here. Ingest, orchestration, and reporting are in
//! `tapelab-pipeline`.

pub mod clean;
pub mod domain;
pub mod round;
pub mod views;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all shared types are Send + Sync.
    ///
    /// The pipeline cleans records on a rayon pool and evaluates views
    /// concurrently over a shared slice; every type crossing that
    /// boundary must satisfy this check.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::RawRecord>();
        require_sync::<domain::RawRecord>();
        require_send::<domain::CleanRecord>();
        require_sync::<domain::CleanRecord>();

        require_send::<views::CompanySymbol>();
        require_sync::<views::CompanySymbol>();
        require_send::<views::CompanyVolume>();
        require_sync::<views::CompanyVolume>();
        require_send::<views::VolumeDirection>();
        require_sync::<views::VolumeDirection>();
        require_send::<views::YearlyAvgPriceRow>();
        require_sync::<views::YearlyAvgPriceRow>();
        require_send::<views::MonthlyReturnRow>();
        require_sync::<views::MonthlyReturnRow>();
        require_send::<views::MonthlyAvgVolumeRow>();
        require_sync::<views::MonthlyAvgVolumeRow>();
        require_send::<views::CompanyDividends>();
        require_sync::<views::CompanyDividends>();
        require_send::<views::CompanySplitCount>();
        require_sync::<views::CompanySplitCount>();
        require_send::<views::MonthlyPriceChangeRow>();
        require_sync::<views::MonthlyPriceChangeRow>();
    }
}
