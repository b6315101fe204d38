//! Pipeline orchestration — clean in parallel, compute every view,
//! assemble a schema-versioned result.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use tapelab_core::clean::clean;
use tapelab_core::domain::CleanRecord;
use tapelab_core::views::{
    distinct_companies, dividends_by_company, monthly_and_yearly_return, monthly_avg_volume,
    monthly_price_change, stock_splits_by_company, top_volume_companies, total_records,
    yearly_avg_price, CompanyDividends, CompanySplitCount, CompanySymbol, CompanyVolume,
    MonthlyAvgVolumeRow, MonthlyPriceChangeRow, MonthlyReturnRow, VolumeDirection,
    YearlyAvgPriceRow,
};

use crate::ingest::{read_records_from_path, IngestError, IngestReport};

/// Manifest schema version; bumped on any breaking result-shape change.
pub const SCHEMA_VERSION: u32 = 1;

/// Default row count for the top-volume views.
pub const DEFAULT_TOP_N: usize = 5;

/// The ten view tables computed over one clean record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTables {
    pub total_records: u64,
    pub distinct_companies: Vec<CompanySymbol>,
    pub top_volume_high: Vec<CompanyVolume>,
    pub top_volume_low: Vec<CompanyVolume>,
    pub yearly_avg_price: Vec<YearlyAvgPriceRow>,
    pub monthly_return: Vec<MonthlyReturnRow>,
    pub monthly_avg_volume: Vec<MonthlyAvgVolumeRow>,
    pub dividends_by_company: Vec<CompanyDividends>,
    pub stock_splits_by_company: Vec<CompanySplitCount>,
    pub monthly_price_change: Vec<MonthlyPriceChangeRow>,
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub schema_version: u32,
    pub rows_read: u64,
    pub rows_rejected: u64,
    pub rows_cleaned: u64,
    pub top_n: usize,
    /// BLAKE3 over the clean record set, for run provenance.
    pub dataset_hash: String,
    /// Ingest rejections, one human-readable line each.
    pub warnings: Vec<String>,
    pub views: ViewTables,
}

/// Run the pipeline over an ingest report.
///
/// Cleaning is a rayon parallel map (each record transforms
/// independently); the monthly window views are evaluated concurrently
/// since they only share the immutable clean slice.
pub fn run_pipeline(report: IngestReport, top_n: usize) -> PipelineResult {
    let IngestReport { records, rejected } = report;
    let rows_read = (records.len() + rejected.len()) as u64;

    let clean_records: Vec<CleanRecord> = records.into_par_iter().map(clean).collect();
    let dataset_hash = dataset_hash(&clean_records);

    let ((monthly_return, monthly_volume), monthly_change) = rayon::join(
        || {
            rayon::join(
                || monthly_and_yearly_return(&clean_records),
                || monthly_avg_volume(&clean_records),
            )
        },
        || monthly_price_change(&clean_records),
    );

    let views = ViewTables {
        total_records: total_records(&clean_records),
        distinct_companies: distinct_companies(&clean_records),
        top_volume_high: top_volume_companies(&clean_records, top_n, VolumeDirection::High),
        top_volume_low: top_volume_companies(&clean_records, top_n, VolumeDirection::Low),
        yearly_avg_price: yearly_avg_price(&clean_records),
        monthly_return,
        monthly_avg_volume: monthly_volume,
        dividends_by_company: dividends_by_company(&clean_records),
        stock_splits_by_company: stock_splits_by_company(&clean_records),
        monthly_price_change: monthly_change,
    };

    let warnings = rejected
        .iter()
        .map(|r| format!("row {}: {} (skipped)", r.line, r.reason))
        .collect();

    PipelineResult {
        schema_version: SCHEMA_VERSION,
        rows_read,
        rows_rejected: rejected.len() as u64,
        rows_cleaned: views.total_records,
        top_n,
        dataset_hash,
        warnings,
        views,
    }
}

/// Ingest a CSV file and run the pipeline over it.
pub fn run_from_path(input: &Path, top_n: usize) -> Result<PipelineResult, IngestError> {
    let report = read_records_from_path(input)?;
    Ok(run_pipeline(report, top_n))
}

/// Deterministic BLAKE3 hash over the clean record set.
///
/// Records hash in input order, which the 1:1 cleaning stage preserves,
/// so identical input files produce identical hashes.
fn dataset_hash(records: &[CleanRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for rec in records {
        hasher.update(rec.company.as_bytes());
        hasher.update(rec.symbol.as_bytes());
        hasher.update(&rec.trade_timestamp.to_le_bytes());
        hasher.update(&rec.open.to_le_bytes());
        hasher.update(&rec.high.to_le_bytes());
        hasher.update(&rec.low.to_le_bytes());
        hasher.update(&rec.close.to_le_bytes());
        hasher.update(&rec.volume.to_le_bytes());
        hasher.update(&rec.dividends.to_le_bytes());
        hasher.update(&rec.stock_splits.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
