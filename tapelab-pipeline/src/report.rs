//! Reporting and export — JSON manifest, per-view CSV, Markdown report.
//!
//! The persisted manifest includes a `schema_version` field; loading a
//! manifest with a newer version than this build supports is rejected.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::runner::{PipelineResult, SCHEMA_VERSION};

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `PipelineResult` to pretty JSON.
pub fn export_manifest_json(result: &PipelineResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize PipelineResult to JSON")
}

/// Deserialize a `PipelineResult`, rejecting newer schema versions.
pub fn import_manifest_json(json: &str) -> Result<PipelineResult> {
    let result: PipelineResult =
        serde_json::from_str(json).context("failed to deserialize PipelineResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Load a `PipelineResult` from an artifact directory's manifest.json.
pub fn load_manifest(dir: &Path) -> Result<PipelineResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_manifest_json(&json)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Serialize one view table as CSV, header row included.
fn table_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a pipeline run.
///
/// Creates `run_{hash}/` under `output_dir` (named by the first twelve
/// hex digits of the dataset hash, so identical input reuses the same
/// directory) containing:
/// - `manifest.json` — the full `PipelineResult`
/// - one CSV per view table
/// - `report.md` — human-readable summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &PipelineResult, output_dir: &Path) -> Result<PathBuf> {
    let short_hash = &result.dataset_hash[..result.dataset_hash.len().min(12)];
    let run_dir = output_dir.join(format!("run_{short_hash}"));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_manifest_json(result)?)?;

    let v = &result.views;
    std::fs::write(
        run_dir.join("distinct_companies.csv"),
        table_to_csv(&v.distinct_companies)?,
    )?;
    std::fs::write(
        run_dir.join("top_volume_high.csv"),
        table_to_csv(&v.top_volume_high)?,
    )?;
    std::fs::write(
        run_dir.join("top_volume_low.csv"),
        table_to_csv(&v.top_volume_low)?,
    )?;
    std::fs::write(
        run_dir.join("yearly_avg_price.csv"),
        table_to_csv(&v.yearly_avg_price)?,
    )?;
    std::fs::write(
        run_dir.join("monthly_return.csv"),
        table_to_csv(&v.monthly_return)?,
    )?;
    std::fs::write(
        run_dir.join("monthly_avg_volume.csv"),
        table_to_csv(&v.monthly_avg_volume)?,
    )?;
    std::fs::write(
        run_dir.join("dividends_by_company.csv"),
        table_to_csv(&v.dividends_by_company)?,
    )?;
    std::fs::write(
        run_dir.join("stock_splits_by_company.csv"),
        table_to_csv(&v.stock_splits_by_company)?,
    )?;
    std::fs::write(
        run_dir.join("monthly_price_change.csv"),
        table_to_csv(&v.monthly_price_change)?,
    )?;

    std::fs::write(run_dir.join("report.md"), generate_report(result))?;

    Ok(run_dir)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown summary for a pipeline run.
pub fn generate_report(result: &PipelineResult) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Pipeline Report\n\n");

    md.push_str("## Run\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Rows Read | {} |\n", result.rows_read));
    md.push_str(&format!("| Rows Rejected | {} |\n", result.rows_rejected));
    md.push_str(&format!("| Rows Cleaned | {} |\n", result.rows_cleaned));
    md.push_str(&format!(
        "| Companies | {} |\n",
        result.views.distinct_companies.len()
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", result.dataset_hash));
    md.push('\n');

    md.push_str(&format!("## Top {} by Volume\n\n", result.top_n));
    md.push_str("| Company | Total Volume |\n");
    md.push_str("| --- | ---: |\n");
    for row in &result.views.top_volume_high {
        md.push_str(&format!("| {} | {} |\n", row.company, row.total_volume));
    }
    md.push('\n');

    md.push_str(&format!("## Bottom {} by Volume\n\n", result.top_n));
    md.push_str("| Company | Total Volume |\n");
    md.push_str("| --- | ---: |\n");
    for row in &result.views.top_volume_low {
        md.push_str(&format!("| {} | {} |\n", row.company, row.total_volume));
    }
    md.push('\n');

    md.push_str("## Dividends\n\n");
    if result.views.dividends_by_company.is_empty() {
        md.push_str("No dividend-paying companies in this dataset.\n");
    } else {
        md.push_str("| Company | Total Dividends |\n");
        md.push_str("| --- | ---: |\n");
        for row in &result.views.dividends_by_company {
            md.push_str(&format!("| {} | {:.3} |\n", row.company, row.total_dividends));
        }
    }
    md.push('\n');

    md.push_str("## Stock Splits\n\n");
    if result.views.stock_splits_by_company.is_empty() {
        md.push_str("No split days in this dataset.\n");
    } else {
        md.push_str("| Company | Split Days |\n");
        md.push_str("| --- | ---: |\n");
        for row in &result.views.stock_splits_by_company {
            md.push_str(&format!("| {} | {} |\n", row.company, row.split_count));
        }
    }
    md.push('\n');

    md.push_str("## Monthly Tables\n\n");
    md.push_str(&format!(
        "- monthly_return: {} rows\n",
        result.views.monthly_return.len()
    ));
    md.push_str(&format!(
        "- monthly_avg_volume: {} rows\n",
        result.views.monthly_avg_volume.len()
    ));
    md.push_str(&format!(
        "- monthly_price_change: {} rows\n",
        result.views.monthly_price_change.len()
    ));
    md.push_str(&format!(
        "- yearly_avg_price: {} rows\n",
        result.views.yearly_avg_price.len()
    ));
    md.push('\n');

    if !result.warnings.is_empty() {
        md.push_str("## Data Quality\n\n");
        for warn in &result.warnings {
            md.push_str(&format!("- {warn}\n"));
        }
        md.push('\n');
    }

    md
}
