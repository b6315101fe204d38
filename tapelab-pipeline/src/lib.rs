//! TapeLab Pipeline — ingest, orchestration, and reporting.
//!
//! This crate builds on `tapelab-core` to provide:
//! - CSV ingest with per-row skip-and-log rejection
//! - The pipeline runner: parallel cleaning, concurrent view
//!   computation, dataset fingerprinting
//! - TOML run configuration
//! - Artifact export (per-view CSV, JSON manifest, Markdown report)
//! - Deterministic synthetic sample data for demos and tests

pub mod config;
pub mod ingest;
pub mod report;
pub mod runner;
pub mod synthetic;

pub use config::{ConfigError, RunConfig};
pub use ingest::{read_records, read_records_from_path, IngestError, IngestReport, RowRejection};
pub use report::{generate_report, import_manifest_json, load_manifest, save_artifacts};
pub use runner::{
    run_from_path, run_pipeline, PipelineResult, ViewTables, DEFAULT_TOP_N, SCHEMA_VERSION,
};
pub use synthetic::generate_raw_records;
