//! TapeLab CLI — run the cleaning/aggregation pipeline and generate
//! sample data.
//!
//! Commands:
//! - `run` — ingest a daily-records CSV, clean it, compute the
//!   aggregation views, print a summary, and save artifacts
//! - `sample` — write deterministic synthetic input data for demos

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tapelab_core::domain::RawRecord;
use tapelab_pipeline::{
    generate_raw_records, read_records_from_path, run_pipeline, save_artifacts, PipelineResult,
    RunConfig,
};

#[derive(Parser)]
#[command(
    name = "tapelab",
    about = "TapeLab CLI — daily stock-record cleaning and aggregation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over a daily-records CSV file.
    Run {
        /// Input CSV path. Required unless the config file provides one.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to a TOML run config. Flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Row count for the top-volume views.
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Write deterministic synthetic input data.
    Sample {
        /// Symbols to generate (e.g. ACME BOLT CRUX).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Calendar days to generate per symbol (weekends skipped).
        #[arg(long, default_value_t = 730)]
        days: u32,

        /// First calendar day (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-02")]
        start: String,

        /// Output CSV path.
        #[arg(long, default_value = "sample.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            output_dir,
            top_n,
        } => run_cmd(input, config, output_dir, top_n),
        Commands::Sample {
            symbols,
            days,
            start,
            out,
        } => sample_cmd(symbols, days, &start, out),
    }
}

fn run_cmd(
    input: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    top_n: Option<usize>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::from_file(&path)?,
        None => RunConfig::default(),
    };

    // Flags take precedence over the config file.
    if input.is_some() {
        config.input = input;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(n) = top_n {
        config.top_n = n;
    }

    let Some(input_path) = config.input.clone() else {
        bail!("no input file: pass --input or set `input` in the config");
    };

    let report = read_records_from_path(&input_path)
        .with_context(|| format!("failed to ingest {}", input_path.display()))?;
    let result = run_pipeline(report, config.top_n);

    for warn in &result.warnings {
        eprintln!("WARNING: {warn}");
    }

    print_summary(&result);

    let run_dir = save_artifacts(&result, &config.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn sample_cmd(symbols: Vec<String>, days: u32, start: &str, out: PathBuf) -> Result<()> {
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid start date '{start}'"))?;

    let mut records: Vec<RawRecord> = Vec::new();
    for symbol in &symbols {
        let company = company_name(symbol);
        records.extend(generate_raw_records(symbol, &company, start_date, days));
    }
    // Interleave symbols chronologically, like a real daily tape.
    records.sort_by(|a, b| {
        a.trade_timestamp
            .cmp(&b.trade_timestamp)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let count = records.len();
    let mut wtr = csv::Writer::from_path(&out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    for rec in &records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;

    println!(
        "Wrote {count} records for {} symbol(s) to {}",
        symbols.len(),
        out.display()
    );
    Ok(())
}

/// "ACME" → "Acme Corp"; good enough for sample data.
fn company_name(symbol: &str) -> String {
    let mut chars = symbol.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    };
    format!("{name} Corp")
}

fn print_summary(result: &PipelineResult) {
    println!();
    println!("=== Pipeline Result ===");
    println!("Rows read:      {}", result.rows_read);
    println!("Rows rejected:  {}", result.rows_rejected);
    println!("Rows cleaned:   {}", result.rows_cleaned);
    println!("Companies:      {}", result.views.distinct_companies.len());
    println!("Dataset hash:   {}", result.dataset_hash);
    println!();
    println!("--- Top {} by volume ---", result.top_n);
    for row in &result.views.top_volume_high {
        println!("{:<24} {:>16}", row.company, row.total_volume);
    }
    println!();
    println!("--- Bottom {} by volume ---", result.top_n);
    for row in &result.views.top_volume_low {
        println!("{:<24} {:>16}", row.company, row.total_volume);
    }
    if !result.views.dividends_by_company.is_empty() {
        println!();
        println!("--- Dividends ---");
        for row in &result.views.dividends_by_company {
            println!("{:<24} {:>16.3}", row.company, row.total_dividends);
        }
    }
    if !result.views.stock_splits_by_company.is_empty() {
        println!();
        println!("--- Split days ---");
        for row in &result.views.stock_splits_by_company {
            println!("{:<24} {:>16}", row.company, row.split_count);
        }
    }
    println!();
    println!(
        "Monthly tables: {} return rows, {} volume rows, {} price-change rows",
        result.views.monthly_return.len(),
        result.views.monthly_avg_volume.len(),
        result.views.monthly_price_change.len()
    );
    println!();
}
