//! campaign-checks: quality gates over a finished campaign and its surrogate
//!
//! Reads the final manifest, the dataset readiness summary, and the surrogate
//! metrics (the `metrics.json` written by train-surrogate works as-is), and
//! prints a PASS/FAIL report.

mod common;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use surrogate_pipeline::fsio::load_json;
use surrogate_pipeline::gates::{format_report, run_all_checks, DatasetSummary, GateThresholds, SurrogateMetrics};
use surrogate_pipeline::manifest::Manifest;

#[derive(Parser, Debug)]
#[command(name = "campaign-checks")]
#[command(about = "Check campaign throughput, dataset readiness and surrogate accuracy")]
struct Args {
    /// Final campaign manifest
    #[arg(long)]
    manifest: PathBuf,

    /// Dataset summary JSON (`samples_ready`, `schema_valid`)
    #[arg(long)]
    dataset: PathBuf,

    /// Surrogate metrics JSON (`val_normalized_mae`, `val_r2`)
    #[arg(long)]
    metrics: PathBuf,

    /// Minimum successful simulations
    #[arg(long)]
    min_successes: Option<usize>,

    /// Maximum failure rate, percent
    #[arg(long)]
    max_failure_rate_pct: Option<f64>,

    /// Minimum samples ready for training
    #[arg(long)]
    min_samples: Option<u64>,

    /// Maximum validation normalized MAE
    #[arg(long)]
    max_normalized_mae: Option<f64>,

    /// Minimum validation R2
    #[arg(long)]
    min_r2: Option<f64>,

    /// Exit non-zero when any check fails
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn thresholds(&self) -> GateThresholds {
        let defaults = GateThresholds::default();
        GateThresholds {
            min_successes: self.min_successes.unwrap_or(defaults.min_successes),
            max_failure_rate_pct: self.max_failure_rate_pct.unwrap_or(defaults.max_failure_rate_pct),
            min_samples: self.min_samples.unwrap_or(defaults.min_samples),
            max_normalized_mae: self.max_normalized_mae.unwrap_or(defaults.max_normalized_mae),
            min_r2: self.min_r2.unwrap_or(defaults.min_r2),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    common::init_tracing();

    let manifest =
        Manifest::load(&args.manifest).with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    let dataset: DatasetSummary =
        load_json(&args.dataset).with_context(|| format!("loading dataset summary {}", args.dataset.display()))?;
    let metrics: SurrogateMetrics =
        load_json(&args.metrics).with_context(|| format!("loading metrics {}", args.metrics.display()))?;

    let results = run_all_checks(manifest.rows(), &dataset, &metrics, &args.thresholds());
    println!("{}", format_report(&results));

    if args.strict && !results.iter().all(|r| r.passed()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
