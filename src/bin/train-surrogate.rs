//! train-surrogate: registry function runner for baseline surrogate training
//!
//! ```bash
//! train-surrogate <input.json> <output.json> <temp_dir>
//! ```
//!
//! Writes `metrics.json`, `model_checkpoint.json` and `training_report.md`
//! into `temp_dir` and lists them in `output.json`. A wrong argument count
//! exits with status 2.

mod common;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use surrogate_pipeline::training::run_training;

#[derive(Parser, Debug)]
#[command(name = "train-surrogate")]
#[command(about = "Train the baseline surrogate and write its artifacts")]
struct Args {
    /// Function input JSON
    input: PathBuf,

    /// Output manifest to write
    output: PathBuf,

    /// Working directory for artifacts
    temp_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_tracing();

    let run = run_training(&args.input, &args.output, &args.temp_dir)
        .with_context(|| format!("training from {}", args.input.display()))?;

    for artifact in &run.artifacts {
        println!("[train-surrogate] wrote: {}", artifact.path().display());
    }
    println!("[train-surrogate] output manifest: {}", args.output.display());
    Ok(())
}
