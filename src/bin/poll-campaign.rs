//! poll-campaign: poll registry job status for a submitted campaign
//!
//! Rewrites `--output` after every round. Rerunning against that file
//! resumes without re-querying finished jobs.

mod common;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use surrogate_pipeline::manifest::{Manifest, PollOptions, PollOutcome, Poller};
use surrogate_pipeline::registry::RegistryClient;

#[derive(Parser, Debug)]
#[command(name = "poll-campaign")]
#[command(about = "Poll registry job status for a submitted campaign")]
struct Args {
    /// Manifest written by submit-campaign
    #[arg(long, default_value = "campaign_jobs.json")]
    manifest: PathBuf,

    /// Updated manifest to write after every round
    #[arg(long, default_value = "campaign_jobs.updated.json")]
    output: PathBuf,

    /// Sleep between rounds
    #[arg(long, default_value_t = 20)]
    poll_seconds: u64,

    /// Give up after this many rounds (default: poll until every job is terminal)
    #[arg(long)]
    max_rounds: Option<u32>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    common::init_tracing();

    let mut manifest =
        Manifest::load(&args.manifest).with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    if manifest.tracked().next().is_none() {
        println!("No submitted jobs found in manifest.");
        return Ok(ExitCode::SUCCESS);
    }

    let client = RegistryClient::from_env()?;
    let options = PollOptions {
        interval: Duration::from_secs(args.poll_seconds),
        max_rounds: args.max_rounds,
    };
    let outcome = Poller::new(&client, options).run_until(&mut manifest, &args.output, |round| {
        println!("{}", round.progress_line());
        false
    })?;

    match outcome {
        PollOutcome::Exhausted(round) => {
            eprintln!(
                "Stopped after {} rounds with {}/{} jobs terminal; rerun with --manifest {} to continue",
                round.round,
                round.done,
                round.total,
                args.output.display()
            );
            Ok(ExitCode::FAILURE)
        }
        _ => {
            println!("Final manifest written to: {}", args.output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
