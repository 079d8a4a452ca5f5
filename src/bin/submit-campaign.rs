//! submit-campaign: expand a campaign spec and submit one simulation job per case
//!
//! ## Usage
//!
//! ```bash
//! # Preview the first payloads without touching the registry
//! submit-campaign --spec campaign.json --dry-run
//!
//! # Submit, checkpointing the manifest every 25 jobs
//! submit-campaign --spec campaign.json --output campaign_jobs.json
//!
//! # Resume an interrupted submission, skipping cases already recorded
//! submit-campaign --spec campaign.json --output campaign_jobs.json --skip-recorded
//! ```

mod common;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use surrogate_pipeline::campaign::{generate_cases, CampaignSpec};
use surrogate_pipeline::manifest::{
    Manifest, ResumePolicy, SubmitOptions, Submitter, DEFAULT_CHECKPOINT_EVERY, DEFAULT_PREVIEW_LIMIT,
};
use surrogate_pipeline::registry::{MemoryJobService, RegistryClient, SIMULATION_FUNCTION_KEY};

#[derive(Parser, Debug)]
#[command(name = "submit-campaign")]
#[command(about = "Submit many simulation jobs to the registry from a campaign spec")]
struct Args {
    /// Path to the campaign spec JSON
    #[arg(long)]
    spec: PathBuf,

    /// Function the jobs run
    #[arg(long, default_value = SIMULATION_FUNCTION_KEY)]
    function_key: String,

    /// Manifest to write
    #[arg(long, default_value = "campaign_jobs.json")]
    output: PathBuf,

    /// Delay between submissions
    #[arg(long, default_value_t = 0.05)]
    throttle_seconds: f64,

    /// Write a payload preview instead of submitting
    #[arg(long)]
    dry_run: bool,

    /// Cases included in the dry-run preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
    preview_limit: usize,

    /// Submissions between manifest checkpoints
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_EVERY)]
    checkpoint_every: usize,

    /// Agent to pin every job to
    #[arg(long)]
    assigned_agent_id: Option<String>,

    /// Keep rows of an existing manifest at --output that already have a job id
    #[arg(long)]
    skip_recorded: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_tracing();

    let text = std::fs::read_to_string(&args.spec)
        .with_context(|| format!("reading campaign spec {}", args.spec.display()))?;
    let spec = CampaignSpec::from_json(&text)?;
    let cases = generate_cases(&spec)?;

    println!("Campaign: {}", spec.campaign_name());
    println!("Function: {}", args.function_key);
    println!("Cases: {}", cases.len());

    let throttle = Duration::try_from_secs_f64(args.throttle_seconds)
        .with_context(|| format!("invalid --throttle-seconds {}", args.throttle_seconds))?;
    let options = SubmitOptions {
        function_key: args.function_key,
        throttle,
        dry_run: args.dry_run,
        preview_limit: args.preview_limit,
        checkpoint_every: args.checkpoint_every,
        assigned_agent_id: args.assigned_agent_id,
        resume: if args.skip_recorded {
            ResumePolicy::SkipRecorded
        } else {
            ResumePolicy::AlwaysSubmit
        },
    };

    if options.dry_run {
        // dry runs never reach the service
        let preview = Submitter::new(&MemoryJobService::new(), options).run(&spec, &cases, &args.output, None)?;
        println!(
            "Wrote dry-run payload preview ({} cases) to: {}",
            preview.len(),
            args.output.display()
        );
        return Ok(());
    }

    let previous = if args.skip_recorded && args.output.exists() {
        Some(Manifest::load(&args.output).with_context(|| format!("loading {}", args.output.display()))?)
    } else {
        None
    };

    let client = RegistryClient::from_env()?;
    let manifest = Submitter::new(&client, options)
        .run(&spec, &cases, &args.output, previous.as_ref())
        .context("campaign submission stopped; the manifest holds every job submitted so far")?;

    println!("Submitted {}/{}", manifest.tracked().count(), cases.len());
    println!("Wrote manifest: {}", args.output.display());
    Ok(())
}
