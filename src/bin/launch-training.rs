//! launch-training: submit a surrogate training job to the registry

mod common;

use anyhow::Result;
use clap::Parser;
use surrogate_pipeline::registry::{RegistryClient, TRAINING_FUNCTION_KEY};
use surrogate_pipeline::training::{TrainingLaunch, DEFAULT_TARGET_FIELDS};

#[derive(Parser, Debug)]
#[command(name = "launch-training")]
#[command(about = "Launch a surrogate training job in the registry")]
struct Args {
    /// Model the training job attaches to
    #[arg(long)]
    campaign_root_model_id: String,

    /// Job whose outputs form the training dataset
    #[arg(long)]
    dataset_job_id: String,

    /// Training function
    #[arg(long, default_value = TRAINING_FUNCTION_KEY)]
    function_key: String,

    /// Comma-separated fields the surrogate predicts
    #[arg(long, default_value = DEFAULT_TARGET_FIELDS)]
    target_fields: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_tracing();

    let client = RegistryClient::from_env()?;
    let job = TrainingLaunch::new(args.campaign_root_model_id, args.dataset_job_id, &args.target_fields)
        .function_key(args.function_key)
        .submit(&client)?;

    println!("Launched training job: {}", job.id);
    Ok(())
}
