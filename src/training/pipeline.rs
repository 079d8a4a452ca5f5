//! End-to-end training run: input payload to artifacts on disk

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use super::artifacts::{
    render_report, ArtifactRecord, HardwareInfo, MetricsRecord, CHECKPOINT_FILE, METRICS_FILE, REPORT_FILE,
};
use super::config::{TrainingBackend, TrainingConfig};
use super::dataset::{load_dataset, Dataset};
use super::metrics::RegressionMetrics;
use super::ridge::{fit_ridge, TrainedModel};
use super::split::split_indices;
use crate::fsio::{atomic_write, dump_json, load_json};
use crate::{Error, Result};

/// Output manifest name of the metrics document.
pub const METRICS_ARTIFACT: &str = "metrics_json";

/// Output manifest name of the checkpoint.
pub const CHECKPOINT_ARTIFACT: &str = "model_checkpoint_json";

/// Output manifest name of the report.
pub const REPORT_ARTIFACT: &str = "training_report_md";

fn unwrap_value(value: Value) -> Value {
    match value {
        Value::Object(mut obj) if obj.contains_key("value") => obj.remove("value").unwrap_or(Value::Null),
        other => other,
    }
}

/// Read the input payload, unwrapping `{"value": x}` wrappers on every
/// top-level field.
///
/// # Errors
/// Returns error if the file is unreadable or not a JSON object
pub fn read_input(path: &Path) -> Result<Map<String, Value>> {
    let payload: Value = load_json(path)?;
    let Value::Object(fields) = payload else {
        return Err(Error::InvalidSpec(format!(
            "training input must be a JSON object: {}",
            path.display()
        )));
    };
    Ok(fields.into_iter().map(|(k, v)| (k, unwrap_value(v))).collect())
}

fn text_field(payload: &Map<String, Value>, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Resolve the dataset path: absolute as given, else next to the input file
/// if it exists there, else relative to the working directory.
///
/// # Errors
/// Returns error if the working directory cannot be determined
pub fn resolve_model_path(raw: &str, input_file: &Path) -> Result<PathBuf> {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }
    if let Some(parent) = input_file.parent() {
        let beside_input = parent.join(candidate);
        if beside_input.exists() {
            return Ok(beside_input);
        }
    }
    Ok(std::env::current_dir()?.join(candidate))
}

/// A fitted model with its scores on both partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    /// The fitted model.
    pub model: TrainedModel,
    /// Scores on the training rows.
    pub train_metrics: RegressionMetrics,
    /// Scores on the validation rows.
    pub val_metrics: RegressionMetrics,
    /// Validation MAE over the validation target range.
    pub val_normalized_mae: f64,
}

/// Fit the configured backend on `dataset`.
///
/// # Errors
/// Returns `UnsupportedBackend` for backends this build cannot run and
/// `InsufficientData` for datasets too small to split
pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<FitOutcome> {
    match config.training_backend()? {
        TrainingBackend::Baseline => {}
        TrainingBackend::PhysicsNemo => {
            return Err(Error::UnsupportedBackend(TrainingBackend::PhysicsNemo.as_str().to_string()))
        }
    }

    let split = split_indices(dataset.n_samples(), config.val_split, config.random_seed)?;
    let pick = |idx: &[usize]| idx.iter().map(|&i| dataset.targets()[i]).collect::<Vec<f64>>();
    let x_train = dataset.features().select_rows(&split.train);
    let x_val = dataset.features().select_rows(&split.val);
    let y_train = pick(&split.train);
    let y_val = pick(&split.val);

    let model = TrainedModel {
        weights: fit_ridge(&x_train, &y_train, config.ridge_lambda)?,
        feature_names: dataset.feature_names().to_vec(),
        dataset_source: dataset.source().to_string(),
    };
    let train_metrics = RegressionMetrics::compute(&y_train, &model.predict(&x_train));
    let val_metrics = RegressionMetrics::compute(&y_val, &model.predict(&x_val));
    let val_normalized_mae = val_metrics.normalized_mae(&y_val);

    Ok(FitOutcome {
        model,
        train_metrics,
        val_metrics,
        val_normalized_mae,
    })
}

/// Result of [`run_training`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRun {
    /// The metrics document as written.
    pub record: MetricsRecord,
    /// The fitted model as checkpointed.
    pub model: TrainedModel,
    /// Written artifacts, in output-manifest order.
    pub artifacts: Vec<ArtifactRecord>,
}

/// Run one training job: read `input`, fit, write the metrics document,
/// checkpoint and report into `temp_dir`, and list them in `output`.
///
/// # Errors
/// Returns `MissingConfiguration` without `campaign_root_model`, and any
/// configuration, dataset, training or IO failure
pub fn run_training(input: &Path, output: &Path, temp_dir: &Path) -> Result<TrainingRun> {
    let started = Instant::now();
    std::fs::create_dir_all(temp_dir)?;

    let payload = read_input(input)?;
    let model_raw = text_field(&payload, "campaign_root_model");
    if model_raw.is_empty() {
        return Err(Error::MissingConfiguration(
            "Missing required input: campaign_root_model".to_string(),
        ));
    }
    let model_path = resolve_model_path(&model_raw, input)?;
    let dataset_job_id = text_field(&payload, "dataset_job_id");
    let config = TrainingConfig::parse(payload.get("training_config"))?;
    let backend = config.training_backend()?;

    let dataset = load_dataset(&model_path, &config)?;
    let FitOutcome {
        model,
        train_metrics,
        val_metrics,
        val_normalized_mae,
    } = train(&dataset, &config)?;

    let record = MetricsRecord {
        backend: backend.as_str().to_string(),
        dataset_job_id,
        dataset_source: dataset.source().to_string(),
        samples: dataset.n_samples(),
        features: dataset.n_features(),
        feature_names: dataset.feature_names().to_vec(),
        train_metrics,
        val_metrics,
        val_normalized_mae,
        val_r2: val_metrics.r2,
        training_config: config,
        hardware: HardwareInfo::detect(),
        completed_at: Utc::now(),
        duration_seconds: (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0,
    };

    let metrics_path = temp_dir.join(METRICS_FILE);
    let checkpoint_path = temp_dir.join(CHECKPOINT_FILE);
    let report_path = temp_dir.join(REPORT_FILE);
    dump_json(&metrics_path, &record)?;
    dump_json(&checkpoint_path, &model)?;
    atomic_write(&report_path, render_report(&record).as_bytes())?;

    let artifacts = vec![
        ArtifactRecord::from_file(METRICS_ARTIFACT, &metrics_path)?,
        ArtifactRecord::from_file(CHECKPOINT_ARTIFACT, &checkpoint_path)?,
        ArtifactRecord::from_file(REPORT_ARTIFACT, &report_path)?,
    ];
    dump_json(output, &artifacts)?;

    info!(
        samples = record.samples,
        val_r2 = record.val_r2,
        val_normalized_mae = record.val_normalized_mae,
        output = %output.display(),
        "training artifacts written"
    );
    Ok(TrainingRun {
        record,
        model,
        artifacts,
    })
}
