//! Surrogate training
//!
//! A baseline regression surrogate over tabular simulation results:
//!
//! ```text
//! input.json ──> TrainingConfig ──> load_dataset ──> split_indices ──> fit_ridge
//!                                    (csv/json/parquet/                    │
//!                                     synthetic)                           v
//!                     output.json <── ArtifactRecord <── metrics.json, checkpoint, report
//! ```
//!
//! The production GPU backend is recognized but refused with
//! [`crate::Error::UnsupportedBackend`]; nothing falls back to the baseline
//! silently.
//!
//! # Example
//!
//! ```rust
//! use surrogate_pipeline::training::{synthetic_dataset, train, TrainingConfig};
//!
//! let dataset = synthetic_dataset();
//! let fit = train(&dataset, &TrainingConfig::default()).unwrap();
//! assert!(fit.val_metrics.r2 > 0.99);
//! ```

mod artifacts;
mod config;
mod dataset;
mod launch;
mod metrics;
mod pipeline;
mod ridge;
mod split;

pub use artifacts::{
    content_hash, has_nvidia_gpu, render_report, ArtifactRecord, HardwareInfo, MetricsRecord, CHECKPOINT_FILE,
    METRICS_FILE, REPORT_FILE,
};
pub use config::{TrainingBackend, TrainingConfig, BASELINE_BACKEND, PHYSICSNEMO_BACKEND};
pub use dataset::{
    load_csv, load_dataset, load_json, load_parquet, synthetic_dataset, Dataset, DatasetFormat, SYNTHETIC_FEATURES,
    SYNTHETIC_SAMPLES, SYNTHETIC_SOURCE,
};
pub use launch::{parse_target_fields, LaunchParameters, TrainingLaunch, DEFAULT_TARGET_FIELDS};
pub use metrics::RegressionMetrics;
pub use pipeline::{
    read_input, resolve_model_path, run_training, train, FitOutcome, TrainingRun, CHECKPOINT_ARTIFACT,
    METRICS_ARTIFACT, REPORT_ARTIFACT,
};
pub use ridge::{fit_ridge, predict, pseudo_inverse, TrainedModel, PINV_RCOND};
pub use split::{split_indices, validation_size, Split, MIN_SAMPLES};
