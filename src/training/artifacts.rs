//! Training artifacts: metrics record, checkpoint, report, output manifest
//!
//! Every artifact listed in the output manifest carries a content hash in
//! `algorithm:hex_digest` form, e.g.
//! `sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::config::TrainingConfig;
use super::metrics::RegressionMetrics;
use crate::Result;

/// Metrics document file name.
pub const METRICS_FILE: &str = "metrics.json";

/// Checkpoint file name.
pub const CHECKPOINT_FILE: &str = "model_checkpoint.json";

/// Report file name.
pub const REPORT_FILE: &str = "training_report.md";

/// Host facts recorded with every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    /// Operating system (`linux`, `macos`, ...).
    pub os: String,
    /// CPU architecture.
    pub arch: String,
    /// OS family (`unix`, `windows`).
    pub family: String,
    /// Version of this crate.
    pub crate_version: String,
    /// Whether `nvidia-smi -L` lists at least one GPU.
    pub nvidia_gpu_available: bool,
}

impl HardwareInfo {
    /// Probe the current host.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            nvidia_gpu_available: has_nvidia_gpu(),
        }
    }
}

/// `nvidia-smi -L` exits 0 with non-empty output. A missing tool counts as
/// no GPU.
#[must_use]
pub fn has_nvidia_gpu() -> bool {
    Command::new("nvidia-smi")
        .arg("-L")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .is_ok_and(|out| out.status.success() && !String::from_utf8_lossy(&out.stdout).trim().is_empty())
}

/// Everything measured in one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Backend that produced the fit.
    pub backend: String,
    /// Registry job that produced the dataset, if known.
    pub dataset_job_id: String,
    /// Dataset provenance.
    pub dataset_source: String,
    /// Total samples.
    pub samples: usize,
    /// Feature count.
    pub features: usize,
    /// Feature names.
    pub feature_names: Vec<String>,
    /// Metrics on the training partition.
    pub train_metrics: RegressionMetrics,
    /// Metrics on the validation partition.
    pub val_metrics: RegressionMetrics,
    /// Validation MAE normalized by the validation target range.
    pub val_normalized_mae: f64,
    /// Validation R2, repeated at top level for the quality gates.
    pub val_r2: f64,
    /// Resolved configuration.
    pub training_config: TrainingConfig,
    /// Host facts.
    pub hardware: HardwareInfo,
    /// Completion time (UTC).
    pub completed_at: DateTime<Utc>,
    /// Wall-clock duration, millisecond resolution.
    pub duration_seconds: f64,
}

/// Artifact written by a run, as listed in the output manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    name: String,
    path: PathBuf,
    size_bytes: u64,
    cas_hash: String,
    created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// Create a record from known values.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, cas_hash: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size_bytes,
            cas_hash: cas_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Hash and measure an artifact already on disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read
    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, path, content_hash(&bytes), bytes.len() as u64))
    }

    /// Artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content hash, `sha256:<hex>`.
    #[must_use]
    pub fn cas_hash(&self) -> &str {
        &self.cas_hash
    }

    /// Size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// When the record was made.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// `sha256:<hex digest>` of `bytes`.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(7 + digest.len() * 2);
    out.push_str("sha256:");
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Markdown summary of a run.
#[must_use]
pub fn render_report(record: &MetricsRecord) -> String {
    let val = &record.val_metrics;
    let lines = [
        "# NeMo Surrogate Training Report (Scaffold)".to_string(),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        format!("- Backend: `{}`", record.backend),
        format!("- Dataset source: `{}`", record.dataset_source),
        format!("- Samples: `{}`", record.samples),
        format!("- Features: `{}`", record.features),
        format!("- Dataset job id: `{}`", record.dataset_job_id),
        String::new(),
        "## Validation Metrics".to_string(),
        String::new(),
        format!("- MSE: `{:.6}`", val.mse),
        format!("- MAE: `{:.6}`", val.mae),
        format!("- R2: `{:.6}`", val.r2),
        format!("- Normalized MAE: `{:.6}`", record.val_normalized_mae),
        String::new(),
        "## Hardware Notes".to_string(),
        String::new(),
        format!(
            "- Host: `{}/{}`, NVIDIA GPU detected: `{}`",
            record.hardware.os, record.hardware.arch, record.hardware.nvidia_gpu_available
        ),
        "- The baseline backend runs on CPU and is meant for integration smoke tests.".to_string(),
        "- Production surrogate training needs Linux with an NVIDIA CUDA GPU.".to_string(),
        String::new(),
    ];
    lines.join("\n")
}
