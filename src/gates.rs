//! Quality gates for campaign throughput, dataset readiness and surrogate accuracy
//!
//! Every check group is evaluated unconditionally; a failing group never
//! hides the results of the others.
//!
//! Missing, null or non-finite metric fields deserialize to sentinels that
//! fail their checks (MAE 999.0, R2 -1.0), so an incomplete metrics document
//! can never pass.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::manifest::ManifestRow;
use crate::status::StatusClass;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// Threshold met.
    Pass,
    /// Threshold missed.
    Fail,
}

impl CheckStatus {
    const fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// `PASS` or `FAIL`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of one named threshold check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name.
    pub name: String,
    /// PASS/FAIL.
    pub status: CheckStatus,
    /// Threshold, human-readable.
    pub target: String,
    /// Observed value, human-readable.
    pub actual: String,
    /// Explanation.
    pub detail: String,
}

impl CheckResult {
    fn new(name: &str, ok: bool, target: String, actual: String, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::from_bool(ok),
            target,
            actual,
            detail: detail.into(),
        }
    }

    /// Whether the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Thresholds for every check group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    /// Minimum successful simulations.
    pub min_successes: usize,
    /// Maximum failure rate, percent.
    pub max_failure_rate_pct: f64,
    /// Minimum samples ready for training.
    pub min_samples: u64,
    /// Maximum validation normalized MAE.
    pub max_normalized_mae: f64,
    /// Minimum validation R2.
    pub min_r2: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_successes: 10,
            max_failure_rate_pct: 20.0,
            min_samples: 10,
            max_normalized_mae: 0.08,
            min_r2: 0.90,
        }
    }
}

/// Dataset readiness summary document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Samples available after filtering failed cases.
    #[serde(default)]
    pub samples_ready: u64,
    /// Whether every required field/unit is present.
    #[serde(default)]
    pub schema_valid: bool,
}

const fn missing_mae() -> f64 {
    999.0
}

const fn missing_r2() -> f64 {
    -1.0
}

fn finite_or<'de, D: Deserializer<'de>>(deserializer: D, sentinel: f64) -> std::result::Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|v| v.is_finite())
        .unwrap_or(sentinel))
}

fn mae_or_missing<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    finite_or(deserializer, missing_mae())
}

fn r2_or_missing<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    finite_or(deserializer, missing_r2())
}

/// Surrogate validation metrics document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurrogateMetrics {
    /// Validation MAE normalized by target scale.
    #[serde(default = "missing_mae", deserialize_with = "mae_or_missing")]
    pub val_normalized_mae: f64,
    /// Validation coefficient of determination.
    #[serde(default = "missing_r2", deserialize_with = "r2_or_missing")]
    pub val_r2: f64,
}

impl Default for SurrogateMetrics {
    fn default() -> Self {
        Self {
            val_normalized_mae: missing_mae(),
            val_r2: missing_r2(),
        }
    }
}

fn pct(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = numerator as f64 / denominator as f64;
    100.0 * ratio
}

/// Success count and failure rate over the final manifest.
#[must_use]
pub fn check_campaign_throughput(rows: &[ManifestRow], thresholds: &GateThresholds) -> Vec<CheckResult> {
    let total = rows.len();
    let (successes, failures) = rows.iter().fold((0, 0), |(s, f), row| match StatusClass::of(&row.status) {
        StatusClass::Success => (s + 1, f),
        StatusClass::Failure => (s, f + 1),
        StatusClass::NonTerminal => (s, f),
    });
    let failure_rate_pct = pct(failures, total);

    vec![
        CheckResult::new(
            "Successful simulations",
            successes >= thresholds.min_successes,
            format!(">= {} cases", thresholds.min_successes),
            format!("{successes} cases"),
            format!("{successes}/{total} cases finished in success states"),
        ),
        CheckResult::new(
            "Failure rate",
            failure_rate_pct <= thresholds.max_failure_rate_pct,
            format!("<= {:.1}%", thresholds.max_failure_rate_pct),
            format!("{failure_rate_pct:.1}%"),
            format!("{failures}/{total} cases in failure states"),
        ),
    ]
}

/// Sample count and schema validity of the training dataset.
#[must_use]
pub fn check_dataset_readiness(summary: &DatasetSummary, thresholds: &GateThresholds) -> Vec<CheckResult> {
    vec![
        CheckResult::new(
            "Dataset samples ready",
            summary.samples_ready >= thresholds.min_samples,
            format!(">= {}", thresholds.min_samples),
            summary.samples_ready.to_string(),
            "Count of samples available after filtering failed cases",
        ),
        CheckResult::new(
            "Dataset schema validation",
            summary.schema_valid,
            "true".to_string(),
            summary.schema_valid.to_string(),
            "All required fields/units present for training tensors",
        ),
    ]
}

/// Validation MAE and R2 of the surrogate.
#[must_use]
pub fn check_surrogate_metrics(metrics: &SurrogateMetrics, thresholds: &GateThresholds) -> Vec<CheckResult> {
    let mae = metrics.val_normalized_mae;
    let r2 = metrics.val_r2;
    vec![
        CheckResult::new(
            "Surrogate val normalized MAE",
            mae <= thresholds.max_normalized_mae,
            format!("<= {:.2}", thresholds.max_normalized_mae),
            format!("{mae:.2}"),
            "Lower is better",
        ),
        CheckResult::new(
            "Surrogate val R2",
            r2 >= thresholds.min_r2,
            format!(">= {:.2}", thresholds.min_r2),
            format!("{r2:.2}"),
            "Higher is better",
        ),
    ]
}

/// All check groups, in throughput, dataset, metrics order.
#[must_use]
pub fn run_all_checks(
    rows: &[ManifestRow],
    summary: &DatasetSummary,
    metrics: &SurrogateMetrics,
    thresholds: &GateThresholds,
) -> Vec<CheckResult> {
    let mut results = check_campaign_throughput(rows, thresholds);
    results.extend(check_dataset_readiness(summary, thresholds));
    results.extend(check_surrogate_metrics(metrics, thresholds));
    results
}

/// One line per check followed by the `passed/total` summary.
#[must_use]
pub fn format_report(results: &[CheckResult]) -> String {
    let mut lines: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "- {:30} {:4} (target: {}, actual: {})",
                r.name, r.status, r.target, r.actual
            )
        })
        .collect();
    let passed = results.iter().filter(|r| r.passed()).count();
    lines.push(format!("\nSummary: {passed}/{} checks passed", results.len()));
    lines.join("\n")
}
