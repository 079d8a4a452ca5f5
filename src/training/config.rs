//! Training configuration and backend selection

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Backend name of the baseline ridge fit.
pub const BASELINE_BACKEND: &str = "baseline_mlp";

/// Backend name of the production trainer, which this build does not ship.
pub const PHYSICSNEMO_BACKEND: &str = "physicsnemo";

fn default_backend() -> String {
    BASELINE_BACKEND.to_string()
}

fn default_target_column() -> String {
    "target".to_string()
}

const fn default_val_split() -> f64 {
    0.2
}

const fn default_random_seed() -> u64 {
    42
}

const fn default_ridge_lambda() -> f64 {
    1e-6
}

/// Resolved training configuration.
///
/// Unrecognized keys are kept in `extra` so the metrics record echoes the
/// configuration exactly as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Backend name (see [`TrainingBackend`]).
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Target column; the last column is used if absent from the data.
    #[serde(default = "default_target_column")]
    pub target_column: String,
    /// Validation fraction, clamped to `[0.05, 0.5]` at split time.
    #[serde(default = "default_val_split")]
    pub val_split: f64,
    /// Shuffle seed.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// L2 penalty on the (non-bias) weights.
    #[serde(default = "default_ridge_lambda")]
    pub ridge_lambda: f64,
    /// Feature allow-list for tabular datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_columns: Option<Vec<String>>,
    /// Any other supplied keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            target_column: default_target_column(),
            val_split: default_val_split(),
            random_seed: default_random_seed(),
            ridge_lambda: default_ridge_lambda(),
            feature_columns: None,
            extra: Map::new(),
        }
    }
}

impl TrainingConfig {
    /// Parse the `training_config` input: an object, a JSON-encoded object
    /// string, or null/blank for all defaults. Supplied keys override defaults.
    ///
    /// # Errors
    /// Returns `InvalidSpec` for any other shape or mistyped field
    pub fn parse(raw: Option<&Value>) -> Result<Self> {
        let object = match raw {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(Value::String(text)) if text.trim().is_empty() => Value::Object(Map::new()),
            Some(Value::String(text)) => serde_json::from_str(text.trim())
                .map_err(|e| Error::InvalidSpec(format!("training_config is not valid JSON: {e}")))?,
            Some(obj @ Value::Object(_)) => obj.clone(),
            Some(_) => {
                return Err(Error::InvalidSpec(
                    "training_config must be an object or JSON string".to_string(),
                ))
            }
        };
        if !object.is_object() {
            return Err(Error::InvalidSpec(
                "training_config must decode to a JSON object".to_string(),
            ));
        }
        serde_json::from_value(object).map_err(|e| Error::InvalidSpec(format!("training_config: {e}")))
    }

    /// Backend to train with.
    ///
    /// # Errors
    /// Returns `UnsupportedBackend` for the production backend and for any
    /// unrecognized name; there is no fallback to the baseline
    pub fn training_backend(&self) -> Result<TrainingBackend> {
        TrainingBackend::parse(&self.backend)
    }
}

/// Training backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingBackend {
    /// Ridge-regularized linear least squares.
    Baseline,
    /// Production GPU trainer. Recognized so it can be refused explicitly.
    PhysicsNemo,
}

impl TrainingBackend {
    /// Resolve a backend name (case-insensitive) to an implemented backend.
    ///
    /// # Errors
    /// Returns `UnsupportedBackend` unless the name selects the baseline
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            BASELINE_BACKEND => Ok(Self::Baseline),
            PHYSICSNEMO_BACKEND => Err(Error::UnsupportedBackend(
                "backend 'physicsnemo' is not implemented in this build. \
                 Use backend='baseline_mlp' for smoke tests, then plug in a production GPU trainer"
                    .to_string(),
            )),
            other => Err(Error::UnsupportedBackend(format!(
                "unknown backend '{other}' (supported: '{BASELINE_BACKEND}')"
            ))),
        }
    }

    /// Canonical backend name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => BASELINE_BACKEND,
            Self::PhysicsNemo => PHYSICSNEMO_BACKEND,
        }
    }
}
