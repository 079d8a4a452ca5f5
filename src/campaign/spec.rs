//! Campaign Spec - the immutable input document of a simulation sweep

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Simulation type used when the spec does not name one.
pub const DEFAULT_SIMULATION_TYPE: &str = "linear_elastic";

/// Campaign name used when the spec does not name one.
pub const DEFAULT_CAMPAIGN_NAME: &str = "pyintact_campaign";

/// Material density fallback (kg/m^3, structural steel).
pub const DEFAULT_DENSITY: f64 = 7800.0;

/// Mesh resolution fallback.
pub const DEFAULT_RESOLUTION: u64 = 1000;

/// Unit system fallback.
pub const DEFAULT_UNITS: &str = "MKS";

/// Spec-level material defaults. Only density may be defaulted; the elastic
/// constants must come from the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDefaults {
    /// Density fallback for combinations that do not sweep it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
}

/// Spec-level scenario settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Mesh resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u64>,
    /// Unit system name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// Registry model ids of the geometry inputs, keyed by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryRefs {
    /// Body under load.
    #[serde(default)]
    pub body_model_id: Option<String>,
    /// Face the pressure load is applied to.
    #[serde(default)]
    pub load_face_model_id: Option<String>,
    /// Face held fixed.
    #[serde(default)]
    pub restraint_face_model_id: Option<String>,
}

/// Campaign spec: a parametric grid plus the fixed settings shared by every case.
///
/// `grid` maps parameter name to its candidate values. Key order is the
/// declaration order of the source document and determines case numbering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignSpec {
    /// Parameter name to non-empty list of candidate values.
    #[serde(default)]
    pub grid: Map<String, Value>,
    /// Spec-level material defaults.
    #[serde(default)]
    pub base_material: MaterialDefaults,
    /// Scenario settings.
    #[serde(default)]
    pub scenario: ScenarioSpec,
    /// Geometry references by role.
    #[serde(default)]
    pub geometry: GeometryRefs,
    /// Simulation type passed through to the solver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_type: Option<String>,
    /// Campaign name, used as the campaign id in job payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    /// Registry model the campaign's jobs are attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_root_model_id: Option<String>,
    /// Optional cap on the number of generated cases. Non-positive and
    /// non-integer values (`10.0`, `"5"`) are ignored.
    #[serde(default, deserialize_with = "integer_or_none", skip_serializing_if = "Option::is_none")]
    pub max_cases: Option<i64>,
}

fn integer_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(Value::as_i64))
}

impl CampaignSpec {
    /// Parse a spec from JSON text.
    ///
    /// # Errors
    /// Returns error if the text is not a JSON object of the spec's shape
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidSpec(format!("unreadable campaign spec: {e}")))
    }

    /// Simulation type, defaulted.
    #[must_use]
    pub fn simulation_type(&self) -> &str {
        self.simulation_type.as_deref().unwrap_or(DEFAULT_SIMULATION_TYPE)
    }

    /// Campaign name, defaulted.
    #[must_use]
    pub fn campaign_name(&self) -> &str {
        self.campaign_name.as_deref().unwrap_or(DEFAULT_CAMPAIGN_NAME)
    }

    /// Positive case cap, if one is set.
    #[must_use]
    pub fn case_limit(&self) -> Option<usize> {
        self.max_cases
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Root model id for submission, trimmed.
    ///
    /// # Errors
    /// Returns `InvalidSpec` if the field is absent or blank
    pub fn require_root_model_id(&self) -> Result<&str> {
        match self.campaign_root_model_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::InvalidSpec(
                "campaign spec missing required field: campaign_root_model_id".to_string(),
            )),
        }
    }

    /// Validate the grid and return its axes in declaration order.
    ///
    /// # Errors
    /// Returns `InvalidSpec` if the grid is empty or any entry is not a non-empty list
    pub fn axes(&self) -> Result<Vec<(&str, &[Value])>> {
        if self.grid.is_empty() {
            return Err(Error::InvalidSpec(
                "campaign spec must define a non-empty 'grid' object".to_string(),
            ));
        }
        self.grid
            .iter()
            .map(|(key, values)| match values {
                Value::Array(list) if !list.is_empty() => Ok((key.as_str(), list.as_slice())),
                _ => Err(Error::InvalidSpec(format!(
                    "every entry in 'grid' must be a non-empty list (offending key: '{key}')"
                ))),
            })
            .collect()
    }
}
