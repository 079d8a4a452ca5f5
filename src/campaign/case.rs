//! Case Generator - expands a campaign grid into concrete simulation cases

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::spec::{CampaignSpec, DEFAULT_DENSITY, DEFAULT_RESOLUTION, DEFAULT_UNITS};
use crate::{Error, Result};

/// Grid keys every combination must supply.
pub const REQUIRED_INPUTS: &[&str] = &["poisson_ratio", "youngs_modulus", "pressure_pa"];

/// Resolved material properties of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// kg/m^3
    pub density: f64,
    /// Dimensionless.
    pub poisson_ratio: f64,
    /// Pa
    pub youngs_modulus: f64,
}

/// Applied load of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Load kind; campaigns sweep pressure loads.
    #[serde(rename = "type")]
    pub kind: String,
    /// Pa
    pub magnitude: f64,
}

/// Solver scenario of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Mesh resolution.
    pub resolution: u64,
    /// Unit system.
    pub units: String,
}

/// One concrete parameter combination drawn from the campaign grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// `case_NNNNN`, 1-based in enumeration order.
    pub case_id: String,
    /// Grid key to chosen value, in grid declaration order.
    pub inputs: Map<String, Value>,
    /// Resolved material.
    pub material: Material,
    /// Resolved load.
    pub load: Load,
    /// Resolved scenario.
    pub scenario: Scenario,
}

/// Format the case id for 1-based position `index`.
#[must_use]
pub fn case_id(index: usize) -> String {
    format!("case_{index:05}")
}

/// Odometer over the cartesian product of the grid axes.
///
/// Yields index vectors; the last axis varies fastest.
struct CartesianIndices {
    sizes: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl CartesianIndices {
    fn new(sizes: Vec<usize>) -> Self {
        let current = if sizes.iter().all(|&s| s > 0) {
            Some(vec![0; sizes.len()])
        } else {
            None
        };
        Self { sizes, current }
    }
}

impl Iterator for CartesianIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.clone()?;
        let mut advanced = false;
        if let Some(cur) = self.current.as_mut() {
            for axis in (0..cur.len()).rev() {
                cur[axis] += 1;
                if cur[axis] < self.sizes[axis] {
                    advanced = true;
                    break;
                }
                cur[axis] = 0;
            }
        }
        if !advanced {
            self.current = None;
        }
        Some(out)
    }
}

fn numeric_input(inputs: &Map<String, Value>, key: &str, case_id: &str) -> Result<f64> {
    inputs
        .get(key)
        .ok_or_else(|| Error::InvalidSpec(format!("{case_id}: required grid field '{key}' is missing")))?
        .as_f64()
        .ok_or_else(|| Error::InvalidSpec(format!("{case_id}: grid field '{key}' must be numeric")))
}

fn build_case(spec: &CampaignSpec, index: usize, inputs: Map<String, Value>) -> Result<Case> {
    let id = case_id(index);

    let density = match inputs.get("density") {
        Some(v) => v
            .as_f64()
            .ok_or_else(|| Error::InvalidSpec(format!("{id}: grid field 'density' must be numeric")))?,
        None => spec.base_material.density.unwrap_or(DEFAULT_DENSITY),
    };

    let material = Material {
        density,
        poisson_ratio: numeric_input(&inputs, "poisson_ratio", &id)?,
        youngs_modulus: numeric_input(&inputs, "youngs_modulus", &id)?,
    };
    let load = Load {
        kind: "pressure".to_string(),
        magnitude: numeric_input(&inputs, "pressure_pa", &id)?,
    };
    let scenario = Scenario {
        resolution: spec.scenario.resolution.unwrap_or(DEFAULT_RESOLUTION),
        units: spec
            .scenario
            .units
            .clone()
            .unwrap_or_else(|| DEFAULT_UNITS.to_string()),
    };

    Ok(Case {
        case_id: id,
        inputs,
        material,
        load,
        scenario,
    })
}

/// Expand `spec.grid` into cases.
///
/// Enumeration follows grid key declaration order with the last key varying
/// fastest, so replaying a spec reproduces the same numbering. A positive
/// `max_cases` keeps the first `max_cases` cases.
///
/// # Errors
/// Returns `InvalidSpec` for an empty grid, an empty or non-list grid entry,
/// or any case lacking a numeric `poisson_ratio`, `youngs_modulus` or
/// `pressure_pa`. Nothing is returned on failure.
pub fn generate_cases(spec: &CampaignSpec) -> Result<Vec<Case>> {
    let axes = spec.axes()?;

    for required in REQUIRED_INPUTS {
        if !axes.iter().any(|(key, _)| key == required) {
            return Err(Error::InvalidSpec(format!(
                "grid must sweep required field '{required}'"
            )));
        }
    }

    let sizes: Vec<usize> = axes.iter().map(|(_, values)| values.len()).collect();
    let limit = spec.case_limit().unwrap_or(usize::MAX);

    let mut cases = Vec::new();
    for (offset, picks) in CartesianIndices::new(sizes).take(limit).enumerate() {
        let inputs: Map<String, Value> = axes
            .iter()
            .zip(&picks)
            .map(|((key, values), &pick)| ((*key).to_string(), values[pick].clone()))
            .collect();
        let case = build_case(spec, offset + 1, inputs)?;
        debug!(case_id = %case.case_id, "generated case");
        cases.push(case);
    }

    info!(cases = cases.len(), axes = axes.len(), "expanded campaign grid");
    Ok(cases)
}
