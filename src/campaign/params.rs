//! Job Parameter Mapper - projects a case into a job submission payload

use serde::{Deserialize, Serialize};

use super::case::{Case, Load, Material, Scenario};
use super::spec::CampaignSpec;

/// Solver configuration block nested in every job payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation type.
    pub simulation_type: String,
    /// Material of the case.
    pub material: Material,
    /// Load of the case.
    pub load: Load,
    /// Scenario of the case.
    pub scenario: Scenario,
}

/// Submission payload for one case.
///
/// Geometry roles missing from the spec serialize as `null`; the job service
/// decides whether to reject or default them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Case id.
    pub case_id: String,
    /// Body geometry model.
    pub geometry_model_id: Option<String>,
    /// Load face geometry model.
    pub load_geometry_model_id: Option<String>,
    /// Restraint face geometry model.
    pub restraint_geometry_model_id: Option<String>,
    /// Solver configuration.
    pub simulation_config: SimulationConfig,
    /// Campaign name.
    pub campaign_id: String,
}

/// Build the submission payload for `case`. Pure.
#[must_use]
pub fn make_job_parameters(spec: &CampaignSpec, case: &Case) -> JobParameters {
    JobParameters {
        case_id: case.case_id.clone(),
        geometry_model_id: spec.geometry.body_model_id.clone(),
        load_geometry_model_id: spec.geometry.load_face_model_id.clone(),
        restraint_geometry_model_id: spec.geometry.restraint_face_model_id.clone(),
        simulation_config: SimulationConfig {
            simulation_type: spec.simulation_type().to_string(),
            material: case.material.clone(),
            load: case.load.clone(),
            scenario: case.scenario.clone(),
        },
        campaign_id: spec.campaign_name().to_string(),
    }
}
