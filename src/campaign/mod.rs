//! Campaign generation: spec → cases → job payloads
//!
//! ## Overview
//!
//! ```text
//! CampaignSpec ──> generate_cases ──> [Case] ──> make_job_parameters ──> JobParameters
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use surrogate_pipeline::campaign::{generate_cases, make_job_parameters, CampaignSpec};
//!
//! let spec = CampaignSpec::from_json(r#"{
//!     "grid": {
//!         "pressure_pa": [1e5, 2e5],
//!         "poisson_ratio": [0.3],
//!         "youngs_modulus": [2.1e11]
//!     },
//!     "campaign_name": "beam_sweep"
//! }"#)?;
//!
//! let cases = generate_cases(&spec)?;
//! assert_eq!(cases.len(), 2);
//!
//! let payload = make_job_parameters(&spec, &cases[0]);
//! assert_eq!(payload.campaign_id, "beam_sweep");
//! # Ok::<(), surrogate_pipeline::Error>(())
//! ```

mod case;
mod params;
mod spec;

pub use case::{case_id, generate_cases, Case, Load, Material, Scenario, REQUIRED_INPUTS};
pub use params::{make_job_parameters, JobParameters, SimulationConfig};
pub use spec::{
    CampaignSpec, GeometryRefs, MaterialDefaults, ScenarioSpec, DEFAULT_CAMPAIGN_NAME,
    DEFAULT_DENSITY, DEFAULT_RESOLUTION, DEFAULT_SIMULATION_TYPE, DEFAULT_UNITS,
};
