//! # Surrogate Pipeline: Simulation Campaigns to Quality-Gated Surrogates
//!
//! **Version**: 0.1.0
//!
//! Surrogate Pipeline expands a parametric grid into simulation cases,
//! submits them to a registry job service, polls the jobs to terminal
//! states, gates progression on quality thresholds, and fits a baseline
//! ridge-regression surrogate over the resulting data.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Jidoka**: Case generation stops the line on the first invalid case;
//!   partial campaigns are never submitted
//! - **Poka-Yoke safety**: Manifests are replaced atomically, never
//!   half-written
//! - **Genchi Genbutsu**: Quality gates read the persisted manifest and
//!   metrics, not in-memory state
//! - **Heijunka**: Submissions are throttled and checkpointed in fixed batches
//!
//! ## Pipeline
//!
//! ```text
//! CampaignSpec ─> generate_cases ─> make_job_parameters ─> Submitter ─> Manifest
//!                                                                          │
//!                           run_all_checks <─ final Manifest <─ Poller <───┘
//!                                 ^
//! dataset ─> run_training ─> metrics.json
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use surrogate_pipeline::campaign::{generate_cases, CampaignSpec};
//!
//! let spec = CampaignSpec::from_json(r#"{
//!     "grid": {
//!         "pressure_pa": [1e5, 2e5],
//!         "poisson_ratio": [0.3],
//!         "youngs_modulus": [2.0e11, 2.1e11]
//!     }
//! }"#)?;
//! let cases = generate_cases(&spec)?;
//! assert_eq!(cases.len(), 4);
//! assert_eq!(cases[0].case_id, "case_00001");
//! # Ok::<(), surrogate_pipeline::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod campaign;
pub mod error;
pub mod fsio;
pub mod gates;
pub mod manifest;
pub mod registry;
pub mod status;
pub mod training;

pub use error::{Error, Result};
