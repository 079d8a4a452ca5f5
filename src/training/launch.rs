//! Submitting a surrogate training job to the registry

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registry::{JobHandle, JobRequest, JobService, TRAINING_FUNCTION_KEY};
use crate::{Error, Result};

/// Default `target_fields` list.
pub const DEFAULT_TARGET_FIELDS: &str = "von_mises,displacement";

/// Parameters of a training job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchParameters {
    /// Job whose outputs form the training dataset.
    pub dataset_job_id: String,
    /// Fields the surrogate predicts.
    pub target_fields: Vec<String>,
}

/// Split a comma-separated field list, trimming and dropping blanks.
#[must_use]
pub fn parse_target_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// A training launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingLaunch {
    /// Registry model the job attaches to.
    pub campaign_root_model_id: String,
    /// Function key; defaults to [`TRAINING_FUNCTION_KEY`].
    pub function_key: String,
    /// Job parameters.
    pub parameters: LaunchParameters,
}

impl TrainingLaunch {
    /// Launch with the default function key.
    #[must_use]
    pub fn new(campaign_root_model_id: impl Into<String>, dataset_job_id: impl Into<String>, target_fields: &str) -> Self {
        Self {
            campaign_root_model_id: campaign_root_model_id.into(),
            function_key: TRAINING_FUNCTION_KEY.to_string(),
            parameters: LaunchParameters {
                dataset_job_id: dataset_job_id.into(),
                target_fields: parse_target_fields(target_fields),
            },
        }
    }

    /// Override the function key.
    #[must_use]
    pub fn function_key(mut self, key: impl Into<String>) -> Self {
        self.function_key = key.into();
        self
    }

    /// Submit the training job.
    ///
    /// # Errors
    /// Returns `InvalidSpec` for blank ids and any submission failure
    pub fn submit<S: JobService>(&self, service: &S) -> Result<JobHandle> {
        if self.campaign_root_model_id.trim().is_empty() {
            return Err(Error::InvalidSpec("campaign_root_model_id is required".to_string()));
        }
        if self.parameters.dataset_job_id.trim().is_empty() {
            return Err(Error::InvalidSpec("dataset_job_id is required".to_string()));
        }
        let request = JobRequest::new(
            self.campaign_root_model_id.clone(),
            self.function_key.clone(),
            serde_json::to_value(&self.parameters)?,
        );
        let job = service.submit(&request)?;
        info!(job_id = %job.id, function = %self.function_key, "launched training job");
        Ok(job)
    }
}
