//! Campaign submission with periodic manifest checkpoints

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use super::{Manifest, ManifestRow};
use crate::campaign::{make_job_parameters, CampaignSpec, Case};
use crate::registry::{JobRequest, JobService, SIMULATION_FUNCTION_KEY};
use crate::Result;

/// Delay between successive submissions.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(50);

/// Cases previewed in dry-run mode.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// Submissions between manifest checkpoints.
pub const DEFAULT_CHECKPOINT_EVERY: usize = 25;

/// What to do with cases that already have a job in a previous manifest.
///
/// The service, not the manifest, is the source of truth for created jobs.
/// A run interrupted between a submission and the next checkpoint will submit
/// those cases again under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// Submit every case, ignoring any previous manifest.
    #[default]
    AlwaysSubmit,
    /// Carry over rows whose case already has a job id; submit the rest.
    SkipRecorded,
}

/// Submission settings.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Function the jobs run.
    pub function_key: String,
    /// Delay between successive submissions.
    pub throttle: Duration,
    /// Write a payload preview instead of submitting.
    pub dry_run: bool,
    /// Cases included in a dry-run preview.
    pub preview_limit: usize,
    /// Submissions between checkpoints (0 behaves as 1).
    pub checkpoint_every: usize,
    /// Agent to pin jobs to.
    pub assigned_agent_id: Option<String>,
    /// Handling of previously recorded jobs.
    pub resume: ResumePolicy,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            function_key: SIMULATION_FUNCTION_KEY.to_string(),
            throttle: DEFAULT_THROTTLE,
            dry_run: false,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            assigned_agent_id: None,
            resume: ResumePolicy::default(),
        }
    }
}

/// Turns cases into manifest rows by submitting one job per case.
#[derive(Debug)]
pub struct Submitter<'a, S: JobService> {
    service: &'a S,
    options: SubmitOptions,
}

impl<'a, S: JobService> Submitter<'a, S> {
    /// Create a submitter over `service`.
    #[must_use]
    pub const fn new(service: &'a S, options: SubmitOptions) -> Self {
        Self { service, options }
    }

    /// Submission settings in effect.
    #[must_use]
    pub const fn options(&self) -> &SubmitOptions {
        &self.options
    }

    /// Dry-run preview: mapped payloads for the first `preview_limit` cases,
    /// no service calls.
    #[must_use]
    pub fn preview(&self, spec: &CampaignSpec, cases: &[Case]) -> Manifest {
        Manifest::from_rows(
            cases
                .iter()
                .take(self.options.preview_limit)
                .map(|case| ManifestRow::dry_run(make_job_parameters(spec, case)))
                .collect(),
        )
    }

    /// Submit `cases` and persist the manifest to `output` at every
    /// checkpoint and after the last case.
    ///
    /// In dry-run mode writes the preview instead. With
    /// [`ResumePolicy::SkipRecorded`], rows of `previous` that already carry a
    /// job id are carried over unchanged.
    ///
    /// # Errors
    /// Returns `InvalidSpec` if the spec has no root model id (dry run
    /// included, before anything is written), or the first
    /// submission/persistence error. Rows submitted before a submission error
    /// are persisted before it is returned.
    pub fn run(
        &self,
        spec: &CampaignSpec,
        cases: &[Case],
        output: &Path,
        previous: Option<&Manifest>,
    ) -> Result<Manifest> {
        let model_id = spec.require_root_model_id()?;
        if self.options.dry_run {
            let preview = self.preview(spec, cases);
            preview.save(output)?;
            info!(rows = preview.len(), path = %output.display(), "wrote dry-run payload preview");
            return Ok(preview);
        }

        let recorded: HashMap<&str, &ManifestRow> = match (self.options.resume, previous) {
            (ResumePolicy::SkipRecorded, Some(prev)) => {
                prev.tracked().map(|row| (row.case_id.as_str(), row)).collect()
            }
            _ => HashMap::new(),
        };

        let total = cases.len();
        let every = self.options.checkpoint_every.max(1);
        let mut manifest = Manifest::new();
        let mut submitted = 0usize;

        for (idx, case) in cases.iter().enumerate() {
            if let Some(row) = recorded.get(case.case_id.as_str()) {
                manifest.push((*row).clone());
                continue;
            }

            if submitted > 0 && !self.options.throttle.is_zero() {
                std::thread::sleep(self.options.throttle);
            }

            let parameters = serde_json::to_value(make_job_parameters(spec, case))?;
            let mut request = JobRequest::new(model_id, &self.options.function_key, parameters);
            request.assigned_agent_id.clone_from(&self.options.assigned_agent_id);

            let job = match self.service.submit(&request) {
                Ok(job) => job,
                Err(err) => {
                    warn!(case_id = %case.case_id, error = %err, "submission failed; checkpointing");
                    manifest.save(output)?;
                    return Err(err);
                }
            };
            manifest.push(ManifestRow::submitted(&case.case_id, job.id));
            submitted += 1;

            let position = idx + 1;
            if position % every == 0 || position == total {
                manifest.save(output)?;
                info!(submitted = position, total, "submission checkpoint");
            }
        }

        // Covers the all-carried-over and empty-case-list paths.
        manifest.save(output)?;
        info!(rows = manifest.len(), new_jobs = submitted, path = %output.display(), "wrote manifest");
        Ok(manifest)
    }
}
