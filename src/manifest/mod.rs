//! Campaign manifest: the persisted, resumable record of submitted jobs
//!
//! ## Lifecycle
//!
//! ```text
//! [Case] ──Submitter──> Manifest (status = submitted | dry_run)
//!                          │
//!                          └──Poller (rounds)──> Manifest (every row terminal)
//! ```
//!
//! The manifest is a JSON array of [`ManifestRow`]. It is rewritten in full
//! (atomic replace) at every checkpoint, and reloading it is idempotent: rows
//! already in a terminal status are never queried again.

mod poll;
mod submit;

pub use poll::{PollOptions, PollOutcome, PollRound, Poller, DEFAULT_POLL_INTERVAL};
pub use submit::{
    ResumePolicy, SubmitOptions, Submitter, DEFAULT_CHECKPOINT_EVERY, DEFAULT_PREVIEW_LIMIT,
    DEFAULT_THROTTLE,
};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::campaign::JobParameters;
use crate::fsio;
use crate::status::is_terminal;
use crate::Result;

/// Status of a preview row written in dry-run mode.
pub const STATUS_DRY_RUN: &str = "dry_run";

/// Status of a row right after submission.
pub const STATUS_SUBMITTED: &str = "submitted";

/// One case's submission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    /// Case id the job was created for.
    pub case_id: String,
    /// Job id; `None` until submitted, and always `None` for dry-run rows.
    pub job_id: Option<String>,
    /// `dry_run`, `submitted`, or a canonical status token.
    pub status: String,
    /// Payload preview, only on dry-run rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JobParameters>,
}

impl ManifestRow {
    /// Row for a submitted job.
    #[must_use]
    pub fn submitted(case_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            job_id: Some(job_id.into()),
            status: STATUS_SUBMITTED.to_string(),
            parameters: None,
        }
    }

    /// Dry-run preview row.
    #[must_use]
    pub fn dry_run(parameters: JobParameters) -> Self {
        Self {
            case_id: parameters.case_id.clone(),
            job_id: None,
            status: STATUS_DRY_RUN.to_string(),
            parameters: Some(parameters),
        }
    }

    /// Whether the row has a job to track.
    #[must_use]
    pub fn has_job(&self) -> bool {
        self.job_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Whether the row's status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.status)
    }
}

/// Ordered sequence of manifest rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
}

impl Manifest {
    /// Create an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing rows.
    #[must_use]
    pub fn from_rows(rows: Vec<ManifestRow>) -> Self {
        Self { rows }
    }

    /// Load a persisted manifest.
    ///
    /// # Errors
    /// Returns error if the file is unreadable or not a manifest document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        fsio::load_json(path)
    }

    /// Persist the full manifest, atomically replacing `path`.
    ///
    /// # Errors
    /// Returns error if the document cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fsio::dump_json(path, self)
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    /// Mutable rows.
    pub fn rows_mut(&mut self) -> &mut [ManifestRow] {
        &mut self.rows
    }

    /// Append a row.
    pub fn push(&mut self, row: ManifestRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the manifest has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a case's row.
    #[must_use]
    pub fn get(&self, case_id: &str) -> Option<&ManifestRow> {
        self.rows.iter().find(|row| row.case_id == case_id)
    }

    /// Rows that carry a job id.
    pub fn tracked(&self) -> impl Iterator<Item = &ManifestRow> {
        self.rows.iter().filter(|row| row.has_job())
    }

    /// `(terminal, tracked)` counts over rows that carry a job id.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.tracked().fold((0, 0), |(done, total), row| {
            (done + usize::from(row.is_terminal()), total + 1)
        })
    }

    /// Count of rows per status, over every row.
    #[must_use]
    pub fn histogram(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.status.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Histogram rendered as `status=count, ...` in status order.
    #[must_use]
    pub fn summary(&self) -> String {
        format_histogram(&self.histogram())
    }
}

/// Render a status histogram as `status=count, ...`.
#[must_use]
pub fn format_histogram(histogram: &BTreeMap<String, usize>) -> String {
    histogram
        .iter()
        .map(|(status, count)| format!("{status}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
