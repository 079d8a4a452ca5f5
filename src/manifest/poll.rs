//! Status polling until every tracked job is terminal

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use super::{format_histogram, Manifest};
use crate::registry::JobService;
use crate::Result;

/// Sleep between poll rounds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Sleep between rounds.
    pub interval: Duration,
    /// Round cap; `None` polls until every job is terminal.
    pub max_rounds: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_rounds: None,
        }
    }
}

/// Result of one poll round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRound {
    /// 1-based round number.
    pub round: u32,
    /// Tracked rows in a terminal status after the round.
    pub done: usize,
    /// Tracked rows (rows with a job id).
    pub total: usize,
    /// Status counts over every manifest row.
    pub histogram: BTreeMap<String, usize>,
}

impl PollRound {
    /// Whether every tracked row is terminal.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.done == self.total
    }

    /// `Progress done/total | status=count, ...`
    #[must_use]
    pub fn progress_line(&self) -> String {
        format!(
            "Progress {}/{} | {}",
            self.done,
            self.total,
            format_histogram(&self.histogram)
        )
    }
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No row carries a job id; nothing was queried.
    NothingToPoll,
    /// Every tracked row reached a terminal status.
    Complete(PollRound),
    /// The caller's stop condition fired.
    Stopped(PollRound),
    /// `max_rounds` ran out with rows still non-terminal.
    Exhausted(PollRound),
}

/// Drives manifest rows to terminal statuses.
#[derive(Debug)]
pub struct Poller<'a, S: JobService> {
    service: &'a S,
    options: PollOptions,
}

impl<'a, S: JobService> Poller<'a, S> {
    /// Create a poller over `service`.
    #[must_use]
    pub const fn new(service: &'a S, options: PollOptions) -> Self {
        Self { service, options }
    }

    /// Query every tracked, non-terminal row once and overwrite its status.
    ///
    /// Terminal rows are skipped: terminal is absorbing.
    ///
    /// # Errors
    /// Returns the first status query failure; the round is abandoned
    pub fn poll_round(&self, manifest: &mut Manifest, round: u32) -> Result<PollRound> {
        let mut done = 0;
        let mut total = 0;

        for row in manifest.rows_mut().iter_mut().filter(|row| row.has_job()) {
            total += 1;
            if row.is_terminal() {
                done += 1;
                continue;
            }
            let Some(job_id) = row.job_id.as_deref() else {
                continue;
            };
            let status = self.service.get_status(job_id)?;
            if status != row.status {
                debug!(case_id = %row.case_id, job_id, from = %row.status, to = %status, "status changed");
            }
            row.status = status;
            if row.is_terminal() {
                done += 1;
            }
        }

        Ok(PollRound {
            round,
            done,
            total,
            histogram: manifest.histogram(),
        })
    }

    /// Poll until complete or `max_rounds` is exhausted, persisting to
    /// `output` after every round.
    ///
    /// # Errors
    /// Returns the first query or persistence failure
    pub fn run(&self, manifest: &mut Manifest, output: &Path) -> Result<PollOutcome> {
        self.run_until(manifest, output, |_| false)
    }

    /// Like [`Poller::run`], additionally ending after any round for which
    /// `stop` returns true. `stop` sees every round, the completing one
    /// included, so it doubles as a progress callback.
    ///
    /// # Errors
    /// Returns the first query or persistence failure
    pub fn run_until<F>(&self, manifest: &mut Manifest, output: &Path, mut stop: F) -> Result<PollOutcome>
    where
        F: FnMut(&PollRound) -> bool,
    {
        if manifest.tracked().next().is_none() {
            info!("no submitted jobs in manifest");
            return Ok(PollOutcome::NothingToPoll);
        }

        let mut round = 0u32;
        loop {
            round += 1;
            let result = self.poll_round(manifest, round)?;
            manifest.save(output)?;
            info!(
                round,
                done = result.done,
                total = result.total,
                statuses = %format_histogram(&result.histogram),
                "poll round complete"
            );

            let stop_now = stop(&result);
            if result.is_complete() {
                return Ok(PollOutcome::Complete(result));
            }
            if stop_now {
                return Ok(PollOutcome::Stopped(result));
            }
            if self.options.max_rounds.is_some_and(|cap| round >= cap) {
                return Ok(PollOutcome::Exhausted(result));
            }
            if !self.options.interval.is_zero() {
                std::thread::sleep(self.options.interval);
            }
        }
    }
}
