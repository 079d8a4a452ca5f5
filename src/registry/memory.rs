//! In-memory job service using `DashMap`.
//!
//! Jobs live only as long as the service value. Each job follows a status
//! script: every status query advances one step until the last entry, which
//! then sticks. Useful for dry exercises of the submit/poll loop and for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;

use super::{JobHandle, JobRequest, JobService, RegistryItem};
use crate::{Error, Result};

/// Status a freshly submitted job reports.
const INITIAL_STATUS: &str = "queued";

#[derive(Debug)]
struct MemoryJob {
    request: JobRequest,
    current: String,
    script: VecDeque<String>,
    queries: usize,
    fail_queries: bool,
}

/// In-process job service.
///
/// # Example
///
/// ```rust
/// use surrogate_pipeline::registry::{JobRequest, JobService, MemoryJobService};
///
/// let service = MemoryJobService::new().with_script(&["running", "completed"]);
/// let job = service.submit(&JobRequest::new("m", "f", serde_json::Value::Null)).unwrap();
///
/// assert_eq!(service.get_status(&job.id).unwrap(), "running");
/// assert_eq!(service.get_status(&job.id).unwrap(), "completed");
/// assert_eq!(service.get_status(&job.id).unwrap(), "completed");
/// ```
#[derive(Debug, Default)]
pub struct MemoryJobService {
    jobs: DashMap<String, MemoryJob>,
    next_id: AtomicU64,
    submit_calls: AtomicUsize,
    submit_limit: Option<usize>,
    default_script: Vec<String>,
    functions: Vec<RegistryItem>,
    agents: Vec<RegistryItem>,
    models: Vec<RegistryItem>,
}

impl MemoryJobService {
    /// Create an empty service; jobs stay `queued` until scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status progression applied to every job submitted afterwards.
    #[must_use]
    pub fn with_script(mut self, statuses: &[&str]) -> Self {
        self.default_script = statuses.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Reject submissions after `limit` have been accepted.
    #[must_use]
    pub const fn with_submit_limit(mut self, limit: usize) -> Self {
        self.submit_limit = Some(limit);
        self
    }

    /// Functions returned by `list_functions`.
    #[must_use]
    pub fn with_functions(mut self, items: Vec<RegistryItem>) -> Self {
        self.functions = items;
        self
    }

    /// Agents returned by `list_agents`.
    #[must_use]
    pub fn with_agents(mut self, items: Vec<RegistryItem>) -> Self {
        self.agents = items;
        self
    }

    /// Models returned by `list_models`.
    #[must_use]
    pub fn with_models(mut self, items: Vec<RegistryItem>) -> Self {
        self.models = items;
        self
    }

    /// Number of jobs held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Check if no job was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Force a job's status; clears any remaining script. Unknown ids are ignored.
    pub fn set_status(&self, job_id: &str, status: &str) {
        if let Some(mut job) = self.jobs.get_mut(job_id) {
            job.current = status.to_string();
            job.script.clear();
        }
    }

    /// Replace a job's remaining status script.
    pub fn script_job(&self, job_id: &str, statuses: &[&str]) {
        if let Some(mut job) = self.jobs.get_mut(job_id) {
            job.script = statuses.iter().map(|s| (*s).to_string()).collect();
        }
    }

    /// Make every status query for `job_id` fail.
    pub fn fail_queries(&self, job_id: &str) {
        if let Some(mut job) = self.jobs.get_mut(job_id) {
            job.fail_queries = true;
        }
    }

    /// How many times a job's status was queried.
    #[must_use]
    pub fn query_count(&self, job_id: &str) -> usize {
        self.jobs.get(job_id).map_or(0, |job| job.queries)
    }

    /// Submitted requests in submission order.
    #[must_use]
    pub fn submissions(&self) -> Vec<JobRequest> {
        let mut entries: Vec<(String, JobRequest)> = self
            .jobs
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().request.clone()))
            .collect();
        // ids are zero-padded, so lexical order is submission order
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, request)| request).collect()
    }
}

fn first_page(items: &[RegistryItem], size: usize) -> Vec<RegistryItem> {
    items.iter().take(size).cloned().collect()
}

impl JobService for MemoryJobService {
    fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        let accepted = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.submit_limit.is_some_and(|limit| accepted >= limit) {
            return Err(Error::Registry(format!(
                "submission rejected: limit of {accepted} jobs reached"
            )));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("job-{n:06}");
        self.jobs.insert(
            id.clone(),
            MemoryJob {
                request: request.clone(),
                current: INITIAL_STATUS.to_string(),
                script: self.default_script.iter().cloned().collect(),
                queries: 0,
                fail_queries: false,
            },
        );
        Ok(JobHandle::new(id, INITIAL_STATUS))
    }

    fn get_job(&self, job_id: &str) -> Result<JobHandle> {
        let mut job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::Registry(format!("job not found: {job_id}")))?;
        job.queries += 1;
        if job.fail_queries {
            return Err(Error::Registry(format!("status query failed for job {job_id}")));
        }
        if let Some(next) = job.script.pop_front() {
            job.current = next;
        }
        Ok(JobHandle::new(job_id, &job.current))
    }

    fn list_functions(&self, size: usize) -> Result<Vec<RegistryItem>> {
        Ok(first_page(&self.functions, size))
    }

    fn list_agents(&self, size: usize) -> Result<Vec<RegistryItem>> {
        Ok(first_page(&self.agents, size))
    }

    fn list_models(&self, size: usize) -> Result<Vec<RegistryItem>> {
        Ok(first_page(&self.models, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> JobRequest {
        JobRequest::new("model-1", "fn", json!({"case_id": "case_00001"}))
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let service = MemoryJobService::new();
        let a = service.submit(&request()).unwrap();
        let b = service.submit(&request()).unwrap();

        assert_eq!(a.id, "job-000001");
        assert_eq!(b.id, "job-000002");
        assert_eq!(a.status_token(), "queued");
        assert_eq!(service.len(), 2);
        assert_eq!(service.submissions().len(), 2);
    }

    #[test]
    fn test_script_advances_then_sticks() {
        let service = MemoryJobService::new().with_script(&["running", "FAILED"]);
        let job = service.submit(&request()).unwrap();

        assert_eq!(service.get_status(&job.id).unwrap(), "running");
        assert_eq!(service.get_status(&job.id).unwrap(), "failed");
        assert_eq!(service.get_status(&job.id).unwrap(), "failed");
        assert_eq!(service.query_count(&job.id), 3);
    }

    #[test]
    fn test_unknown_job_errors() {
        let service = MemoryJobService::new();
        assert!(matches!(service.get_job("missing"), Err(Error::Registry(_))));
    }

    #[test]
    fn test_submit_limit() {
        let service = MemoryJobService::new().with_submit_limit(1);
        assert!(service.submit(&request()).is_ok());
        assert!(service.submit(&request()).is_err());
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_fail_queries() {
        let service = MemoryJobService::new();
        let job = service.submit(&request()).unwrap();
        service.fail_queries(&job.id);
        assert!(service.get_job(&job.id).is_err());
        assert_eq!(service.query_count(&job.id), 1);
    }

    #[test]
    fn test_listing_pages() {
        let items: Vec<RegistryItem> = (0..5)
            .map(|i| RegistryItem { id: Some(format!("m{i}")), ..RegistryItem::default() })
            .collect();
        let service = MemoryJobService::new().with_models(items);

        assert_eq!(service.list_models(3).unwrap().len(), 3);
        assert!(service.list_agents(10).unwrap().is_empty());
    }
}
