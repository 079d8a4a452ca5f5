//! Job service seam
//!
//! The registry service that runs simulations and training jobs is an
//! external collaborator. This module fixes the contract the pipeline relies
//! on and adapts the service's response shapes to canonical types:
//!
//! - [`JobService`]: submit / get status / paginated listings
//! - [`JobHandle`]: the one place job response shapes are accommodated
//! - [`Page`]: bare-array, `items` and `content` pagination envelopes
//!
//! Two implementations ship with the crate: [`MemoryJobService`] (scriptable,
//! in-process) and [`RegistryClient`] (blocking HTTP).
//!
//! # Example
//!
//! ```rust
//! use surrogate_pipeline::registry::{JobRequest, JobService, MemoryJobService};
//!
//! # fn example() -> surrogate_pipeline::Result<()> {
//! let service = MemoryJobService::new();
//! let job = service.submit(&JobRequest::new("model-1", "@istari:run_pyintact_simulation", serde_json::json!({})))?;
//! service.set_status(&job.id, "completed");
//! assert_eq!(service.get_job(&job.id)?.status_token(), "completed");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod http;
mod memory;
mod settings;

pub use http::RegistryClient;
pub use memory::MemoryJobService;
pub use settings::{RegistrySettings, ENV_AUTH_TOKEN, ENV_REGISTRY_URL};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::status::normalize_status;
use crate::Result;

/// Function key of the simulation runner.
pub const SIMULATION_FUNCTION_KEY: &str = "@istari:run_pyintact_simulation";

/// Function key of the surrogate trainer.
pub const TRAINING_FUNCTION_KEY: &str = "@istari:train_nemo_surrogate";

/// A job submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Registry model the job is attached to.
    pub model_id: String,
    /// Function identifier, e.g. [`SIMULATION_FUNCTION_KEY`].
    pub function: String,
    /// Function parameters.
    pub parameters: Value,
    /// Agent to run the job on; the service picks one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
}

impl JobRequest {
    /// Create a request without an agent assignment.
    #[must_use]
    pub fn new(model_id: impl Into<String>, function: impl Into<String>, parameters: Value) -> Self {
        Self {
            model_id: model_id.into(),
            function: function.into(),
            parameters,
            assigned_agent_id: None,
        }
    }

    /// Pin the job to an agent.
    #[must_use]
    pub fn assigned_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.assigned_agent_id = Some(agent_id.into());
        self
    }
}

/// Text of a status value as the service may encode it: plain text, a
/// number, an enum-like `{ "value": .. }` wrapper or a `{ "name": .. }`
/// object, nested to any depth.
///
/// Anything else (null, booleans, arrays, wrappers around those) has no
/// text, so the next status source applies.
#[must_use]
pub fn status_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj
            .get("value")
            .and_then(status_text)
            .or_else(|| obj.get("name").and_then(status_text)),
        _ => None,
    }
}

/// Job ids arrive as strings or numbers; anything else reads as empty.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Job handle as returned by submit and status queries.
///
/// Deserialization accepts any JSON object; unrecognized status shapes end
/// up as `"unknown"` in [`JobHandle::status_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Job id assigned by the service.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Structured status name; preferred when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_name: Option<Value>,
    /// Raw status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

impl JobHandle {
    /// Create a handle with a raw status.
    #[must_use]
    pub fn new(id: impl Into<String>, status: &str) -> Self {
        Self {
            id: id.into(),
            status_name: None,
            status: Some(Value::from(status)),
        }
    }

    /// Canonical lower-case status token (see [`crate::status`]).
    #[must_use]
    pub fn status_token(&self) -> String {
        let name = self.status_name.as_ref().and_then(status_text);
        let raw = self.status.as_ref().and_then(status_text);
        normalize_status(name.as_deref(), raw.as_deref())
    }
}

/// An entry of a function, agent or model listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryItem {
    /// Registry id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Alternative function key field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-facing name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

fn first_present<'a>(candidates: &[Option<&'a String>]) -> &'a str {
    candidates
        .iter()
        .flatten()
        .copied()
        .map(String::as_str)
        .find(|s| !s.trim().is_empty())
        .unwrap_or("<unknown>")
}

impl RegistryItem {
    /// Identifier for listings: id, key, function, then name.
    #[must_use]
    pub fn label(&self) -> &str {
        first_present(&[
            self.id.as_ref(),
            self.key.as_ref(),
            self.function.as_ref(),
            self.name.as_ref(),
        ])
    }

    /// Human-facing name: display name, then name.
    #[must_use]
    pub fn display(&self) -> &str {
        first_present(&[self.display_name.as_ref(), self.name.as_ref()])
    }
}

/// Pagination envelope. Listing endpoints answer with any of these shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    /// Bare array.
    List(Vec<T>),
    /// `{ "items": [...] }`
    Items {
        /// Entries.
        items: Vec<T>,
    },
    /// `{ "content": [...] }`
    Content {
        /// Entries.
        content: Vec<T>,
    },
}

impl<T> Page<T> {
    /// Flatten to the entries.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::List(items) | Self::Items { items } | Self::Content { content: items } => items,
        }
    }
}

/// Contract of the external job service.
///
/// Calls are blocking; the pipeline is single-threaded and waits on each
/// response. Implementations report transport failures as
/// [`crate::Error::Registry`].
pub trait JobService {
    /// Submit a job and return its handle.
    ///
    /// # Errors
    /// Returns error if the service rejects or cannot receive the submission
    fn submit(&self, request: &JobRequest) -> Result<JobHandle>;

    /// Fetch the current state of a job.
    ///
    /// # Errors
    /// Returns error if the job cannot be queried
    fn get_job(&self, job_id: &str) -> Result<JobHandle>;

    /// First page of registered functions.
    ///
    /// # Errors
    /// Returns error if the listing fails
    fn list_functions(&self, size: usize) -> Result<Vec<RegistryItem>>;

    /// First page of agents.
    ///
    /// # Errors
    /// Returns error if the listing fails
    fn list_agents(&self, size: usize) -> Result<Vec<RegistryItem>>;

    /// First page of models.
    ///
    /// # Errors
    /// Returns error if the listing fails
    fn list_models(&self, size: usize) -> Result<Vec<RegistryItem>>;

    /// Current canonical status token of a job.
    ///
    /// # Errors
    /// Returns error if the job cannot be queried
    fn get_status(&self, job_id: &str) -> Result<String> {
        Ok(self.get_job(job_id)?.status_token())
    }
}
