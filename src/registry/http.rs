//! Blocking HTTP client for the registry job service

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{JobHandle, JobRequest, JobService, Page, RegistryItem, RegistrySettings};
use crate::{Error, Result};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("surrogate-pipeline/", env!("CARGO_PKG_VERSION"));

/// Connection establishment limit. Requests themselves are not time-limited.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry client over the service's REST surface.
///
/// Routes used: `POST /jobs`, `GET /jobs/{id}`, and `GET /functions`,
/// `/agents`, `/models` with a `size` query parameter.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    settings: RegistrySettings,
}

impl RegistryClient {
    /// Build a client for the given settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed (TLS backend init)
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, settings })
    }

    /// Build a client from the process environment.
    ///
    /// # Errors
    /// Returns `MissingConfiguration` if the URL or token variable is absent
    pub fn from_env() -> Result<Self> {
        Self::new(RegistrySettings::from_env()?)
    }

    /// Registry base URL.
    #[must_use]
    pub fn registry_url(&self) -> &str {
        &self.settings.registry_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.registry_url, path.trim_start_matches('/'))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.bearer_auth(&self.settings.auth_token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Registry(format!("{what} failed with HTTP {status}: {body}")));
        }
        response
            .json::<T>()
            .map_err(|e| Error::Registry(format!("{what}: unreadable response: {e}")))
    }

    fn list(&self, path: &str, size: usize) -> Result<Vec<RegistryItem>> {
        let request = self.http.get(self.url(path)).query(&[("size", size)]);
        let page: Page<RegistryItem> = self.send(request, &format!("list {path}"))?;
        Ok(page.into_items())
    }
}

impl JobService for RegistryClient {
    fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        debug!(model_id = %request.model_id, function = %request.function, "submitting job");
        self.send(self.http.post(self.url("jobs")).json(request), "submit job")
    }

    fn get_job(&self, job_id: &str) -> Result<JobHandle> {
        self.send(
            self.http.get(self.url(&format!("jobs/{job_id}"))),
            &format!("get job {job_id}"),
        )
    }

    fn list_functions(&self, size: usize) -> Result<Vec<RegistryItem>> {
        self.list("functions", size)
    }

    fn list_agents(&self, size: usize) -> Result<Vec<RegistryItem>> {
        self.list("agents", size)
    }

    fn list_models(&self, size: usize) -> Result<Vec<RegistryItem>> {
        self.list("models", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = RegistryClient::new(RegistrySettings {
            registry_url: "https://registry.example".to_string(),
            auth_token: "t".to_string(),
        })
        .unwrap();

        assert_eq!(client.url("/jobs/abc"), "https://registry.example/jobs/abc");
        assert_eq!(client.url("models"), "https://registry.example/models");
    }
}
