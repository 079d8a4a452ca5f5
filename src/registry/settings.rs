//! Registry connection settings from the environment

use crate::{Error, Result};

/// Environment variable holding the registry base URL.
pub const ENV_REGISTRY_URL: &str = "ISTARI_DIGITAL_REGISTRY_URL";

/// Environment variable holding the personal access token.
pub const ENV_AUTH_TOKEN: &str = "ISTARI_DIGITAL_REGISTRY_AUTH_TOKEN";

/// Registry URL and credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Base URL, without trailing slash.
    pub registry_url: String,
    /// Bearer token.
    pub auth_token: String,
}

impl std::fmt::Debug for RegistrySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySettings")
            .field("registry_url", &self.registry_url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

impl RegistrySettings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `MissingConfiguration` naming the first absent or blank variable
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup.
    ///
    /// # Errors
    /// Returns `MissingConfiguration` naming the first absent or blank variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::MissingConfiguration(format!("Missing required env var: {name}")))
        };

        Ok(Self {
            registry_url: require(ENV_REGISTRY_URL)?.trim_end_matches('/').to_string(),
            auth_token: require(ENV_AUTH_TOKEN)?,
        })
    }
}
