use std::time::Duration;

use crate::error::ClientError;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local dashboard backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the dashboard API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if set.
    pub api_token: Option<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                        |
    /// |-------------------------------|--------------------------------|
    /// | `NETMON_API_URL`              | `http://localhost:8000/api/v1` |
    /// | `NETMON_API_TOKEN`            | unset                          |
    /// | `NETMON_REQUEST_TIMEOUT_SECS` | `30`                           |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_url = lookup("NETMON_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.into())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "NETMON_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        let api_token = lookup("NETMON_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let request_timeout_secs = match lookup("NETMON_REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
            Some(v) => v.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "NETMON_REQUEST_TIMEOUT_SECS must be a valid u64, got '{v}'"
                ))
            })?,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
