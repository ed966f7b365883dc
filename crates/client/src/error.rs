use netmon_core::error::CoreError;
use netmon_core::rule_validation::ValidationReport;

/// Errors surfaced by the rule editor and its remote collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A domain-level error from `netmon_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The draft failed local validation; nothing was sent.
    #[error("Rule is not ready to submit: {}", failure_summary(.0))]
    Invalid(ValidationReport),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status. `body` is kept verbatim so
    /// server-side validation messages reach the operator unchanged.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the failure happened on the way to or at the server, as
    /// opposed to being caught locally.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { .. })
    }
}

fn failure_summary(report: &ValidationReport) -> String {
    report
        .failures
        .iter()
        .map(|f| f.message())
        .collect::<Vec<_>>()
        .join("; ")
}
