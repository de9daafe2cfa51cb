//! Typed failures for a single analysis run.
//!
//! Validation and model-load problems fail fast before any network
//! traffic; fetch problems abort the run. Per-link classification
//! failures never appear here — they degrade to sentinel categories
//! inside the report (see [`crate::classify`]).

use thiserror::Error;

/// Error surfaced to the host for a failed analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input is neither a valid IP literal nor a resolvable domain.
    #[error("invalid target {0:?}: not a valid IP address or resolvable domain")]
    InvalidTarget(String),

    /// One or more classifier artifacts failed to load.
    ///
    /// Raised before any network call is made, so a broken model
    /// install never costs an outbound request.
    #[error("classifier unavailable: missing artifacts [{0}]")]
    ModelUnavailable(String),

    /// Connection, TLS, or timeout failure while fetching the page.
    #[error("network error fetching {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page responded with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },
}

impl AnalysisError {
    /// Stable machine-readable code for JSON error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidTarget(_) => "invalid_target",
            AnalysisError::ModelUnavailable(_) => "model_unavailable",
            AnalysisError::Network { .. } => "network_error",
            AnalysisError::Http { .. } => "http_error",
        }
    }
}
