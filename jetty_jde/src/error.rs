//! Error types for the JD Edwards connector.

use thiserror::Error;

/// Result type alias using `JdeError`.
pub type JdeResult<T> = Result<T, JdeError>;

/// Errors that can occur when talking to an AIS server.
#[derive(Debug, Error)]
pub enum JdeError {
    /// Credentials or connector configuration are unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never completed or came back with an error status.
    #[error("unable to reach the AIS server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body wasn't the JSON we expected.
    #[error("unable to decode AIS response: {0}")]
    Decode(String),

    /// Login succeeded at the HTTP level but no token was issued.
    #[error("token not obtained, check if provided credentials and environment are correct")]
    AuthFailure,

    /// The server doesn't expose the capabilities the connector needs.
    #[error("capabilities missing, make sure dataservice and tokenrequest capabilities are configured on the AIS server")]
    CapabilityMissing,

    /// The server broke the pagination contract.
    #[error("AIS protocol violation: {0}")]
    ProtocolViolation(String),

    /// The session token was rejected.
    #[error("token validation failed: {0}")]
    ValidationFailure(String),
}

impl JdeError {
    /// Whether the orchestration layer may reasonably retry the call.
    /// Configuration problems (bad credentials, missing capabilities) are
    /// never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JdeError::Transport(_) | JdeError::Decode(_))
    }

    pub(crate) fn decode(context: &str, err: impl std::fmt::Display) -> Self {
        JdeError::Decode(format!("{context}: {err}"))
    }
}

impl From<serde_json::Error> for JdeError {
    fn from(err: serde_json::Error) -> Self {
        JdeError::Decode(err.to_string())
    }
}
