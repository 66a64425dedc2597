//! Error types for the session lifecycle and backend calls.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures of login, registration and other session mutations. None of
/// them changes the current session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Auth service error: {0}")]
    Unavailable(String),

    #[error("Malformed response from auth service: {0}")]
    MalformedResponse(String),

    /// A newer login, registration or logout happened while this one was in
    /// flight; its result was discarded.
    #[error("Superseded by a newer session change")]
    Superseded,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures surfaced by [`crate::services::gateway::ApiGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No response arrived (connect failure, reset, transport timeout).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend rejected the bearer token. The session has already been
    /// torn down by the time the caller sees this.
    #[error("Authorization failed")]
    AuthorizationFailed,

    /// 400/422 carrying a structured JSON payload.
    #[error("Validation error ({status})")]
    Validation { status: StatusCode, payload: Value },

    #[error("Server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A path parameter that cannot name a single resource; nothing was sent.
    #[error("Invalid path segment: {0:?}")]
    InvalidPath(String),
}

impl GatewayError {
    /// First human-readable message in a validation payload, if any.
    pub fn validation_message(&self) -> Option<String> {
        match self {
            GatewayError::Validation { payload, .. } => payload
                .get("message")
                .or_else(|| payload.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }
}
