//! Errors produced by the HTTP layer

use thiserror::Error;

/// Error returned by [`ApiClient`](super::ApiClient) calls.
///
/// Cloneable so a single refresh outcome can be handed to every request
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection refused, TLS...)
    #[error("could not reach the node: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 404 from the node, left for the view layer to handle
    #[error("not found: {message}")]
    NotFound { message: String },

    /// 401 propagated as-is (e.g. bad credentials on the login page)
    #[error("{message}")]
    Unauthorized { message: String },

    /// 401 while holding a still-valid access token
    #[error("insufficient privileges")]
    InsufficientPrivileges,

    /// The session could not be recovered; the user was sent back to login
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// Any other non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("unexpected response from node: {0}")]
    InvalidBody(String),

    /// The token refresh triggered by a 401 failed; the user was alerted
    #[error("token refresh failed: {0}")]
    RefreshFailed(Box<ApiError>),
}

impl ApiError {
    /// Message suitable for an alert dialog
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound { message }
            | ApiError::Unauthorized { message }
            | ApiError::SessionExpired { message }
            | ApiError::Status { message, .. } => message.clone(),
            ApiError::RefreshFailed(source) => source.user_message(),
            other => other.to_string(),
        }
    }

    /// The client already told the user (alert or redirect)
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            ApiError::InsufficientPrivileges
                | ApiError::SessionExpired { .. }
                | ApiError::RefreshFailed(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unauthorized { .. }
            | ApiError::InsufficientPrivileges
            | ApiError::SessionExpired { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RefreshFailed(source) => source.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::InvalidBody(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err.to_string())
    }
}
