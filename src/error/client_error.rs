//! Failure kinds of the school API client.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::{HttpError, StoreError};

/// Everything that can go wrong between a repository and the server.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// An authenticated endpoint was called without a session token.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// No connectivity, timeout, or IO failure.
    #[error("Network error: {0}")]
    Transport(#[from] HttpError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The server reported a business error inside a 2xx body.
    #[error("{0}")]
    Domain(String),

    /// Local key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// Build an HTTP error from a status and the raw response body.
    ///
    /// JSON bodies carrying `message` or `error` use that text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .or_else(|| value.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    default_reason(status).to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            });
        ClientError::Http { status, message }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Unauthenticated => ErrorCategory::Auth,
            ClientError::Transport(_) => ErrorCategory::Network,
            ClientError::Http { status, .. } => match *status {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::User,
            },
            ClientError::Decode(_) => ErrorCategory::Client,
            ClientError::Domain(_) => ErrorCategory::User,
            ClientError::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            other => other.category().is_retryable(),
        }
    }

    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the stored credentials should be discarded.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated | ClientError::Http { status: 401, .. }
        )
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthenticated => "E_AUTH_MISSING",
            ClientError::Transport(HttpError::Timeout(_)) => "E_NET_TIMEOUT",
            ClientError::Transport(_) => "E_NET_CONN",
            ClientError::Http { .. } => "E_NET_HTTP",
            ClientError::Decode(_) => "E_DECODE",
            ClientError::Domain(_) => "E_DOMAIN",
            ClientError::Storage(_) => "E_STORAGE",
        }
    }
}

fn default_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        429 => "Too many requests",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result alias for API client calls.
pub type ClientResult<T> = Result<T, ClientError>;
