//! Coarse classification of client failures.
//!
//! Categories decide whether a failure is worth retrying and tag the
//! repository logs, so a cache fallback after a network outage reads
//! differently from one after a malformed response.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No connection, DNS failure, or timeout.
    Network,
    /// Missing or rejected credentials (no token, 401, 403).
    Auth,
    /// 5xx from the server.
    Server,
    /// The body did not match the expected schema.
    Client,
    /// The server refused the input (4xx, or `"success": false`).
    User,
    /// The local store could not be read or written.
    Storage,
}

impl ErrorCategory {
    /// Transient categories; the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
