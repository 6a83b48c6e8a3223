//! Tagged result returned by every repository operation.

use super::client_error::ClientError;

/// Outcome of a repository call.
///
/// Repositories never return `Err`: every transport, HTTP, decoding, or
/// storage failure is folded into [`RepoResult::Error`].
#[derive(Debug, Clone, PartialEq)]
pub enum RepoResult<T> {
    Success(T),
    Error {
        message: String,
        /// HTTP status when the server answered.
        code: Option<u16>,
    },
}

impl<T> RepoResult<T> {
    /// Build an error result with no status code.
    pub fn error(message: impl Into<String>) -> Self {
        RepoResult::Error {
            message: message.into(),
            code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RepoResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// The success value, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            RepoResult::Success(data) => Some(data),
            RepoResult::Error { .. } => None,
        }
    }

    /// The error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RepoResult::Success(_) => None,
            RepoResult::Error { message, .. } => Some(message),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RepoResult<U> {
        match self {
            RepoResult::Success(data) => RepoResult::Success(f(data)),
            RepoResult::Error { message, code } => RepoResult::Error { message, code },
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            RepoResult::Success(data) => Ok(data),
            RepoResult::Error { message, .. } => Err(message),
        }
    }
}

impl<T> From<ClientError> for RepoResult<T> {
    fn from(err: ClientError) -> Self {
        RepoResult::Error {
            code: err.status(),
            message: err.to_string(),
        }
    }
}

impl<T> From<Result<T, ClientError>> for RepoResult<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => RepoResult::Success(data),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_client_error_keeps_status() {
        let result: RepoResult<()> = ClientError::from_status(403, "").into();
        assert_eq!(
            result,
            RepoResult::Error {
                message: "HTTP 403: Forbidden".to_string(),
                code: Some(403)
            }
        );
    }

    #[test]
    fn test_map_and_accessors() {
        let result = RepoResult::Success(2).map(|v| v * 2);
        assert_eq!(result.data(), Some(&4));
        assert!(result.error_message().is_none());

        let failed: RepoResult<i32> = RepoResult::error("Unauthenticated");
        assert!(failed.is_error());
        assert_eq!(failed.error_message(), Some("Unauthenticated"));
        assert_eq!(failed.into_result(), Err("Unauthenticated".to_string()));
    }
}
