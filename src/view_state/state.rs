//! Observable screen state.

/// Outcome of the most recent write intent, shown once and then consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Success(String),
    Failure(String),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            OperationResult::Success(message) | OperationResult::Failure(message) => message,
        }
    }
}

/// What a screen renders for one resource family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState<T> {
    pub data: T,
    /// Any lane has a call in flight
    pub is_loading: bool,
    /// Message of the last failed intent
    pub error: Option<String>,
    pub operation_result: Option<OperationResult>,
    /// `data` came from the cache after a network failure
    pub is_stale: bool,
}

impl<T> ViewState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
            operation_result: None,
            is_stale: false,
        }
    }
}
