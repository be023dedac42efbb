//! List coordination error types.
//!
//! All list operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use thiserror::Error;

use crate::request::RequestId;

/// Error raised while loading, interpreting or configuring a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// Transport or connectivity failure reported by the page fetcher.
    #[error("Network request failed: {message}")]
    Network { message: String },

    /// Response did not match either known pagination shape.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A superseded request resolved and its result was dropped.
    ///
    /// Never shown to users; it only signals that nothing happened.
    #[error("Discarded stale result for request {request_id}")]
    StaleResultDiscarded { request_id: RequestId },

    /// Configuration value out of range.
    #[error("Invalid list configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Filter key not declared by the list's schema.
    #[error("Unknown filter: {key}")]
    UnknownFilter { key: String },

    /// Value that cannot be held by its filter, e.g. letters in a number.
    #[error("Invalid value for filter {key}: {value:?}")]
    InvalidFilterValue { key: String, value: String },
}

impl ListError {
    /// Shorthand for a malformed-response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Whether this error should ever reach the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::StaleResultDiscarded { .. })
    }

    /// Classify the error for display purposes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::StaleResultDiscarded { .. } => ErrorKind::Stale,
            Self::InvalidConfig { .. }
            | Self::UnknownFilter { .. }
            | Self::InvalidFilterValue { .. } => ErrorKind::Usage,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Could not reach the server. Check your connection.".to_string()
            }
            Self::MalformedResponse { .. } => {
                "The server sent a response we could not understand.".to_string()
            }
            Self::StaleResultDiscarded { .. } => String::new(),
            Self::InvalidConfig { field, reason } => {
                format!("The list setting '{field}' {reason}.")
            }
            Self::UnknownFilter { key } => {
                format!("'{key}' is not a filter on this list.")
            }
            Self::InvalidFilterValue { key, value } => {
                format!("'{value}' is not a valid value for '{key}'.")
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Network { .. } => Some("Press retry once the connection is back.".into()),
            Self::MalformedResponse { .. } => {
                Some("Press retry. If the problem persists the service may be updating.".into())
            }
            Self::StaleResultDiscarded { .. } => None,
            Self::InvalidConfig { .. } => Some("Fix the list profile and reload.".into()),
            Self::UnknownFilter { .. } => None,
            Self::InvalidFilterValue { .. } => Some("Enter a whole number.".into()),
        }
    }
}

/// Coarse error category shown alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    MalformedResponse,
    Stale,
    Usage,
}

/// Failure reported by a host page fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a usable body.
    #[error("network error: {0}")]
    Network(String),

    /// A body arrived but could not be decoded at all.
    #[error("malformed body: {0}")]
    Malformed(String),
}

impl From<FetchError> for ListError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Network(message) => Self::Network { message },
            FetchError::Malformed(reason) => Self::MalformedResponse { reason },
        }
    }
}

/// Result type alias for list operations.
pub type Result<T> = std::result::Result<T, ListError>;
