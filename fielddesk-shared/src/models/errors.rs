use serde::{Deserialize, Serialize};

/// Error body returned by the backend on failed requests.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message.
    pub message: String,
    /// Optional additional details about the error.
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new error response with message and details.
    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// Minimal success envelope returned by the mutation endpoints. The console
/// never renders a server echo from it; the next refresh is authoritative.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}
