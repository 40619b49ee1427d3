//! Error types for request decoding and validation

use thiserror::Error;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while turning a request body into a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// The body stream could not be read
    #[error("Failed to read message body: {0}")]
    ReadingBody(#[source] std::io::Error),

    /// The body was not valid JSON for the expected model
    #[error("Failed to parse json body: {0}")]
    ParsingBody(#[source] serde_json::Error),

    /// The body was an empty JSON object
    #[error("Bad request - Missing data in body")]
    NoData,

    /// Required fields were absent or empty
    #[error("Missing mandatory fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl ModelError {
    /// Fixed, client-safe message for this error kind
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            ModelError::ReadingBody(_) => "Failed to read message body".to_string(),
            ModelError::ParsingBody(_) => "Bad request - Invalid request body".to_string(),
            ModelError::NoData => "Bad request - Missing data in body".to_string(),
            ModelError::MissingFields(fields) => {
                format!("Bad request - Missing mandatory fields: {}", fields.join(", "))
            }
        }
    }
}
