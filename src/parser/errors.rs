//! Error types for HTML table parsing

use thiserror::Error;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The fragment did not contain exactly one top-level node
    #[error("table_html could not be parsed into a single element (found {count} top-level nodes)")]
    NotSingleElement { count: usize },

    /// The single top-level node was not a `<table>`
    #[error("table_html could not be parsed into a table element (found {tag})")]
    NotTable { tag: String },

    /// Cells and their spans cover more logical positions than allowed
    #[error("table_html spans more than {limit} logical cells")]
    TooLarge { limit: usize },

    /// The response could not be encoded
    #[error("Failed to serialize parse response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ParseError {
    /// Whether the caller supplied unusable input
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ParseError::NotSingleElement { .. }
                | ParseError::NotTable { .. }
                | ParseError::TooLarge { .. }
        )
    }
}
