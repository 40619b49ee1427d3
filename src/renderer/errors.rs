//! Error types for rendering operations

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Failures that abort a render
///
/// Per-cell problems (unparsable numbers, rejected merges, style failures)
/// are logged and skipped instead; only whole-document failures surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Unknown render format name
    #[error("Unknown render type: {0}")]
    UnknownFormat(String),

    /// CSV serialization failed
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX workbook could not be built or serialized
    #[error("XLSX write failed: {0}")]
    Xlsx(#[from] XlsxError),

    /// IO error while flushing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
