//! Table renderers
//!
//! Each renderer turns a [`RenderRequest`] into a complete document in one
//! output format. All three share the [`TableModel`](crate::table_model::TableModel)
//! so merges, headings and alignment resolve identically everywhere.

pub mod csv_renderer;
pub mod errors;
pub mod html_renderer;
pub mod markup;
pub mod xlsx_renderer;

use std::fmt;
use std::str::FromStr;

pub use csv_renderer::render_csv;
pub use errors::{RenderError, RenderResult};
pub use html_renderer::{render_html, render_html_string};
pub use xlsx_renderer::{cell_reference, column_name, render_xlsx};

use crate::models::RenderRequest;

/// Label written before the units value
pub(crate) const UNITS_LABEL: &str = "Units: ";
/// Label written before the source value
pub(crate) const SOURCE_LABEL: &str = "Source: ";
/// Heading written above the footnote list
pub(crate) const NOTES_LABEL: &str = "Notes";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    Html,
    Xlsx,
    Csv,
}

impl RenderFormat {
    /// Path segment naming this format
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Xlsx => "xlsx",
            RenderFormat::Csv => "csv",
        }
    }

    /// MIME type of the rendered document
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            RenderFormat::Html => "text/html",
            RenderFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            RenderFormat::Csv => "text/csv",
        }
    }

    /// Render a request in this format
    ///
    /// # Errors
    ///
    /// Returns the renderer's error when the document cannot be produced.
    pub fn render(self, request: &RenderRequest) -> RenderResult<Vec<u8>> {
        match self {
            RenderFormat::Html => render_html(request),
            RenderFormat::Xlsx => render_xlsx(request),
            RenderFormat::Csv => render_csv(request),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(RenderFormat::Html),
            "xlsx" => Ok(RenderFormat::Xlsx),
            "csv" => Ok(RenderFormat::Csv),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
