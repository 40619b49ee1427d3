pub mod api;
pub mod config;
pub mod html;
pub mod models;
pub mod parser;
pub mod renderer;
pub mod table_model;

pub use api::{ApiError, router};
pub use config::ServiceConfig;
pub use models::{
    Alignment, CellFormat, ColumnFormat, ModelError, ParseAlignments, ParseRequest, RenderRequest,
    RowFormat,
};
pub use parser::{ParseError, ParseResponse, parse_html, parse_table};
pub use renderer::{
    RenderError, RenderFormat, render_csv, render_html, render_html_string, render_xlsx,
};
pub use table_model::{EffectiveCellStyle, TableModel};

/// Render a request in the named format (`html`, `xlsx` or `csv`)
///
/// # Errors
///
/// Returns `RenderError::UnknownFormat` for any other name, or the
/// renderer's error if the document cannot be produced.
pub fn render(format: &str, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
    format.parse::<RenderFormat>()?.render(request)
}
