//! HTML table parser
//!
//! Reads an HTML `<table>` (typically produced by a spreadsheet-like editor)
//! back into a [`RenderRequest`]:
//!
//! - cell text is laid out on the logical grid, honouring spans;
//! - alignment classes shared by every cell of a row or column are promoted
//!   to a row/column format, and only deviations become cell formats;
//! - `<col>` widths and `<tr>` heights are converted to the requested unit.
//!
//! The reconstructed request is rendered with the HTML renderer to provide a
//! preview alongside the JSON.

pub mod errors;
pub mod grid;
pub mod sizes;

pub use errors::{ParseError, ParseResult};
pub use grid::TableGrid;
pub use sizes::SizeContext;

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Alignment, CellFormat, ColumnFormat, ParseRequest, RenderRequest, RowFormat};
use crate::renderer::render_html_string;

/// Table type tag stamped on reconstructed requests
pub const TABLE_TYPE: &str = "table";
/// Table version tag stamped on reconstructed requests
pub const TABLE_VERSION: &str = "2";

/// Response body of the parse endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    /// The reconstructed render request
    pub json: RenderRequest,
    /// The request rendered as HTML
    pub preview_html: String,
}

/// Parse a request and encode the response as JSON
///
/// # Errors
///
/// Returns `ParseError::NotSingleElement`/`NotTable` when `table_html` is not
/// a single `<table>`, `ParseError::TooLarge` when its spans cover too many
/// cells, or `ParseError::Serialization` if encoding fails.
pub fn parse_html(request: &ParseRequest) -> ParseResult<Vec<u8>> {
    let response = parse_table(request)?;
    let mut body = serde_json::to_vec(&response)?;
    body.push(b'\n');
    Ok(body)
}

/// Parse a request into its reconstructed table and preview
///
/// # Errors
///
/// Returns `ParseError::NotSingleElement`/`NotTable` when `table_html` is not
/// a single `<table>`, or `ParseError::TooLarge` when its spans cover too
/// many cells.
pub fn parse_table(request: &ParseRequest) -> ParseResult<ParseResponse> {
    let json = reconstruct(request)?;
    let preview_html = render_html_string(&json);
    Ok(ParseResponse { json, preview_html })
}

fn reconstruct(request: &ParseRequest) -> ParseResult<RenderRequest> {
    let fragment = Html::parse_fragment(&request.table_html);
    let table = single_table(&fragment)?;

    let mut grid = TableGrid::from_table(table)?;
    if request.ignore_first_row {
        grid.drop_first_row();
    }
    if request.ignore_first_column {
        grid.drop_first_column();
    }

    let sizes = SizeContext::from_request(request);
    let header_rows = usize::try_from(request.header_rows).unwrap_or(0);
    let header_cols = usize::try_from(request.header_cols).unwrap_or(0);

    let row_alignments: Vec<Option<Alignment>> = grid
        .row_class_tallies()
        .iter()
        .map(|tally| uniform_alignment(request, tally, Alignment::is_vertical))
        .collect();
    let column_alignments: Vec<Option<Alignment>> = grid
        .column_class_tallies()
        .iter()
        .map(|tally| uniform_alignment(request, tally, Alignment::is_horizontal))
        .collect();

    let row_formats: Vec<RowFormat> = row_alignments
        .iter()
        .enumerate()
        .filter_map(|(index, vertical_align)| {
            let format = RowFormat {
                row: i32::try_from(index).ok()?,
                vertical_align: *vertical_align,
                heading: index < header_rows,
                height: grid
                    .row_styles
                    .get(index)
                    .map(|style| sizes.height(style))
                    .unwrap_or_default(),
            };
            (format != RowFormat { row: format.row, ..RowFormat::default() }).then_some(format)
        })
        .collect();

    let column_formats: Vec<ColumnFormat> = column_alignments
        .iter()
        .enumerate()
        .filter_map(|(index, align)| {
            let format = ColumnFormat {
                column: i32::try_from(index).ok()?,
                align: *align,
                heading: index < header_cols,
                width: grid
                    .column_styles
                    .get(index)
                    .map(|style| sizes.width(style))
                    .unwrap_or_default(),
            };
            (format != ColumnFormat { column: format.column, ..ColumnFormat::default() })
                .then_some(format)
        })
        .collect();

    let cell_formats: Vec<CellFormat> = grid
        .cells()
        .filter_map(|(row, column, cell)| {
            let row_default = row_alignments.get(row).copied().flatten();
            let column_default = column_alignments.get(column).copied().flatten();

            let vertical_align = cell_alignment(request, cell, Alignment::is_vertical)
                .filter(|alignment| Some(*alignment) != row_default);
            let align = cell_alignment(request, cell, Alignment::is_horizontal)
                .filter(|alignment| Some(*alignment) != column_default);
            let rowspan = if cell.rowspan > 1 { i32::try_from(cell.rowspan).ok()? } else { 0 };
            let colspan = if cell.colspan > 1 { i32::try_from(cell.colspan).ok()? } else { 0 };

            if vertical_align.is_none() && align.is_none() && rowspan == 0 && colspan == 0 {
                return None;
            }
            Some(CellFormat {
                row: i32::try_from(row).ok()?,
                column: i32::try_from(column).ok()?,
                align,
                vertical_align,
                rowspan,
                colspan,
            })
        })
        .collect();

    let data = grid.data();
    info!(
        file_name = %request.filename,
        "parsed html table: {} rows, {} columns, {} cell formats",
        data.len(),
        grid.column_count(),
        cell_formats.len()
    );

    Ok(RenderRequest {
        title: request.title.clone(),
        subtitle: request.subtitle.clone(),
        source: request.source.clone(),
        table_type: TABLE_TYPE.to_string(),
        table_version: TABLE_VERSION.to_string(),
        filename: request.filename.clone(),
        units: request.units.clone(),
        keep_headers_together: request.keep_headers_together,
        row_formats,
        column_formats,
        cell_formats,
        data,
        footnotes: request.footnotes.clone(),
    })
}

/// The fragment's only top-level element, which must be a `<table>`
///
/// Whitespace text and comments around the element are ignored.
fn single_table(fragment: &Html) -> ParseResult<ElementRef<'_>> {
    let top_level: Vec<_> = fragment
        .root_element()
        .children()
        .filter(|node| match node.value() {
            Node::Element(_) => true,
            Node::Text(text) => !text.text.trim().is_empty(),
            _ => false,
        })
        .collect();

    let [node] = top_level.as_slice() else {
        return Err(ParseError::NotSingleElement {
            count: top_level.len(),
        });
    };

    match ElementRef::wrap(*node) {
        Some(element) if element.value().name() == "table" => Ok(element),
        Some(element) => Err(ParseError::NotTable {
            tag: format!("<{}>", element.value().name()),
        }),
        None => Err(ParseError::NotTable {
            tag: "text".to_string(),
        }),
    }
}

/// Alignment whose configured class is on every cell of a row or column
fn uniform_alignment(
    request: &ParseRequest,
    tally: &grid::ClassTally,
    axis: fn(Alignment) -> bool,
) -> Option<Alignment> {
    request
        .alignment_classes
        .configured()
        .find(|(class, alignment)| axis(*alignment) && tally.is_uniform(class))
        .map(|(_, alignment)| alignment)
}

/// First configured alignment class carried by a cell
fn cell_alignment(
    request: &ParseRequest,
    cell: &grid::SourceCell,
    axis: fn(Alignment) -> bool,
) -> Option<Alignment> {
    request
        .alignment_classes
        .configured()
        .find(|(class, alignment)| axis(*alignment) && cell.has_class(class))
        .map(|(_, alignment)| alignment)
}
