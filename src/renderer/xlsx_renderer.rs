//! XLSX renderer
//!
//! Writes a single worksheet laid out like the CSV output. Numeric-looking
//! values are stored as numbers with a matching display format, headings are
//! bold and wrapped, and merged regions become real spreadsheet merges.
//!
//! Styles are described by a hashable [`CellStyle`] and materialized through
//! a per-request cache, so identical cells share one `Format`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::{debug, warn};

use super::errors::RenderResult;
use super::{NOTES_LABEL, SOURCE_LABEL, UNITS_LABEL};
use crate::models::{Alignment, RenderRequest};
use crate::table_model::TableModel;

// ============================================================================
// Static Patterns (compiled once at first use)
// ============================================================================

static INTEGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]*$").expect("BUG: hardcoded integer regex is statically valid")
});

static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]*\.[0-9]+$").expect("BUG: hardcoded decimal regex is statically valid")
});

const SHEET_NAME: &str = "Sheet1";

/// Title, subtitle and one blank row precede the data
const FIRST_DATA_ROW: usize = 3;

/// Display format inferred from a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    General,
    /// Built-in format 1, `0`
    Integer,
    /// Custom `0.0`
    OneDecimal,
    /// Built-in format 2, `0.00`
    TwoDecimals,
    /// Custom `0.000`
    ThreeDecimals,
}

/// Structural description of a cell's spreadsheet style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub number_format: NumberFormat,
    pub horizontal: Option<Alignment>,
    pub vertical: Option<Alignment>,
    /// Bold and wrapped
    pub heading: bool,
}

impl CellStyle {
    fn to_format(self) -> Format {
        let mut format = Format::new();

        format = match self.number_format {
            NumberFormat::General => format,
            NumberFormat::Integer => format.set_num_format_index(1),
            NumberFormat::OneDecimal => format.set_num_format("0.0"),
            NumberFormat::TwoDecimals => format.set_num_format_index(2),
            NumberFormat::ThreeDecimals => format.set_num_format("0.000"),
        };

        let horizontal = match self.horizontal {
            Some(Alignment::Left) => Some(FormatAlign::Left),
            Some(Alignment::Center) => Some(FormatAlign::Center),
            Some(Alignment::Right) => Some(FormatAlign::Right),
            Some(Alignment::Justify) => Some(FormatAlign::Justify),
            _ => None,
        };
        if let Some(align) = horizontal {
            format = format.set_align(align);
        }

        // Bottom is the spreadsheet default
        let vertical = match self.vertical {
            Some(Alignment::Top) => Some(FormatAlign::Top),
            Some(Alignment::Middle) => Some(FormatAlign::VerticalCenter),
            _ => None,
        };
        if let Some(align) = vertical {
            format = format.set_align(align);
        }

        if self.heading {
            format = format.set_bold().set_text_wrap();
        }
        format
    }
}

/// Request-scoped cache of materialized formats
#[derive(Debug, Default)]
struct StyleCache {
    formats: HashMap<CellStyle, Format>,
}

impl StyleCache {
    fn format(&mut self, style: CellStyle) -> &Format {
        self.formats
            .entry(style)
            .or_insert_with(|| style.to_format())
    }

    fn len(&self) -> usize {
        self.formats.len()
    }
}

/// Typed value to write into a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// Infer how a raw value should be stored and displayed
#[must_use]
pub fn classify_value(value: &str) -> (CellValue<'_>, NumberFormat) {
    let trimmed = value.trim();

    if INTEGER_PATTERN.is_match(trimmed) {
        return match trimmed.parse::<i64>() {
            #[allow(clippy::cast_precision_loss)]
            Ok(number) => (CellValue::Number(number as f64), NumberFormat::Integer),
            Err(err) => {
                warn!("integer-like value '{}' could not be parsed: {}", trimmed, err);
                (CellValue::Text(value), NumberFormat::General)
            }
        };
    }

    if DECIMAL_PATTERN.is_match(trimmed) {
        return match trimmed.parse::<f64>() {
            Ok(number) => {
                let decimals = trimmed
                    .split_once('.')
                    .map_or(0, |(_, fraction)| fraction.len());
                let format = match decimals {
                    1 => NumberFormat::OneDecimal,
                    2 => NumberFormat::TwoDecimals,
                    3 => NumberFormat::ThreeDecimals,
                    _ => NumberFormat::General,
                };
                (CellValue::Number(number), format)
            }
            Err(err) => {
                warn!("decimal-like value '{}' could not be parsed: {}", trimmed, err);
                (CellValue::Text(value), NumberFormat::General)
            }
        };
    }

    (CellValue::Text(value), NumberFormat::General)
}

/// Spreadsheet column letters for a 0-based column index
///
/// Bijective base-26: `A`..`Z`, `AA`..`ZZ`, `AAA`...
#[must_use]
pub fn column_name(column: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = column + 1;
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(b'A' + rem as u8);
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style reference for a 0-based row and column
#[must_use]
pub fn cell_reference(row: usize, column: usize) -> String {
    format!("{}{}", column_name(column), row + 1)
}

/// Render a request as an XLSX workbook
///
/// # Errors
///
/// Returns `RenderError::Xlsx` if the workbook cannot be assembled or
/// serialized. Individual cell and merge failures are logged and skipped.
pub fn render_xlsx(request: &RenderRequest) -> RenderResult<Vec<u8>> {
    let model = TableModel::build(request);
    let mut workbook = Workbook::new();
    let mut styles = StyleCache::default();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        write_document(worksheet, &model, &mut styles);
    }

    debug!(
        file_name = %request.filename,
        "rendered xlsx with {} distinct cell styles",
        styles.len()
    );
    Ok(workbook.save_to_buffer()?)
}

fn write_document(worksheet: &mut Worksheet, model: &TableModel<'_>, styles: &mut StyleCache) {
    let request = model.request();
    let title_format = Format::new().set_bold();

    write_value(worksheet, 0, 0, CellValue::Text(&request.title), &title_format);
    write_value(worksheet, 1, 0, CellValue::Text(&request.subtitle), &title_format);

    // Merges first: each writes a placeholder into its top-left cell, which
    // the data pass then overwrites.
    write_merges(worksheet, model, styles);
    write_data(worksheet, model, styles);

    let plain = Format::new();
    let mut row = FIRST_DATA_ROW + model.row_count() + 1;
    if !request.units.is_empty() {
        write_value(worksheet, row, 0, CellValue::Text(UNITS_LABEL), &plain);
        write_value(worksheet, row, 1, CellValue::Text(&request.units), &plain);
        row += 1;
    }
    if !request.source.is_empty() {
        write_value(worksheet, row, 0, CellValue::Text(SOURCE_LABEL), &plain);
        write_value(worksheet, row, 1, CellValue::Text(&request.source), &plain);
        row += 1;
    }
    if !request.footnotes.is_empty() {
        write_value(worksheet, row, 0, CellValue::Text(NOTES_LABEL), &plain);
        row += 1;
        for (index, note) in request.footnotes.iter().enumerate() {
            let number = format!("{}.", index + 1);
            write_value(worksheet, row, 0, CellValue::Text(&number), &plain);
            write_value(worksheet, row, 1, CellValue::Text(note), &plain);
            row += 1;
        }
    }
}

fn cell_style(model: &TableModel<'_>, row: usize, column: usize, number_format: NumberFormat) -> CellStyle {
    let resolved = model.resolve(row, column);
    CellStyle {
        number_format,
        horizontal: resolved.align,
        vertical: resolved.vertical_align.filter(|v| *v != Alignment::Bottom),
        heading: resolved.is_heading(),
    }
}

fn write_data(worksheet: &mut Worksheet, model: &TableModel<'_>, styles: &mut StyleCache) {
    for (row_index, row) in model.request().data.iter().enumerate() {
        for (column_index, value) in row.iter().enumerate() {
            if !model.is_visible(row_index, column_index) {
                continue;
            }
            let (cell_value, number_format) = classify_value(value);
            let style = cell_style(model, row_index, column_index, number_format);
            let format = styles.format(style);
            write_value(
                worksheet,
                FIRST_DATA_ROW + row_index,
                column_index,
                cell_value,
                format,
            );
        }
    }
}

fn write_merges(worksheet: &mut Worksheet, model: &TableModel<'_>, styles: &mut StyleCache) {
    for merge in model.merges() {
        let first_row = FIRST_DATA_ROW + merge.row;
        let last_row = first_row.saturating_add(merge.rowspan - 1);
        let last_column = merge.column.saturating_add(merge.colspan - 1);
        let range = format!(
            "{}:{}",
            cell_reference(first_row, merge.column),
            cell_reference(last_row, last_column)
        );

        let bounds = (
            u32::try_from(first_row),
            u16::try_from(merge.column),
            u32::try_from(last_row),
            u16::try_from(last_column),
        );
        let (Ok(r1), Ok(c1), Ok(r2), Ok(c2)) = bounds else {
            warn!(file_name = %model.request().filename, range = %range, "merge range exceeds sheet limits; skipping");
            continue;
        };

        let style = cell_style(model, merge.row, merge.column, NumberFormat::General);
        let format = styles.format(style);
        if let Err(err) = worksheet.merge_range(r1, c1, r2, c2, "", format) {
            warn!(file_name = %model.request().filename, range = %range, "failed to merge cells: {}", err);
        }
    }
}

/// Write one value, falling back to the default style if the styled write
/// is rejected. A cell that cannot be written at all is logged and skipped.
fn write_value(worksheet: &mut Worksheet, row: usize, column: usize, value: CellValue<'_>, format: &Format) {
    let reference = cell_reference(row, column);
    let (Ok(row), Ok(column)) = (u32::try_from(row), u16::try_from(column)) else {
        warn!(cell = %reference, "cell is outside the sheet limits; skipping");
        return;
    };

    let styled = write_with(worksheet, row, column, value, Some(format));
    let Err(err) = styled else {
        return;
    };
    warn!(cell = %reference, "styled write failed, retrying with default style: {}", err);

    if let Err(err) = write_with(worksheet, row, column, value, None) {
        warn!(cell = %reference, "failed to write cell: {}", err);
    }
}

fn write_with(
    worksheet: &mut Worksheet,
    row: u32,
    column: u16,
    value: CellValue<'_>,
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    match (value, format) {
        (CellValue::Text(text), Some(format)) => {
            worksheet.write_string_with_format(row, column, text, format)?;
        }
        (CellValue::Text(text), None) => {
            worksheet.write_string(row, column, text)?;
        }
        (CellValue::Number(number), Some(format)) => {
            worksheet.write_number_with_format(row, column, number, format)?;
        }
        (CellValue::Number(number), None) => {
            worksheet.write_number(row, column, number)?;
        }
    }
    Ok(())
}
