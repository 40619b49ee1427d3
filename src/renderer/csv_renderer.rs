//! CSV renderer
//!
//! Layout: title, subtitle, a blank line, the data rows, a blank line, then
//! the units, source and numbered footnotes. Merged cells keep their grid
//! position and are written as empty fields.

use csv::{Terminator, WriterBuilder};
use tracing::error;

use super::errors::{RenderError, RenderResult};
use super::{NOTES_LABEL, SOURCE_LABEL, UNITS_LABEL};
use crate::models::RenderRequest;
use crate::table_model::TableModel;

/// Render a request as CSV
///
/// # Errors
///
/// Returns `RenderError::Csv` or `RenderError::Io` if a record cannot be
/// written; the failing section is logged.
pub fn render_csv(request: &RenderRequest) -> RenderResult<Vec<u8>> {
    let model = TableModel::build(request);
    let mut out = CsvOutput::new(request);

    out.record([request.title.as_str()], "title")?;
    out.record([request.subtitle.as_str()], "subtitle")?;
    out.blank_line();

    for (row_index, row) in request.data.iter().enumerate() {
        let record = row.iter().enumerate().map(|(column_index, value)| {
            if model.is_visible(row_index, column_index) {
                value.as_str()
            } else {
                ""
            }
        });
        out.record(record, "data")?;
    }
    out.blank_line();

    if !request.units.is_empty() {
        out.record([UNITS_LABEL, request.units.as_str()], "units")?;
    }
    if !request.source.is_empty() {
        out.record([SOURCE_LABEL, request.source.as_str()], "source")?;
    }
    if !request.footnotes.is_empty() {
        out.record([NOTES_LABEL], "notes")?;
        for (index, note) in request.footnotes.iter().enumerate() {
            let number = format!("{}.", index + 1);
            out.record([number.as_str(), note.as_str()], "footnotes")?;
        }
    }

    Ok(out.finish())
}

/// Output buffer that the csv writer appends to one record at a time
///
/// The csv crate quotes a record made of a single empty field, so such
/// records and separator lines are written as a bare newline instead.
struct CsvOutput<'a> {
    builder: WriterBuilder,
    buffer: Vec<u8>,
    request: &'a RenderRequest,
}

impl<'a> CsvOutput<'a> {
    fn new(request: &'a RenderRequest) -> Self {
        let mut builder = WriterBuilder::new();
        builder.flexible(true).terminator(Terminator::Any(b'\n'));
        Self {
            builder,
            buffer: Vec::new(),
            request,
        }
    }

    fn record<'r, I>(&mut self, record: I, section: &str) -> RenderResult<()>
    where
        I: IntoIterator<Item = &'r str>,
    {
        let fields: Vec<&str> = record.into_iter().collect();
        if fields.iter().all(|field| field.is_empty()) && fields.len() <= 1 {
            self.blank_line();
            return Ok(());
        }

        let mut writer = self.builder.from_writer(&mut self.buffer);
        let written = match writer.write_record(&fields) {
            Ok(()) => writer.flush().map_err(RenderError::from),
            Err(err) => Err(RenderError::from(err)),
        };
        written.map_err(|err| {
            error!(file_name = %self.request.filename, section, "failed to write csv record: {}", err);
            err
        })
    }

    fn blank_line(&mut self) {
        self.buffer.push(b'\n');
    }

    fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellFormat;

    fn rendered(request: &RenderRequest) -> String {
        String::from_utf8(render_csv(request).expect("csv renders")).expect("csv is utf-8")
    }

    #[test]
    fn test_layout() {
        let request = RenderRequest {
            title: "Title".to_string(),
            subtitle: "Sub".to_string(),
            units: "kg".to_string(),
            source: "ONS".to_string(),
            data: vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ],
            footnotes: vec!["first".to_string(), "second, with comma".to_string()],
            ..RenderRequest::default()
        };

        assert_eq!(
            rendered(&request),
            "Title\nSub\n\na,b\n1,2\n\nUnits: ,kg\nSource: ,ONS\nNotes\n1.,first\n2.,\"second, with comma\"\n"
        );
    }

    #[test]
    fn test_separator_lines_are_bare_newlines() {
        let request = RenderRequest {
            title: "T".to_string(),
            data: vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
            ],
            ..RenderRequest::default()
        };
        assert_eq!(rendered(&request).as_bytes(), b"T\n\n\na,b\nc,d\n\n");
    }

    #[test]
    fn test_single_empty_field_is_blank_line() {
        let request = RenderRequest {
            data: vec![
                vec!["x".to_string()],
                vec![String::new()],
                vec![],
                vec![String::new(), String::new()],
            ],
            ..RenderRequest::default()
        };
        assert_eq!(rendered(&request), "\n\n\nx\n\n\n,\n\n");
    }

    #[test]
    fn test_merged_cells_are_blank() {
        let request = RenderRequest {
            title: "T".to_string(),
            subtitle: "S".to_string(),
            data: vec![
                vec!["a".to_string(), "hidden".to_string(), "c".to_string()],
                vec!["d".to_string(), "e".to_string(), "f".to_string()],
            ],
            cell_formats: vec![CellFormat {
                row: 0,
                column: 0,
                colspan: 2,
                ..CellFormat::default()
            }],
            ..RenderRequest::default()
        };

        let csv = rendered(&request);
        assert!(csv.contains("\na,,c\nd,e,f\n"));
        assert!(!csv.contains("hidden"));
    }

    #[test]
    fn test_ragged_rows_and_newlines() {
        let request = RenderRequest {
            title: "T".to_string(),
            subtitle: "S".to_string(),
            data: vec![
                vec!["line1\nline2".to_string()],
                vec!["x".to_string(), "y".to_string(), "z".to_string()],
            ],
            ..RenderRequest::default()
        };

        let csv = rendered(&request);
        assert!(csv.contains("\"line1\nline2\"\nx,y,z\n"));
    }
}
