//! The parse request: an HTML table plus hints for reading it back

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::alignment::Alignment;
use super::errors::{ModelError, ModelResult};
use super::null_as_default;

/// Request to convert an HTML `<table>` into a [`RenderRequest`](super::RenderRequest)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub units: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keep_headers_together: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub footnotes: Vec<String>,

    /// HTML fragment that must contain exactly one `<table>`
    #[serde(deserialize_with = "null_as_default")]
    pub table_html: String,

    /// Drop the first row of the table (e.g. an editor's column letters)
    #[serde(deserialize_with = "null_as_default")]
    pub ignore_first_row: bool,

    /// Drop the first column of the table (e.g. an editor's row numbers)
    #[serde(deserialize_with = "null_as_default")]
    pub ignore_first_column: bool,

    /// Number of leading rows to mark as headings
    #[serde(deserialize_with = "null_as_default")]
    pub header_rows: i32,

    /// Number of leading columns to mark as headings
    #[serde(deserialize_with = "null_as_default")]
    pub header_cols: i32,

    /// Rendered table width in pixels, used for `%` widths
    #[serde(deserialize_with = "null_as_default")]
    pub current_table_width: i32,

    /// Rendered table height in pixels, used for `%` heights
    #[serde(deserialize_with = "null_as_default")]
    pub current_table_height: i32,

    /// Pixel height of one `em`, used for `em` sizes
    #[serde(deserialize_with = "null_as_default")]
    pub single_em_height: f32,

    /// Target unit for sizes: `%`, `em`, `auto` or empty
    #[serde(deserialize_with = "null_as_default")]
    pub cell_size_units: String,

    /// Literal text removed from every width value before conversion
    #[serde(deserialize_with = "null_as_default")]
    pub column_width_to_ignore: String,

    #[serde(deserialize_with = "null_as_default")]
    pub alignment_classes: ParseAlignments,
}

/// CSS class names that mark alignment in the source table
///
/// An empty name never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseAlignments {
    pub top: String,
    pub middle: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub center: String,
    pub justify: String,
}

/// Unit requested for converted widths and heights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnits {
    /// Keep sizes as written
    Unspecified,
    Percent,
    Em,
    /// Drop sizes entirely
    Auto,
}

impl SizeUnits {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" => Some(SizeUnits::Unspecified),
            "%" => Some(SizeUnits::Percent),
            "em" => Some(SizeUnits::Em),
            "auto" => Some(SizeUnits::Auto),
            _ => None,
        }
    }
}

impl ParseAlignments {
    /// Configured class name for an alignment
    #[must_use]
    pub fn class_for(&self, alignment: Alignment) -> &str {
        match alignment {
            Alignment::Top => &self.top,
            Alignment::Middle => &self.middle,
            Alignment::Bottom => &self.bottom,
            Alignment::Left => &self.left,
            Alignment::Center => &self.center,
            Alignment::Right => &self.right,
            Alignment::Justify => &self.justify,
        }
    }

    /// Alignments whose class is configured, in a fixed order
    pub fn configured(&self) -> impl Iterator<Item = (&str, Alignment)> {
        Alignment::ALL
            .into_iter()
            .map(|alignment| (self.class_for(alignment), alignment))
            .filter(|(class, _)| !class.is_empty())
    }

    /// Map a CSS class to the alignment it marks, if any
    #[must_use]
    pub fn alignment_of(&self, class: &str) -> Option<Alignment> {
        self.configured()
            .find(|(name, _)| *name == class)
            .map(|(_, alignment)| alignment)
    }
}

impl ParseRequest {
    /// Decode a parse request from a complete JSON body and validate it
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ParsingBody` for malformed JSON and
    /// `ModelError::MissingFields` when `table_html` is empty.
    pub fn from_slice(body: &[u8]) -> ModelResult<Self> {
        let request: ParseRequest =
            serde_json::from_slice(body).map_err(ModelError::ParsingBody)?;
        request.validate()?;
        Ok(request)
    }

    /// Read a body stream to the end and decode it
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ReadingBody` if the stream fails, otherwise the
    /// errors of [`ParseRequest::from_slice`].
    pub fn from_reader<R: Read>(mut reader: R) -> ModelResult<Self> {
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(ModelError::ReadingBody)?;
        Self::from_slice(&body)
    }

    /// Check mandatory fields
    ///
    /// Inconsistent sizing hints are only logged: the parser falls back to
    /// keeping sizes as written.
    pub fn validate(&self) -> ModelResult<()> {
        let mut missing = Vec::new();
        if self.table_html.trim().is_empty() {
            missing.push("table_html");
        }
        if !missing.is_empty() {
            return Err(ModelError::MissingFields(missing));
        }

        match SizeUnits::from_name(&self.cell_size_units) {
            Some(SizeUnits::Percent) if self.current_table_width <= 0 => {
                info!(
                    "cell_size_units is '%' but current_table_width is {}; widths will not be converted",
                    self.current_table_width
                );
            }
            Some(SizeUnits::Em) if self.single_em_height <= 0.0 => {
                info!(
                    "cell_size_units is 'em' but single_em_height is {}; sizes will not be converted",
                    self.single_em_height
                );
            }
            None => {
                info!(
                    "unknown cell_size_units '{}'; sizes will not be converted",
                    self.cell_size_units
                );
            }
            _ => {}
        }

        Ok(())
    }

    /// Requested size unit; unknown values behave as unspecified
    #[must_use]
    pub fn size_units(&self) -> SizeUnits {
        SizeUnits::from_name(&self.cell_size_units).unwrap_or(SizeUnits::Unspecified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_empty_object_reports_table_html() {
        match ParseRequest::from_slice(b"{}") {
            Err(ModelError::MissingFields(fields)) => assert_eq!(fields, vec!["table_html"]),
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_table_html_is_missing() {
        let result = ParseRequest::from_slice(br#"{"table_html": "   "}"#);
        assert!(matches!(result, Err(ModelError::MissingFields(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = ParseRequest::from_slice(b"not json");
        assert!(matches!(result, Err(ModelError::ParsingBody(_))));
    }

    #[test]
    fn test_decode_hints() -> Result<()> {
        let request = ParseRequest::from_slice(
            br#"{
                "table_html": "<table></table>",
                "ignore_first_row": true,
                "header_cols": 1,
                "current_table_width": 400,
                "single_em_height": 12.5,
                "cell_size_units": "em",
                "alignment_classes": {"left": "htLeft", "top": "htTop"}
            }"#,
        )?;
        assert!(request.ignore_first_row);
        assert_eq!(request.header_cols, 1);
        assert_eq!(request.size_units(), SizeUnits::Em);
        assert_eq!(request.alignment_classes.alignment_of("htLeft"), Some(Alignment::Left));
        assert_eq!(request.alignment_classes.alignment_of(""), None);
        assert_eq!(request.alignment_classes.configured().count(), 2);
        Ok(())
    }

    #[test]
    fn test_unknown_units_fall_back() {
        let request = ParseRequest {
            table_html: "<table></table>".to_string(),
            cell_size_units: "furlongs".to_string(),
            ..ParseRequest::default()
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.size_units(), SizeUnits::Unspecified);
    }
}
