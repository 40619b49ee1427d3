//! The render request: a table's data plus its sparse format overrides

use std::io::Read;

use serde::{Deserialize, Serialize};

use super::alignment::{Alignment, lenient};
use super::errors::{ModelError, ModelResult};
use super::{is_false, is_zero, null_as_default};

/// Full description of a table to render
///
/// Only `data` is structurally meaningful; every other field is optional.
/// Format overrides are sparse: indices that fall outside the data grid are
/// ignored by the renderers rather than rejected here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub subtitle: String,

    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Opaque table type tag, passed through untouched
    #[serde(
        rename = "type",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub table_type: String,

    /// Opaque table version tag, passed through untouched
    #[serde(
        rename = "type_version",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub table_version: String,

    /// Used to build element ids and footnote anchors
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub filename: String,

    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub units: String,

    /// Ask the HTML renderer to keep heading text on one line
    #[serde(deserialize_with = "null_as_default")]
    pub keep_headers_together: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub row_formats: Vec<RowFormat>,

    #[serde(deserialize_with = "null_as_default")]
    pub column_formats: Vec<ColumnFormat>,

    #[serde(deserialize_with = "null_as_default")]
    pub cell_formats: Vec<CellFormat>,

    /// Row-major cell text; rows may differ in length
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<Vec<String>>,

    /// Footnote text, referenced from values as `[1]`, `[2]`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub footnotes: Vec<String>,
}

/// Override for a single row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFormat {
    pub row: i32,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<Alignment>,

    #[serde(skip_serializing_if = "is_false")]
    pub heading: bool,

    /// CSS length, e.g. `2em`
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub height: String,
}

/// Override for a single column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFormat {
    #[serde(rename = "col")]
    pub column: i32,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,

    #[serde(skip_serializing_if = "is_false")]
    pub heading: bool,

    /// CSS length, e.g. `25%`
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub width: String,
}

/// Override for a single cell, including merges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellFormat {
    pub row: i32,

    #[serde(rename = "col")]
    pub column: i32,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<Alignment>,

    #[serde(skip_serializing_if = "is_zero")]
    pub rowspan: i32,

    #[serde(skip_serializing_if = "is_zero")]
    pub colspan: i32,
}

impl RenderRequest {
    /// Decode a render request from a complete JSON body
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ParsingBody` for malformed JSON and
    /// `ModelError::NoData` for an empty `{}` object.
    pub fn from_slice(body: &[u8]) -> ModelResult<Self> {
        let request: RenderRequest =
            serde_json::from_slice(body).map_err(ModelError::ParsingBody)?;

        if body.trim_ascii() == b"{}" {
            return Err(ModelError::NoData);
        }

        request.validate()?;
        Ok(request)
    }

    /// Read a body stream to the end and decode it
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ReadingBody` if the stream fails, otherwise the
    /// errors of [`RenderRequest::from_slice`].
    pub fn from_reader<R: Read>(mut reader: R) -> ModelResult<Self> {
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(ModelError::ReadingBody)?;
        Self::from_slice(&body)
    }

    /// Deliberately permissive: render requests have no mandatory fields and
    /// an empty table renders as an empty table. Out-of-range formats are
    /// dropped later, when the table model is built.
    pub fn validate(&self) -> ModelResult<()> {
        Ok(())
    }
}

impl CellFormat {
    /// Whether this format declares a merged region
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.colspan > 1 || self.rowspan > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("connection reset"))
        }
    }

    #[test]
    fn test_decode_full_request() -> Result<()> {
        let body = br#"{
            "title": "Prices",
            "type": "table",
            "type_version": "2",
            "filename": "prices",
            "keep_headers_together": true,
            "row_formats": [{"row": 0, "heading": true, "vertical_align": "Top"}],
            "column_formats": [{"col": 1, "align": "Right", "width": "5em"}],
            "cell_formats": [{"row": 1, "col": 0, "colspan": 2}],
            "data": [["a", "b"], ["c"]],
            "footnotes": ["note"]
        }"#;

        let request = RenderRequest::from_slice(body)?;
        assert_eq!(request.title, "Prices");
        assert_eq!(request.table_type, "table");
        assert_eq!(request.table_version, "2");
        assert!(request.keep_headers_together);
        assert_eq!(request.row_formats[0].vertical_align, Some(Alignment::Top));
        assert_eq!(request.column_formats[0].column, 1);
        assert_eq!(request.column_formats[0].align, Some(Alignment::Right));
        assert!(request.cell_formats[0].is_merge());
        assert_eq!(request.data[1], vec!["c".to_string()]);
        Ok(())
    }

    #[test]
    fn test_empty_object_is_no_data() {
        let result = RenderRequest::from_slice(b"{}");
        assert!(matches!(result, Err(ModelError::NoData)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = RenderRequest::from_slice(b"{\"title\": ");
        assert!(matches!(result, Err(ModelError::ParsingBody(_))));
    }

    #[test]
    fn test_reader_failure() {
        let result = RenderRequest::from_reader(FailingReader);
        assert!(matches!(result, Err(ModelError::ReadingBody(_))));
    }

    #[test]
    fn test_nulls_decode_as_defaults() -> Result<()> {
        let request = RenderRequest::from_slice(br#"{"title": null, "data": null, "footnotes": null}"#)?;
        assert!(request.title.is_empty());
        assert!(request.data.is_empty());
        Ok(())
    }

    #[test]
    fn test_serialization_omits_empty_fields() -> Result<()> {
        let request = RenderRequest {
            filename: "f".to_string(),
            data: vec![vec!["x".to_string()]],
            cell_formats: vec![CellFormat {
                row: 0,
                column: 0,
                align: Some(Alignment::Left),
                ..CellFormat::default()
            }],
            ..RenderRequest::default()
        };

        let json = serde_json::to_value(&request)?;
        assert!(json.get("title").is_none());
        assert_eq!(json["filename"], "f");
        assert_eq!(json["keep_headers_together"], false);
        assert_eq!(json["cell_formats"][0], serde_json::json!({"row": 0, "col": 0, "align": "Left"}));
        Ok(())
    }
}
