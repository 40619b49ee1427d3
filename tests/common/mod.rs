//! Test utilities and fixtures for the table renderer test suite

use anyhow::Result;
use table_renderer::{ParseRequest, RenderRequest};

/// A realistic request: headings, merges, alignment, footnotes and a
/// ragged final row
pub const EXAMPLE_REQUEST: &str = r#"{
    "title": "Regional house prices[1]",
    "subtitle": "England and Wales, 2024",
    "source": "Land Registry",
    "type": "table",
    "type_version": "2",
    "filename": "house-prices",
    "units": "£ thousands",
    "keep_headers_together": false,
    "row_formats": [
        {"row": 0, "heading": true, "vertical_align": "Middle"},
        {"row": 1, "heading": true},
        {"row": 6, "height": "3em"}
    ],
    "column_formats": [
        {"col": 0, "heading": true, "width": "30%"},
        {"col": 1, "align": "Right"},
        {"col": 2, "align": "Right"},
        {"col": 3, "align": "Right"}
    ],
    "cell_formats": [
        {"row": 0, "col": 1, "colspan": 3, "align": "Center"},
        {"row": 2, "col": 0, "rowspan": 2},
        {"row": 4, "col": 3, "align": "Left", "vertical_align": "Top"}
    ],
    "data": [
        ["Region", "Price", "", ""],
        ["", "Q1", "Q2", "Q3"],
        ["North\nEast", "150", "152.5", "153.25"],
        ["", "151", "153.0", "154.125"],
        ["London[2]", "520", "525", "n/a"],
        ["Wales", "190", "191.2", "192"],
        ["Total"]
    ],
    "footnotes": ["Mix-adjusted", "Includes Inner and Outer London"]
}"#;

#[allow(dead_code)]
pub fn example_request() -> Result<RenderRequest> {
    Ok(RenderRequest::from_slice(EXAMPLE_REQUEST.as_bytes())?)
}

/// Build a request from rows of string slices
#[allow(dead_code)]
pub fn request_with_data(filename: &str, data: &[&[&str]]) -> RenderRequest {
    RenderRequest {
        filename: filename.to_string(),
        data: data
            .iter()
            .map(|row| row.iter().map(|v| (*v).to_string()).collect())
            .collect(),
        ..RenderRequest::default()
    }
}

/// A parse request using Handsontable-style alignment classes
#[allow(dead_code)]
pub fn parse_request(table_html: &str) -> ParseRequest {
    let body = serde_json::json!({
        "filename": "parsed",
        "title": "Parsed table",
        "table_html": table_html,
        "alignment_classes": {
            "top": "htTop",
            "middle": "htMiddle",
            "bottom": "htBottom",
            "left": "htLeft",
            "right": "htRight",
            "center": "htCenter",
            "justify": "htJustify"
        }
    });
    serde_json::from_value(body).expect("fixture parse request is valid")
}

/// Parse rendered HTML and count elements matching a selector
#[allow(dead_code)]
pub fn count_elements(html: &str, selector: &str) -> usize {
    let document = scraper::Html::parse_fragment(html);
    let selector = scraper::Selector::parse(selector).expect("test selector is valid");
    document.select(&selector).count()
}

/// Read one part of a generated XLSX package
#[allow(dead_code)]
pub fn xlsx_part(bytes: &[u8], name: &str) -> Result<String> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut part = archive.by_name(name)?;
    let mut contents = String::new();
    part.read_to_string(&mut contents)?;
    Ok(contents)
}
