//! End-to-end tests for the CSV renderer

mod common;

use anyhow::Result;
use common::{example_request, request_with_data};
use table_renderer::{CellFormat, render_csv};

fn read_records(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }
    Ok(records)
}

#[test]
fn test_example_layout() -> Result<()> {
    let request = example_request()?;
    let bytes = render_csv(&request)?;
    let records = read_records(&bytes)?;

    // blank separator lines are skipped by the reader
    assert_eq!(records[0], vec![request.title.clone()]);
    assert_eq!(records[1], vec![request.subtitle.clone()]);
    assert_eq!(records[2], vec!["Region", "Price", "", ""]);
    assert_eq!(records[4], vec!["North\nEast", "150", "152.5", "153.25"]);
    assert_eq!(records[5], vec!["", "151", "153.0", "154.125"]);
    assert_eq!(records[8], vec!["Total"]);
    assert_eq!(records[9], vec!["Units: ", "£ thousands"]);
    assert_eq!(records[10], vec!["Source: ", "Land Registry"]);
    assert_eq!(records[11], vec!["Notes"]);
    assert_eq!(records[12], vec!["1.", "Mix-adjusted"]);
    assert_eq!(records[13], vec!["2.", "Includes Inner and Outer London"]);
    assert_eq!(records.len(), 14);
    Ok(())
}

#[test]
fn test_merged_positions_are_empty() -> Result<()> {
    let mut request = request_with_data("m", &[&["a", "b", "c"], &["d", "e", "f"]]);
    request.title = "T".to_string();
    request.subtitle = "S".to_string();
    request.cell_formats = vec![CellFormat {
        row: 0,
        column: 1,
        rowspan: 2,
        colspan: 2,
        ..CellFormat::default()
    }];

    let records = read_records(&render_csv(&request)?)?;
    assert_eq!(records[2], vec!["a", "b", ""]);
    assert_eq!(records[3], vec!["d", "", ""]);
    Ok(())
}

#[test]
fn test_blank_lines_are_bare() -> Result<()> {
    let mut request = request_with_data("b", &[&["x"]]);
    request.title = "T".to_string();
    request.subtitle = "S".to_string();
    let text = String::from_utf8(render_csv(&request)?)?;
    assert_eq!(text, "T\nS\n\nx\n\n");
    Ok(())
}

#[test]
fn test_no_optional_sections() -> Result<()> {
    let mut request = request_with_data("n", &[&["1", "2"]]);
    request.title = "T".to_string();
    request.subtitle = "S".to_string();
    let text = String::from_utf8(render_csv(&request)?)?;
    assert!(!text.contains("Units"));
    assert!(!text.contains("Source"));
    assert!(!text.contains("Notes"));
    Ok(())
}
