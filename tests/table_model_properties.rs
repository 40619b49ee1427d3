//! Property tests for merge handling and spreadsheet references

use proptest::prelude::*;
use table_renderer::renderer::xlsx_renderer::column_name;
use table_renderer::{CellFormat, RenderRequest, TableModel, render_csv, render_html_string};

fn grid(rows: usize, columns: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|r| (0..columns).map(|c| format!("{r}-{c}")).collect())
        .collect()
}

proptest! {
    #[test]
    fn single_merge_skips_covered_area(
        rows in 1usize..8,
        columns in 1usize..8,
        row in 0i32..10,
        column in 0i32..10,
        rowspan in -2i32..6,
        colspan in -2i32..6,
    ) {
        let request = RenderRequest {
            data: grid(rows, columns),
            cell_formats: vec![CellFormat { row, column, rowspan, colspan, ..CellFormat::default() }],
            ..RenderRequest::default()
        };
        let model = TableModel::build(&request);

        let skipped = (0..rows)
            .flat_map(|r| (0..columns).map(move |c| (r, c)))
            .filter(|&(r, c)| !model.is_visible(r, c))
            .count();

        let (r0, c0) = (row as usize, column as usize);
        let expected = if r0 < rows && c0 < columns {
            let height = (rowspan.max(1) as usize).min(rows - r0);
            let width = (colspan.max(1) as usize).min(columns - c0);
            height * width - 1
        } else {
            0
        };
        prop_assert_eq!(skipped, expected);
    }

    #[test]
    fn arbitrary_formats_never_panic(
        formats in prop::collection::vec((-3i32..12, -3i32..12, -3i32..12, -3i32..12), 0..6),
        lengths in prop::collection::vec(0usize..6, 0..6),
    ) {
        let data = lengths
            .iter()
            .map(|&len| (0..len).map(|c| c.to_string()).collect())
            .collect();
        let request = RenderRequest {
            data,
            cell_formats: formats
                .into_iter()
                .map(|(row, column, rowspan, colspan)| CellFormat { row, column, rowspan, colspan, ..CellFormat::default() })
                .collect(),
            ..RenderRequest::default()
        };

        let html = render_html_string(&request);
        prop_assert_eq!(html.matches("<tr").count(), request.data.len());
        prop_assert!(render_csv(&request).is_ok());
    }

    #[test]
    fn column_names_are_ordered_and_distinct(column in 0usize..20_000) {
        let current = column_name(column);
        let next = column_name(column + 1);
        prop_assert!(current.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert!(current.len() < next.len() || (current.len() == next.len() && current < next));
    }
}
