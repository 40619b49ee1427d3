//! Dense table model built from a render request
//!
//! A `RenderRequest` carries sparse overrides: a handful of row, column and
//! cell formats keyed by index. Every renderer needs the same questions
//! answered for each grid position (is it hidden by a merge, how is it
//! aligned, is it a heading) so the overrides are normalized once here.
//!
//! Horizontal alignment is governed by columns, vertical alignment by rows,
//! and a cell override beats both. Alignments given in the wrong axis are
//! dropped during the build.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::{Alignment, RenderRequest};

/// Defaults for one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowModel {
    pub vertical_align: Option<Alignment>,
    pub heading: bool,
    pub height: String,
}

/// Defaults for one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnModel {
    pub align: Option<Alignment>,
    pub heading: bool,
    pub width: String,
}

/// Per-cell state derived from cell formats and merges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellModel {
    /// Covered by another cell's merge; renders nothing
    pub skip: bool,
    pub colspan: usize,
    pub rowspan: usize,
    pub align: Option<Alignment>,
    pub vertical_align: Option<Alignment>,
}

impl CellModel {
    pub const DEFAULT: CellModel = CellModel {
        skip: false,
        colspan: 1,
        rowspan: 1,
        align: None,
        vertical_align: None,
    };
}

impl Default for CellModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static DEFAULT_CELL: CellModel = CellModel::DEFAULT;

/// A merged region anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub row: usize,
    pub column: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

/// Everything a renderer needs to know about one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveCellStyle {
    pub skip: bool,
    pub colspan: usize,
    pub rowspan: usize,
    /// Cell override, else the column default
    pub align: Option<Alignment>,
    /// Cell override, else the row default
    pub vertical_align: Option<Alignment>,
    pub row_heading: bool,
    pub column_heading: bool,
}

impl EffectiveCellStyle {
    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.row_heading || self.column_heading
    }
}

/// Normalized view over a render request
#[derive(Debug)]
pub struct TableModel<'a> {
    request: &'a RenderRequest,
    rows: Vec<RowModel>,
    columns: Vec<ColumnModel>,
    cells: HashMap<(usize, usize), CellModel>,
    merges: Vec<MergeRegion>,
}

impl<'a> TableModel<'a> {
    /// Build the model for a request
    ///
    /// Never fails: format entries whose index falls outside the data grid
    /// are logged and ignored.
    #[must_use]
    pub fn build(request: &'a RenderRequest) -> Self {
        let row_count = request.data.len();
        let column_count = request.data.iter().map(Vec::len).max().unwrap_or(0);

        let mut columns = vec![ColumnModel::default(); column_count];
        for format in &request.column_formats {
            let Some(index) = index_within(format.column, column_count) else {
                info!(
                    file_name = %request.filename,
                    "ignoring column format: col {} is outside the table ({} columns)",
                    format.column,
                    column_count
                );
                continue;
            };
            columns[index] = ColumnModel {
                align: horizontal(format.align),
                heading: format.heading,
                width: format.width.clone(),
            };
        }

        let mut rows = vec![RowModel::default(); row_count];
        for format in &request.row_formats {
            let Some(index) = index_within(format.row, row_count) else {
                info!(
                    file_name = %request.filename,
                    "ignoring row format: row {} is outside the table ({} rows)",
                    format.row,
                    row_count
                );
                continue;
            };
            rows[index] = RowModel {
                vertical_align: vertical(format.vertical_align),
                heading: format.heading,
                height: format.height.clone(),
            };
        }

        let mut cells: HashMap<(usize, usize), CellModel> = HashMap::new();
        let mut merge_origins = Vec::new();
        for format in &request.cell_formats {
            let (Some(row), Some(column)) = (
                index_within(format.row, row_count),
                index_within(format.column, column_count),
            ) else {
                info!(
                    file_name = %request.filename,
                    "ignoring cell format: ({}, {}) is outside the table ({} rows, {} columns)",
                    format.row,
                    format.column,
                    row_count,
                    column_count
                );
                continue;
            };

            let cell = cells.entry((row, column)).or_default();
            cell.rowspan = span(format.rowspan);
            cell.colspan = span(format.colspan);
            cell.align = horizontal(format.align);
            cell.vertical_align = vertical(format.vertical_align);
            let (rowspan, colspan) = (cell.rowspan, cell.colspan);

            if format.is_merge() {
                merge_origins.push((row, column));
            }

            // Covered positions beyond the data grid are never looked up.
            let last_row = row.saturating_add(rowspan).min(row_count);
            let last_column = column.saturating_add(colspan).min(column_count);
            for r in row..last_row {
                for c in column..last_column {
                    if (r, c) != (row, column) {
                        cells.entry((r, c)).or_default().skip = true;
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        let merges = merge_origins
            .into_iter()
            .filter(|origin| seen.insert(*origin))
            .filter_map(|(row, column)| {
                let cell = cells.get(&(row, column))?;
                (cell.rowspan > 1 || cell.colspan > 1).then_some(MergeRegion {
                    row,
                    column,
                    rowspan: cell.rowspan,
                    colspan: cell.colspan,
                })
            })
            .collect();

        Self {
            request,
            rows,
            columns,
            cells,
            merges,
        }
    }

    #[must_use]
    pub fn request(&self) -> &'a RenderRequest {
        self.request
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest data row
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[RowModel] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    /// Cell state at a position; positions without a format get the default
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &CellModel {
        self.cells.get(&(row, column)).unwrap_or(&DEFAULT_CELL)
    }

    #[must_use]
    pub fn is_visible(&self, row: usize, column: usize) -> bool {
        !self.cell(row, column).skip
    }

    /// Merged regions in the order their formats were declared
    #[must_use]
    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    /// Resolve the effective style of one position
    #[must_use]
    pub fn resolve(&self, row: usize, column: usize) -> EffectiveCellStyle {
        let cell = self.cell(row, column);
        let row_model = self.rows.get(row);
        let column_model = self.columns.get(column);

        EffectiveCellStyle {
            skip: cell.skip,
            colspan: cell.colspan,
            rowspan: cell.rowspan,
            align: cell.align.or(column_model.and_then(|c| c.align)),
            vertical_align: cell
                .vertical_align
                .or(row_model.and_then(|r| r.vertical_align)),
            row_heading: row_model.is_some_and(|r| r.heading),
            column_heading: column_model.is_some_and(|c| c.heading),
        }
    }
}

fn index_within(index: i32, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

/// Spans of zero or less mean "no span"
fn span(value: i32) -> usize {
    usize::try_from(value).unwrap_or(1).max(1)
}

fn horizontal(alignment: Option<Alignment>) -> Option<Alignment> {
    alignment.filter(|a| a.is_horizontal())
}

fn vertical(alignment: Option<Alignment>) -> Option<Alignment> {
    alignment.filter(|a| a.is_vertical())
}
