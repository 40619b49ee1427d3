//! Logical cell grid of an HTML table
//!
//! HTML rows list only the cells that start in them; a cell spanning several
//! rows or columns occupies positions that later rows simply omit. The grid
//! places every cell at its logical position and marks the positions it
//! covers, so the data extracted from it lines up with the column indices
//! the renderers use for merges.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::errors::{ParseError, ParseResult};
use crate::html::element_text;

// ============================================================================
// Static Selectors (compiled once at first use)
// ============================================================================

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is statically valid")
});

static COL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("col").expect("BUG: hardcoded selector 'col' is statically valid")
});

/// HTML limits for span attributes
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// Upper bound on logical positions a table may occupy, counting every
/// position each span covers
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// A cell as written in the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCell {
    pub text: String,
    pub classes: Vec<String>,
    pub rowspan: usize,
    pub colspan: usize,
}

impl SourceCell {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// No cell starts at or covers this position
    Empty,
    /// Covered by the span of the cell at `origin`
    Covered { origin: (usize, usize) },
    Cell(SourceCell),
}

/// Cells at logical positions, plus the per-row and per-column style hints
#[derive(Debug, Default)]
pub struct TableGrid {
    pub rows: Vec<Vec<Slot>>,
    /// Inline `style` of each row's `<tr>`
    pub row_styles: Vec<String>,
    /// Inline `style` of each column's `<col>`, if any
    pub column_styles: Vec<String>,
}

impl TableGrid {
    /// Read the grid of a `<table>` element
    ///
    /// Spans are clamped to the table: rowspan to the remaining rows and
    /// colspan to the widest row of real cells.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::TooLarge` when the cells and the positions their
    /// spans cover exceed [`MAX_GRID_CELLS`].
    pub fn from_table(table: ElementRef<'_>) -> ParseResult<Self> {
        let rows: Vec<ElementRef<'_>> = table.select(&ROW_SELECTOR).collect();
        let cells_by_row: Vec<Vec<ElementRef<'_>>> = rows
            .iter()
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| matches!(e.value().name(), "td" | "th"))
                    .collect()
            })
            .collect();
        let width = cells_by_row.iter().map(Vec::len).max().unwrap_or(0).max(1);

        let mut slots: Vec<Vec<Slot>> = vec![Vec::new(); rows.len()];
        let mut occupied = 0usize;

        for (row_index, cells) in cells_by_row.iter().enumerate() {
            let mut column = 0;
            for &cell in cells {
                while matches!(slots[row_index].get(column), Some(slot) if *slot != Slot::Empty) {
                    column += 1;
                }

                let colspan = span_attribute(cell, "colspan", MAX_COLSPAN).min(width);
                let rowspan = span_attribute(cell, "rowspan", MAX_ROWSPAN).min(rows.len() - row_index);

                occupied = occupied.saturating_add(rowspan * colspan);
                if occupied > MAX_GRID_CELLS {
                    return Err(ParseError::TooLarge {
                        limit: MAX_GRID_CELLS,
                    });
                }

                for r in row_index..row_index + rowspan {
                    for c in column..column + colspan {
                        let slot = if (r, c) == (row_index, column) {
                            Slot::Cell(SourceCell {
                                text: element_text(cell),
                                classes: cell.value().classes().map(str::to_string).collect(),
                                rowspan,
                                colspan,
                            })
                        } else {
                            Slot::Covered {
                                origin: (row_index, column),
                            }
                        };
                        place(&mut slots[r], c, slot);
                    }
                }
                column += colspan;
            }
        }

        let row_styles = rows
            .iter()
            .map(|row| row.value().attr("style").unwrap_or_default().to_string())
            .collect();

        let mut column_styles = Vec::new();
        for col in table.select(&COL_SELECTOR) {
            let style = col.value().attr("style").unwrap_or_default();
            let span = span_attribute(col, "span", MAX_COLSPAN);
            column_styles.extend(std::iter::repeat_n(style.to_string(), span));
        }

        Ok(Self {
            rows: slots,
            row_styles,
            column_styles,
        })
    }

    /// Number of columns of the widest row
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Drop logical row 0 along with any spans starting in it
    pub fn drop_first_row(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.rows.remove(0);
        if !self.row_styles.is_empty() {
            self.row_styles.remove(0);
        }

        for row in &mut self.rows {
            for slot in row.iter_mut() {
                if let Slot::Covered { origin } = slot {
                    if origin.0 == 0 {
                        *slot = Slot::Empty;
                    } else {
                        origin.0 -= 1;
                    }
                }
            }
        }
    }

    /// Drop logical column 0 along with any spans starting in it
    pub fn drop_first_column(&mut self) {
        if !self.column_styles.is_empty() {
            self.column_styles.remove(0);
        }

        for row in &mut self.rows {
            if row.is_empty() {
                continue;
            }
            row.remove(0);
            for slot in row.iter_mut() {
                if let Slot::Covered { origin } = slot {
                    if origin.1 == 0 {
                        *slot = Slot::Empty;
                    } else {
                        origin.1 -= 1;
                    }
                }
            }
        }
    }

    /// Cell text in grid shape; covered and empty positions are `""`
    #[must_use]
    pub fn data(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| match slot {
                        Slot::Cell(cell) => cell.text.clone(),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Source cells in row-major order with their positions
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &SourceCell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, slot)| match slot {
                Slot::Cell(cell) => Some((r, c, cell)),
                _ => None,
            })
        })
    }

    /// Class counts over the source cells of each row
    #[must_use]
    pub fn row_class_tallies(&self) -> Vec<ClassTally> {
        let mut tallies = vec![ClassTally::default(); self.rows.len()];
        for (r, _, cell) in self.cells() {
            tallies[r].record(cell);
        }
        tallies
    }

    /// Class counts over the source cells of each column
    #[must_use]
    pub fn column_class_tallies(&self) -> Vec<ClassTally> {
        let mut tallies = vec![ClassTally::default(); self.column_count()];
        for (_, c, cell) in self.cells() {
            tallies[c].record(cell);
        }
        tallies
    }
}

/// How many source cells a row or column has, and how often each class occurs
#[derive(Debug, Clone, Default)]
pub struct ClassTally {
    pub cells: usize,
    pub classes: HashMap<String, usize>,
}

impl ClassTally {
    fn record(&mut self, cell: &SourceCell) {
        self.cells += 1;
        for class in &cell.classes {
            *self.classes.entry(class.clone()).or_insert(0) += 1;
        }
    }

    /// Whether `class` is present on every cell (and there is at least one)
    #[must_use]
    pub fn is_uniform(&self, class: &str) -> bool {
        self.cells > 0 && self.classes.get(class) == Some(&self.cells)
    }
}

fn span_attribute(element: ElementRef<'_>, name: &str, max: usize) -> usize {
    element
        .value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(1)
        .min(max)
}

fn place(row: &mut Vec<Slot>, column: usize, slot: Slot) {
    if row.len() <= column {
        row.resize(column + 1, Slot::Empty);
    }
    // First writer wins where overlapping spans collide
    if row[column] == Slot::Empty {
        row[column] = slot;
    }
}
