//! Grid normalization into logical tables.
//!
//! A [`LogicalTable`] is the header-resolved view of a raw grid: the row at
//! `header_row` becomes the column labels, everything above it is discarded,
//! and each remaining row remembers its original 1-based spreadsheet row so
//! the annotation sink writes flags to the right place.

use crate::grid::{CellValue, Grid};
use crate::report::ReconError;

/// One data row of a logical table.
///
/// Cells are positionally aligned to the table's column labels. Empty cells
/// stay `None` here; null-to-empty-string normalization is the diff engine's
/// job, so other consumers can still see raw blanks.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// 1-based row number in the source spreadsheet.
    pub sheet_row: u32,
    cells: Vec<Option<CellValue>>,
}

impl TableRow {
    pub fn new(sheet_row: u32, cells: Vec<Option<CellValue>>) -> TableRow {
        TableRow { sheet_row, cells }
    }

    pub fn get(&self, col: usize) -> Option<&CellValue> {
        self.cells.get(col).and_then(|c| c.as_ref())
    }

    pub fn cells(&self) -> &[Option<CellValue>] {
        &self.cells
    }
}

/// An ordered, header-resolved table.
///
/// Column labels are not required to be unique; [`column_index`]
/// (LogicalTable::column_index) uses first-match semantics when they repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl LogicalTable {
    pub fn new(columns: Vec<String>) -> LogicalTable {
        LogicalTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Resolve a raw grid against a zero-based header row index.
    ///
    /// Rows at indices `<= header_row` are discarded. Each surviving row's
    /// `sheet_row` is `header_row + 2 + logical_index` (1-based spreadsheet
    /// rows, plus the header itself) — a hard contract with the annotation
    /// sink, not an implementation detail.
    pub fn from_grid(grid: &Grid, header_row: u32) -> Result<LogicalTable, ReconError> {
        if header_row >= grid.nrows {
            return Err(ReconError::malformed(format!(
                "header row index {header_row} is out of range for a grid with {} rows",
                grid.nrows
            )));
        }

        let columns: Vec<String> = (0..grid.ncols)
            .map(|col| {
                grid.get(header_row, col)
                    .map(CellValue::display_form)
                    .unwrap_or_default()
            })
            .collect();

        let mut table = LogicalTable::new(columns);
        for row in (header_row + 1)..grid.nrows {
            let cells = (0..grid.ncols).map(|col| grid.get(row, col).cloned()).collect();
            // 1-based spreadsheet numbering: row index + 1.
            table.push_row(row + 1, cells);
        }

        Ok(table)
    }

    /// Append a data row. Cells must be positionally aligned to `columns()`.
    pub fn push_row(&mut self, sheet_row: u32, cells: Vec<Option<CellValue>>) {
        debug_assert_eq!(
            cells.len(),
            self.columns.len(),
            "row width must match the column label count"
        );
        self.rows.push(TableRow::new(sheet_row, cells));
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// First-match column lookup by label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }
}
