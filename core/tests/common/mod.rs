//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sheet_recon::{CellValue, Grid, KeyedTable, LogicalTable, TableSide};

pub fn text(s: &str) -> Option<CellValue> {
    Some(CellValue::Text(s.to_string()))
}

pub fn num(n: f64) -> Option<CellValue> {
    Some(CellValue::Number(n))
}

/// Build a grid from string values laid out row by row, starting at the
/// top left. Empty strings leave the cell unset.
pub fn grid_from_strings(values: &[&[&str]]) -> Grid {
    let nrows = values.len() as u32;
    let ncols = if nrows == 0 {
        0
    } else {
        values[0].len() as u32
    };

    let mut grid = Grid::new(nrows, ncols);
    for (r, row_vals) in values.iter().enumerate() {
        for (c, v) in row_vals.iter().enumerate() {
            if !v.is_empty() {
                grid.insert_cell(r as u32, c as u32, CellValue::Text(v.to_string()));
            }
        }
    }

    grid
}

/// Build a logical table directly from column labels and row values.
/// Sheet rows are numbered as if the header sat on spreadsheet row 1.
pub fn table_from_strings(columns: &[&str], rows: &[&[&str]]) -> LogicalTable {
    let mut table = LogicalTable::new(columns.iter().map(|c| c.to_string()).collect());
    for (i, row) in rows.iter().enumerate() {
        let cells = row
            .iter()
            .map(|v| if v.is_empty() { None } else { text(v) })
            .collect();
        table.push_row(i as u32 + 2, cells);
    }
    table
}

pub fn keyed(columns: &[&str], rows: &[&[&str]], keys: &[&str], side: TableSide) -> KeyedTable {
    let key_columns: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    KeyedTable::new(table_from_strings(columns, rows), &key_columns, side)
        .unwrap_or_else(|e| panic!("failed to key table: {e}"))
}
