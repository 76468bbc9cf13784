//! Raw grid data structures.
//!
//! This module defines the pre-normalization representation of a worksheet:
//! - [`CellValue`]: a typed scalar with a deterministic display form
//! - [`Grid`]: a sparse 2D grid of values inside a bounding rectangle
//!
//! The display form is the string every downstream comparison operates on:
//! composite keys, substitution results, and cell equality are all defined
//! over `CellValue::display_form`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed cell value as read from a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// The deterministic string form used for key building and comparison.
    ///
    /// Numbers with no fractional part render without a decimal point, so a
    /// key over an ID column reads `2_b` rather than `2.0_b`. Booleans render
    /// in the spreadsheet display form `TRUE`/`FALSE`.
    pub fn display_form(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let CellValue::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_form())
    }
}

fn format_number(n: f64) -> String {
    // 2^53 is the largest range where f64 holds exact integers.
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A sparse 2D grid of cell values.
///
/// `nrows`/`ncols` describe the bounding rectangle; positions without an
/// entry are empty cells. Inserting outside the current bounds grows them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    pub nrows: u32,
    pub ncols: u32,
    cells: HashMap<(u32, u32), CellValue>,
}

impl Grid {
    pub fn new(nrows: u32, ncols: u32) -> Grid {
        Grid {
            nrows,
            ncols,
            cells: HashMap::new(),
        }
    }

    pub fn insert_cell(&mut self, row: u32, col: u32, value: CellValue) {
        self.nrows = self.nrows.max(row + 1);
        self.ncols = self.ncols.max(col + 1);
        self.cells.insert((row, col), value);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
