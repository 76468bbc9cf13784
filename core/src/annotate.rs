//! The annotation sink: flagged cells become a pink-filled copy of the
//! right-hand worksheet.
//!
//! The sink collects 1-based (row, column) coordinates while records stream
//! in, then rebuilds the right-hand grid into a fresh workbook with a solid
//! fill on every flagged cell and saves it as `Result_<YYYYMMDD_HHMMSS>.xlsx`.
//! Nothing touches the filesystem until [`AnnotationSink::save`] runs, so a
//! failed comparison never leaves a partial result file behind.

use crate::grid::{CellValue, Grid};
use crate::report::{MismatchRecord, ReconError};
use crate::sink::MismatchSink;
use chrono::Local;
use log::info;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Fill color applied to flagged cells (pink).
pub const FLAG_FILL_RGB: u32 = 0xFFC0CB;

/// Collects flag coordinates and writes the annotated workbook.
pub struct AnnotationSink<'a> {
    grid: &'a Grid,
    flagged: HashSet<(u32, u32)>,
}

impl<'a> AnnotationSink<'a> {
    /// `grid` is the right-hand file's raw grid (pre-normalization, merges
    /// already expanded), so rows above the header are carried into the copy.
    pub fn new(grid: &'a Grid) -> AnnotationSink<'a> {
        AnnotationSink {
            grid,
            flagged: HashSet::new(),
        }
    }

    /// Flagged 1-based (row, column) coordinates collected so far.
    pub fn flagged(&self) -> &HashSet<(u32, u32)> {
        &self.flagged
    }

    /// Save under `dir` with the timestamped result name.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ReconError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("Result_{timestamp}.xlsx"));
        self.save_as(&path)?;
        Ok(path)
    }

    /// Save to an explicit path.
    pub fn save_as(&self, path: &Path) -> Result<(), ReconError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let flag_format = Format::new().set_background_color(FLAG_FILL_RGB);

        for row in 0..self.grid.nrows {
            for col in 0..self.grid.ncols {
                let flagged = self.flagged.contains(&(row + 1, col + 1));
                let value = self.grid.get(row, col);
                let col16 = col as u16;
                match (value, flagged) {
                    (Some(CellValue::Number(n)), true) => {
                        worksheet.write_number_with_format(row, col16, *n, &flag_format)?;
                    }
                    (Some(CellValue::Number(n)), false) => {
                        worksheet.write_number(row, col16, *n)?;
                    }
                    (Some(CellValue::Text(s)), true) => {
                        worksheet.write_string_with_format(row, col16, s, &flag_format)?;
                    }
                    (Some(CellValue::Text(s)), false) => {
                        worksheet.write_string(row, col16, s)?;
                    }
                    (Some(CellValue::Bool(b)), true) => {
                        worksheet.write_boolean_with_format(row, col16, *b, &flag_format)?;
                    }
                    (Some(CellValue::Bool(b)), false) => {
                        worksheet.write_boolean(row, col16, *b)?;
                    }
                    (None, true) => {
                        worksheet.write_blank(row, col16, &flag_format)?;
                    }
                    (None, false) => {}
                }
            }
        }

        workbook.save(path)?;
        info!(
            "annotated workbook saved to '{}' ({} flagged cells)",
            path.display(),
            self.flagged.len()
        );
        Ok(())
    }
}

impl MismatchSink for AnnotationSink<'_> {
    fn emit(&mut self, record: &MismatchRecord) -> Result<(), ReconError> {
        match record {
            MismatchRecord::CellMismatch { sheet_row, col, .. } => {
                self.flagged.insert((*sheet_row, *col));
            }
            MismatchRecord::RowMissing {
                sheet_row, ncols, ..
            } => {
                for col in 1..=*ncols {
                    self.flagged.insert((*sheet_row, col));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_mismatch_flags_one_coordinate() {
        let grid = Grid::new(1, 1);
        let mut sink = AnnotationSink::new(&grid);
        sink.emit(&MismatchRecord::CellMismatch {
            sheet_row: 7,
            col: 3,
            column: "Amt".into(),
            left: "10".into(),
            right: "12".into(),
        })
        .unwrap();
        assert_eq!(sink.flagged().len(), 1);
        assert!(sink.flagged().contains(&(7, 3)));
    }

    #[test]
    fn row_missing_flags_every_column_position() {
        let grid = Grid::new(1, 1);
        let mut sink = AnnotationSink::new(&grid);
        sink.emit(&MismatchRecord::RowMissing {
            sheet_row: 6,
            key: "2_b".into(),
            ncols: 3,
        })
        .unwrap();
        let expected: HashSet<(u32, u32)> = [(6, 1), (6, 2), (6, 3)].into_iter().collect();
        assert_eq!(sink.flagged(), &expected);
    }
}
