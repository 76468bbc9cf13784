//! One-shot reconciliation runs over directories of spreadsheet files.

use crate::annotate::AnnotationSink;
use crate::config::ReconConfig;
use crate::discover::first_file_in_dir;
use crate::engine;
use crate::key::KeyedTable;
use crate::report::{ReconError, ReconReport, TableSide};
use crate::sink::MismatchSink;
use crate::subst::SubstitutionMap;
use crate::table::LogicalTable;
use crate::workbook::open_first_sheet;
use log::info;
use std::path::{Path, PathBuf};

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct ReconOutcome {
    pub report: ReconReport,
    /// Path of the saved annotated workbook.
    pub result_path: PathBuf,
    pub left_file: PathBuf,
    pub right_file: PathBuf,
}

/// Orchestrates a full comparison: discover inputs, open and normalize both
/// grids, key them, diff, and persist the annotated copy of the right file.
#[derive(Debug, Clone)]
pub struct ReconSession {
    config: ReconConfig,
}

impl ReconSession {
    pub fn new(config: ReconConfig) -> ReconSession {
        ReconSession { config }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Run one comparison. Any failure aborts before the result file is
    /// written; there is no partial output.
    pub fn run(
        &self,
        left_dir: &Path,
        right_dir: &Path,
        out_dir: &Path,
        substitutions: &SubstitutionMap,
    ) -> Result<ReconOutcome, ReconError> {
        let left_file = first_file_in_dir(left_dir)?;
        let right_file = first_file_in_dir(right_dir)?;
        info!(
            "comparing '{}' against '{}'",
            left_file.display(),
            right_file.display()
        );

        let left_grid = open_first_sheet(&left_file)?;
        let right_grid = open_first_sheet(&right_file)?;

        let left_table = LogicalTable::from_grid(&left_grid, self.config.header_row)?;
        let right_table = LogicalTable::from_grid(&right_grid, self.config.header_row)?;

        let left = KeyedTable::new(left_table, &self.config.key_columns, TableSide::Left)?;
        let right = KeyedTable::new(right_table, &self.config.key_columns, TableSide::Right)?;

        let report = engine::diff(&left, &right, substitutions)?;

        let mut annotator = AnnotationSink::new(&right_grid);
        for record in &report.records {
            annotator.emit(record)?;
        }
        let result_path = annotator.save(out_dir)?;

        info!(
            "run complete: {} cell mismatches, {} rows only in right",
            report.cell_mismatches, report.rows_missing
        );

        Ok(ReconOutcome {
            report,
            result_path,
            left_file,
            right_file,
        })
    }
}
