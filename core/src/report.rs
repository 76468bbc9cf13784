//! Mismatch records, the reconciliation report, and the crate error type.
//!
//! A reconciliation run produces a stream of [`MismatchRecord`]s plus two
//! counters. Records are transient: they are consumed by sinks (console
//! output, the annotation writer) and optionally collected into a
//! [`ReconReport`]; only the annotated workbook persists.

use crate::container::ContainerError;
use crate::error_codes;
use crate::grid_parser::GridParseError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two input tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSide {
    Left,
    Right,
}

impl std::fmt::Display for TableSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableSide::Left => f.write_str("left"),
            TableSide::Right => f.write_str("right"),
        }
    }
}

/// One unit of diff output: a discrepant cell, or a row with no key match.
///
/// `sheet_row` is the 1-based row in the original spreadsheet (the annotation
/// contract `header_row + 2 + logical_index`); `col` is the 1-based position
/// in the right table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum MismatchRecord {
    CellMismatch {
        sheet_row: u32,
        col: u32,
        column: String,
        left: String,
        right: String,
    },
    RowMissing {
        sheet_row: u32,
        key: String,
        ncols: u32,
    },
}

/// The collected result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconReport {
    /// Schema version (currently "1").
    pub version: String,
    /// Emitted records, in right-table row order then column order.
    pub records: Vec<MismatchRecord>,
    /// Number of `CellMismatch` records.
    pub cell_mismatches: u32,
    /// Number of `RowMissing` records (one per unmatched row, not per cell).
    pub rows_missing: u32,
}

impl ReconReport {
    pub const SCHEMA_VERSION: &'static str = "1";

    pub fn new(records: Vec<MismatchRecord>, cell_mismatches: u32, rows_missing: u32) -> Self {
        ReconReport {
            version: Self::SCHEMA_VERSION.to_string(),
            records,
            cell_mismatches,
            rows_missing,
        }
    }

    /// True when the two tables reconciled without a single discrepancy.
    pub fn is_clean(&self) -> bool {
        self.cell_mismatches == 0 && self.rows_missing == 0
    }
}

/// Counters emitted alongside streamed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconSummary {
    pub cell_mismatches: u32,
    pub rows_missing: u32,
}

/// Errors produced by the reconciliation APIs.
///
/// Every kind is fatal at the point of detection: the run aborts and no
/// partial result file is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconError {
    #[error("[SHRECON_INPUT_001] no input file found in directory '{dir}'")]
    NoInputFile { dir: PathBuf },

    #[error("[SHRECON_KEY_001] key column '{column}' does not exist in the {side} table")]
    MissingKeyColumn { column: String, side: TableSide },

    #[error("[SHRECON_INPUT_002] malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("[SHRECON_INPUT_003] I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Parse(#[from] GridParseError),

    #[error("[SHRECON_ANNOTATE_001] failed to write annotated workbook: {0}")]
    Annotate(#[from] rust_xlsxwriter::XlsxError),

    #[error("[SHRECON_SINK_001] sink error: {message}")]
    Sink { message: String },
}

impl ReconError {
    pub fn code(&self) -> &'static str {
        match self {
            ReconError::NoInputFile { .. } => error_codes::INPUT_NO_FILE,
            ReconError::MissingKeyColumn { .. } => error_codes::KEY_MISSING_COLUMN,
            ReconError::MalformedInput { .. } => error_codes::INPUT_MALFORMED,
            ReconError::Io(_) => error_codes::INPUT_IO,
            ReconError::Container(e) => e.code(),
            ReconError::Parse(e) => e.code(),
            ReconError::Annotate(_) => error_codes::ANNOTATE_WRITE,
            ReconError::Sink { .. } => error_codes::SINK,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> ReconError {
        ReconError::MalformedInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_clean_only_with_zero_counters() {
        let clean = ReconReport::new(Vec::new(), 0, 0);
        assert!(clean.is_clean());

        let dirty = ReconReport::new(Vec::new(), 1, 0);
        assert!(!dirty.is_clean());
    }

    #[test]
    fn missing_key_column_names_column_and_side() {
        let err = ReconError::MissingKeyColumn {
            column: "ID".into(),
            side: TableSide::Right,
        };
        let msg = err.to_string();
        assert!(msg.contains("'ID'"), "message should name the column: {msg}");
        assert!(msg.contains("right"), "message should name the table: {msg}");
        assert_eq!(err.code(), "SHRECON_KEY_001");
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let record = MismatchRecord::RowMissing {
            sheet_row: 7,
            key: "2_b".into(),
            ncols: 3,
        };
        let json = serde_json::to_string(&record).expect("record should serialize");
        assert!(json.contains("\"kind\":\"RowMissing\""), "{json}");
    }
}
