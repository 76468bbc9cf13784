//! The row-matching and cell-level diff engine.
//!
//! Each row of the right table is classified by its composite key: matched
//! rows get a per-column value comparison, unmatched rows emit one
//! [`MismatchRecord::RowMissing`] covering every column position. Iteration
//! order is the right table's row order, then its column order, so output is
//! fully deterministic.
//!
//! The engine is intentionally asymmetric: only the right table's column set
//! drives comparison (columns that exist only in the left table are never
//! examined), and substitutions rewrite right-hand values only. The right
//! file is the source of truth being annotated, so `diff(a, b)` and
//! `diff(b, a)` differ in general.

use crate::grid::CellValue;
use crate::key::KeyedTable;
use crate::report::{MismatchRecord, ReconError, ReconReport, ReconSummary};
use crate::sink::{MismatchSink, VecSink};
use crate::subst::SubstitutionMap;
use log::debug;

/// Run the diff, streaming records into `sink`.
///
/// A comparison is a pure function of its inputs; the engine keeps no state
/// across runs.
pub fn diff_with_sink(
    left: &KeyedTable,
    right: &KeyedTable,
    substitutions: &SubstitutionMap,
    sink: &mut dyn MismatchSink,
) -> Result<ReconSummary, ReconError> {
    sink.begin()?;

    let mut summary = ReconSummary::default();
    let right_columns = right.table().columns();
    // Resolve right labels against left once; first-match on duplicates.
    let left_indices: Vec<Option<usize>> = right_columns
        .iter()
        .map(|label| left.table().column_index(label))
        .collect();

    for (row_idx, row) in right.table().rows().iter().enumerate() {
        let key = &right.keys()[row_idx];

        let left_row = match left.lookup(key) {
            Some(found) => found,
            None => {
                debug!("row {} has no key match (key '{}')", row.sheet_row, key);
                summary.rows_missing += 1;
                sink.emit(&MismatchRecord::RowMissing {
                    sheet_row: row.sheet_row,
                    key: key.clone(),
                    ncols: right_columns.len() as u32,
                })?;
                continue;
            }
        };

        for (col_idx, label) in right_columns.iter().enumerate() {
            let left_value = left_indices[col_idx].and_then(|idx| left_row.get(idx));
            // Null and missing-column both normalize to the empty string.
            let left_str = left_value.map(CellValue::display_form).unwrap_or_default();
            let right_str = substituted_form(row.get(col_idx), substitutions);

            if left_str != right_str {
                debug!(
                    "mismatch at row {}, column '{}': '{}' vs '{}'",
                    row.sheet_row, label, left_str, right_str
                );
                summary.cell_mismatches += 1;
                sink.emit(&MismatchRecord::CellMismatch {
                    sheet_row: row.sheet_row,
                    col: col_idx as u32 + 1,
                    column: label.clone(),
                    left: left_str,
                    right: right_str,
                })?;
            }
        }
    }

    sink.finish()?;
    Ok(summary)
}

/// Run the diff and collect everything into a [`ReconReport`].
pub fn diff(
    left: &KeyedTable,
    right: &KeyedTable,
    substitutions: &SubstitutionMap,
) -> Result<ReconReport, ReconError> {
    let mut sink = VecSink::new();
    let summary = diff_with_sink(left, right, substitutions, &mut sink)?;
    Ok(ReconReport::new(
        sink.into_records(),
        summary.cell_mismatches,
        summary.rows_missing,
    ))
}

/// The comparison form of a right-hand cell: substitution first (raw text
/// values only — a rewritten value skips display coercion entirely), then
/// null-to-empty-string normalization.
fn substituted_form(value: Option<&CellValue>, substitutions: &SubstitutionMap) -> String {
    match value {
        None => String::new(),
        Some(CellValue::Text(s)) => match substitutions.get(s) {
            Some(replacement) => replacement.to_string(),
            None => s.clone(),
        },
        Some(other) => other.display_form(),
    }
}
