//! Composite key construction and keyed row indexing.
//!
//! Each row's join key is the underscore-joined display form of its key
//! columns. Empty key fields use the fixed sentinel `"None"`, which keeps a
//! blank field distinct from an empty text field. No escaping is performed,
//! so a value that itself contains `_` can in principle collide with another
//! row's key tuple.

use crate::grid::CellValue;
use crate::report::{ReconError, TableSide};
use crate::table::{LogicalTable, TableRow};
use std::collections::HashMap;

/// String used for a missing value in a key column.
pub const NULL_KEY_SENTINEL: &str = "None";

const KEY_SEPARATOR: char = '_';

/// Build one row's composite key from resolved key column indices.
pub fn build_key(row: &TableRow, key_indices: &[usize]) -> String {
    let mut parts = Vec::with_capacity(key_indices.len());
    for &idx in key_indices {
        match row.get(idx) {
            Some(value) => parts.push(value.display_form()),
            None => parts.push(NULL_KEY_SENTINEL.to_string()),
        }
    }
    parts.join(&KEY_SEPARATOR.to_string())
}

/// A logical table with a precomputed key per row and a key -> row index.
///
/// Index construction is a single pass over the rows; when two rows share a
/// key, the later row silently overwrites the earlier one. Last-row-wins is
/// part of the lookup contract, not an accident of insertion order.
#[derive(Debug, Clone)]
pub struct KeyedTable {
    table: LogicalTable,
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl KeyedTable {
    /// Key the table on `key_columns`, resolved against the table's labels.
    ///
    /// Fails with [`ReconError::MissingKeyColumn`] naming the offending
    /// column and table before any key is built.
    pub fn new(
        table: LogicalTable,
        key_columns: &[String],
        side: TableSide,
    ) -> Result<KeyedTable, ReconError> {
        let mut key_indices = Vec::with_capacity(key_columns.len());
        for column in key_columns {
            let idx = table.column_index(column).ok_or_else(|| {
                ReconError::MissingKeyColumn {
                    column: column.clone(),
                    side,
                }
            })?;
            key_indices.push(idx);
        }

        let mut keys = Vec::with_capacity(table.rows().len());
        let mut index = HashMap::with_capacity(table.rows().len());
        for (row_idx, row) in table.rows().iter().enumerate() {
            let key = build_key(row, &key_indices);
            index.insert(key.clone(), row_idx);
            keys.push(key);
        }

        Ok(KeyedTable { table, keys, index })
    }

    pub fn table(&self) -> &LogicalTable {
        &self.table
    }

    /// Per-row keys, parallel to `table().rows()`.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Look up the effective row for a key (last row wins on duplicates).
    pub fn lookup(&self, key: &str) -> Option<&TableRow> {
        self.index.get(key).map(|&idx| &self.table.rows()[idx])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}
