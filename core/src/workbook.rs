//! Opening a spreadsheet file into a raw grid.
//!
//! Resolves shared strings, the workbook sheet list, and relationships, then
//! parses the first sheet only and expands its merged regions. The result is
//! the merge-free rectangular grid the normalizer expects.

use crate::container::PackageContainer;
use crate::grid::Grid;
use crate::grid_parser::{
    expand_merged_regions, parse_relationships, parse_shared_strings, parse_sheet_xml,
    parse_workbook_xml, resolve_sheet_target,
};
use crate::report::ReconError;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Open the first worksheet of an `.xlsx` file as a merge-expanded [`Grid`].
pub fn open_first_sheet(path: impl AsRef<Path>) -> Result<Grid, ReconError> {
    let path = path.as_ref();
    let mut container = PackageContainer::open_from_path(path)?;

    let shared_strings = match container.read_part_optional("xl/sharedStrings.xml")? {
        Some(bytes) => parse_shared_strings(&bytes)?,
        None => Vec::new(),
    };

    let workbook_bytes = container
        .read_part_optional("xl/workbook.xml")?
        .ok_or_else(|| ReconError::malformed(format!(
            "workbook.xml missing or unreadable in '{}'",
            path.display()
        )))?;
    let sheets = parse_workbook_xml(&workbook_bytes)?;

    let first = sheets.first().ok_or_else(|| {
        ReconError::malformed(format!("'{}' declares no sheets", path.display()))
    })?;

    let relationships = match container.read_part_optional("xl/_rels/workbook.xml.rels")? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => HashMap::new(),
    };

    let target = resolve_sheet_target(first, &relationships, 0);
    let sheet_bytes = container.read_part_optional(&target)?.ok_or_else(|| {
        ReconError::malformed(format!(
            "worksheet XML missing for sheet '{}' in '{}'",
            first.name,
            path.display()
        ))
    })?;

    let (mut grid, merges) = parse_sheet_xml(&sheet_bytes, &shared_strings)?;
    expand_merged_regions(&mut grid, &merges);

    debug!(
        "opened '{}' sheet '{}': {}x{} cells, {} merged regions expanded",
        path.display(),
        first.name,
        grid.nrows,
        grid.ncols,
        merges.len()
    );

    Ok(grid)
}
