//! XML parsing for worksheet grids.
//!
//! Parses worksheet XML, shared strings, the workbook sheet list, and
//! relationship files into [`Grid`] data, and expands merged-cell regions so
//! every cell in a previously merged range carries the top-left value. The
//! normalizer and diff engine assume a fully rectangular, merge-free grid.

use crate::addressing::parse_cell_ref;
use crate::grid::{CellValue, Grid};
use crate::error_codes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GridParseError {
    #[error("[SHRECON_PARSE_001] XML parse error: {0}")]
    XmlError(String),
    #[error("[SHRECON_PARSE_002] invalid cell reference: {0}")]
    InvalidReference(String),
    #[error("[SHRECON_PARSE_003] shared string index {0} out of bounds")]
    SharedStringOutOfBounds(usize),
}

impl GridParseError {
    pub fn code(&self) -> &'static str {
        match self {
            GridParseError::XmlError(_) => error_codes::PARSE_XML,
            GridParseError::InvalidReference(_) => error_codes::PARSE_ADDRESS,
            GridParseError::SharedStringOutOfBounds(_) => error_codes::PARSE_SHARED_STRING,
        }
    }
}

pub struct SheetDescriptor {
    pub name: String,
    pub rel_id: Option<String>,
    pub sheet_id: Option<u32>,
}

/// A merged-cell region in zero-based inclusive coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergedRange {
    /// Parse a `ref` attribute like `A1:B3`. A single-cell ref merges nothing
    /// but is accepted.
    pub fn from_ref(reference: &str) -> Option<MergedRange> {
        let mut parts = reference.split(':');
        let start = parts.next()?;
        let end = parts.next().unwrap_or(start);
        let (first_row, first_col) = parse_cell_ref(start)?;
        let (last_row, last_col) = parse_cell_ref(end)?;
        if last_row < first_row || last_col < first_col {
            return None;
        }
        Some(MergedRange {
            first_row,
            first_col,
            last_row,
            last_col,
        })
    }
}

pub fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"si" => {
                current.clear();
                in_si = true;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" && in_si => {
                let text = reader
                    .read_text(e.name())
                    .map_err(|e| GridParseError::XmlError(e.to_string()))?
                    .into_owned();
                current.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"si" => {
                strings.push(current.clone());
                in_si = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

pub fn parse_workbook_xml(xml: &[u8]) -> Result<Vec<SheetDescriptor>, GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                let mut sheet_id = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| GridParseError::XmlError(e.to_string()))?;
                    match attr.key.as_ref() {
                        b"name" => {
                            name = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        b"sheetId" => {
                            let parsed = attr.unescape_value().map_err(to_xml_err)?;
                            sheet_id = parsed.parse::<u32>().ok();
                        }
                        b"r:id" => {
                            rel_id = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    sheets.push(SheetDescriptor {
                        name,
                        rel_id,
                        sheet_id,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

pub fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut map = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| GridParseError::XmlError(e.to_string()))?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned()),
                        b"Target" => {
                            target = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        b"Type" => {
                            rel_type = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.contains("worksheet") {
                        map.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

pub fn resolve_sheet_target(
    sheet: &SheetDescriptor,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    if let Some(rel_id) = &sheet.rel_id {
        if let Some(target) = relationships.get(rel_id) {
            return normalize_target(target);
        }
    }

    let guessed = sheet
        .sheet_id
        .map(|id| format!("xl/worksheets/sheet{id}.xml"))
        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", index + 1));
    normalize_target(&guessed)
}

fn normalize_target(target: &str) -> String {
    let trimmed = target.trim_start_matches('/');
    if trimmed.starts_with("xl/") {
        trimmed.to_string()
    } else {
        format!("xl/{trimmed}")
    }
}

/// Parse one worksheet's XML into a grid plus its merged regions.
pub fn parse_sheet_xml(
    xml: &[u8],
    shared_strings: &[String],
) -> Result<(Grid, Vec<MergedRange>), GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut dimension_hint: Option<(u32, u32)> = None;
    let mut cells: Vec<(u32, u32, CellValue)> = Vec::new();
    let mut merges: Vec<MergedRange> = Vec::new();
    let mut max_row: Option<u32> = None;
    let mut max_col: Option<u32> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"dimension" => {
                if let Some(r) = get_attr_value(&e, b"ref")? {
                    dimension_hint = dimension_from_ref(&r);
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"c" => {
                let owned = e.into_owned();
                if let Some((row, col, value)) = parse_cell(&mut reader, owned, shared_strings)? {
                    max_row = Some(max_row.map_or(row, |r| r.max(row)));
                    max_col = Some(max_col.map_or(col, |c| c.max(col)));
                    cells.push((row, col, value));
                }
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"mergeCell" => {
                if let Some(r) = get_attr_value(&e, b"ref")? {
                    let range = MergedRange::from_ref(&r)
                        .ok_or_else(|| GridParseError::InvalidReference(r.clone()))?;
                    merges.push(range);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    let mut nrows = dimension_hint.map(|(r, _)| r).unwrap_or(0);
    let mut ncols = dimension_hint.map(|(_, c)| c).unwrap_or(0);
    if let Some(max_r) = max_row {
        nrows = nrows.max(max_r + 1);
    }
    if let Some(max_c) = max_col {
        ncols = ncols.max(max_c + 1);
    }
    for merge in &merges {
        nrows = nrows.max(merge.last_row + 1);
        ncols = ncols.max(merge.last_col + 1);
    }

    let mut grid = Grid::new(nrows, ncols);
    for (row, col, value) in cells {
        grid.insert_cell(row, col, value);
    }

    Ok((grid, merges))
}

/// Copy each merged region's top-left value into every covered cell.
///
/// Regions whose top-left cell is empty leave the region empty. Later regions
/// overwrite earlier ones where they overlap, matching document order.
pub fn expand_merged_regions(grid: &mut Grid, merges: &[MergedRange]) {
    for merge in merges {
        let top_left = grid.get(merge.first_row, merge.first_col).cloned();
        let value = match top_left {
            Some(v) => v,
            None => continue,
        };
        for row in merge.first_row..=merge.last_row {
            for col in merge.first_col..=merge.last_col {
                grid.insert_cell(row, col, value.clone());
            }
        }
    }
}

fn parse_cell(
    reader: &mut Reader<&[u8]>,
    start: BytesStart<'_>,
    shared_strings: &[String],
) -> Result<Option<(u32, u32, CellValue)>, GridParseError> {
    let reference = get_attr_value(&start, b"r")?
        .ok_or_else(|| GridParseError::XmlError("cell missing reference".into()))?;
    let (row, col) =
        parse_cell_ref(&reference).ok_or_else(|| GridParseError::InvalidReference(reference))?;

    let cell_type = get_attr_value(&start, b"t")?;

    let mut value_text: Option<String> = None;
    let mut inline_text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"v" => {
                let text = reader
                    .read_text(e.name())
                    .map_err(|e| GridParseError::XmlError(e.to_string()))?
                    .into_owned();
                value_text = Some(text);
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"f" => {
                // Formula text is irrelevant to value reconciliation; skip it.
                reader
                    .read_text(e.name())
                    .map_err(|e| GridParseError::XmlError(e.to_string()))?;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"is" => {
                inline_text = Some(read_inline_string(reader)?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == start.name().as_ref() => break,
            Ok(Event::Eof) => {
                return Err(GridParseError::XmlError("unexpected EOF inside cell".into()));
            }
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    let value = match inline_text {
        Some(text) => Some(CellValue::Text(text)),
        None => convert_value(value_text.as_deref(), cell_type.as_deref(), shared_strings)?,
    };

    Ok(value.map(|v| (row, col, v)))
}

fn read_inline_string(reader: &mut Reader<&[u8]>) -> Result<String, GridParseError> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => {
                let text = reader
                    .read_text(e.name())
                    .map_err(|e| GridParseError::XmlError(e.to_string()))?
                    .into_owned();
                value.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"is" => break,
            Ok(Event::Eof) => {
                return Err(GridParseError::XmlError(
                    "unexpected EOF inside inline string".into(),
                ));
            }
            Err(e) => return Err(GridParseError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(value)
}

fn convert_value(
    value_text: Option<&str>,
    cell_type: Option<&str>,
    shared_strings: &[String],
) -> Result<Option<CellValue>, GridParseError> {
    let raw = match value_text {
        Some(t) => t,
        None => return Ok(None),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Some(CellValue::Text(String::new())));
    }

    match cell_type {
        Some("s") => {
            let idx = trimmed
                .parse::<usize>()
                .map_err(|e| GridParseError::XmlError(e.to_string()))?;
            let text = shared_strings
                .get(idx)
                .ok_or(GridParseError::SharedStringOutOfBounds(idx))?;
            Ok(Some(CellValue::Text(text.clone())))
        }
        Some("b") => Ok(match trimmed {
            "1" => Some(CellValue::Bool(true)),
            "0" => Some(CellValue::Bool(false)),
            _ => None,
        }),
        // Error cells carry their display token (#DIV/0! etc.) as text.
        Some("e") => Ok(Some(CellValue::Text(trimmed.to_string()))),
        Some("str") | Some("inlineStr") => Ok(Some(CellValue::Text(trimmed.to_string()))),
        _ => {
            if let Ok(n) = trimmed.parse::<f64>() {
                Ok(Some(CellValue::Number(n)))
            } else {
                Ok(Some(CellValue::Text(trimmed.to_string())))
            }
        }
    }
}

fn dimension_from_ref(reference: &str) -> Option<(u32, u32)> {
    let range = MergedRange::from_ref(reference)?;
    let height = range.last_row.checked_sub(range.first_row)?.checked_add(1)?;
    let width = range.last_col.checked_sub(range.first_col)?.checked_add(1)?;
    Some((height, width))
}

fn get_attr_value(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, GridParseError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| GridParseError::XmlError(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value().map_err(to_xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

fn to_xml_err(err: quick_xml::Error) -> GridParseError {
    GridParseError::XmlError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_strings_rich_text_flattens_runs() {
        let xml = br#"<?xml version="1.0"?>
<sst>
  <si>
    <r><t>Hello</t></r>
    <r><t xml:space="preserve"> World</t></r>
  </si>
</sst>"#;
        let strings = parse_shared_strings(xml).expect("shared strings should parse");
        assert_eq!(strings, vec!["Hello World".to_string()]);
    }

    #[test]
    fn convert_value_dispatches_on_cell_type() {
        assert_eq!(
            convert_value(Some("1"), Some("b"), &[]).unwrap(),
            Some(CellValue::Bool(true))
        );
        assert_eq!(
            convert_value(Some("12.5"), None, &[]).unwrap(),
            Some(CellValue::Number(12.5))
        );
        let shared = vec!["hello".to_string()];
        assert_eq!(
            convert_value(Some("0"), Some("s"), &shared).unwrap(),
            Some(CellValue::Text("hello".into()))
        );
    }

    #[test]
    fn convert_value_trims_formula_strings_like_untyped_text() {
        assert_eq!(
            convert_value(Some("  padded  "), Some("str"), &[]).unwrap(),
            Some(CellValue::Text("padded".into()))
        );
        assert_eq!(
            convert_value(Some("  padded  "), None, &[]).unwrap(),
            Some(CellValue::Text("padded".into()))
        );
    }

    #[test]
    fn convert_value_shared_string_out_of_bounds_errors() {
        let shared = vec!["only".to_string()];
        let err = convert_value(Some("5"), Some("s"), &shared)
            .expect_err("invalid shared string index should error");
        assert!(matches!(err, GridParseError::SharedStringOutOfBounds(5)));
    }

    #[test]
    fn merged_range_parses_two_cell_ref() {
        let range = MergedRange::from_ref("A1:B3").expect("range should parse");
        assert_eq!(
            range,
            MergedRange {
                first_row: 0,
                first_col: 0,
                last_row: 2,
                last_col: 1
            }
        );
    }

    #[test]
    fn merged_range_rejects_inverted_ref() {
        assert!(MergedRange::from_ref("B3:A1").is_none());
    }

    #[test]
    fn expand_merged_regions_copies_top_left_value() {
        let mut grid = Grid::new(3, 2);
        grid.insert_cell(0, 0, CellValue::Text("hdr".into()));
        let merges = [MergedRange {
            first_row: 0,
            first_col: 0,
            last_row: 2,
            last_col: 1,
        }];

        expand_merged_regions(&mut grid, &merges);

        for row in 0..3 {
            for col in 0..2 {
                assert_eq!(
                    grid.get(row, col),
                    Some(&CellValue::Text("hdr".into())),
                    "cell ({row},{col}) should carry the merged value"
                );
            }
        }
    }

    #[test]
    fn expand_merged_regions_leaves_empty_region_empty() {
        let mut grid = Grid::new(2, 2);
        let merges = [MergedRange {
            first_row: 0,
            first_col: 0,
            last_row: 1,
            last_col: 1,
        }];

        expand_merged_regions(&mut grid, &merges);
        assert!(grid.is_empty());
    }

    #[test]
    fn sheet_xml_with_merge_cells_parses_grid_and_ranges() {
        let xml = br#"<?xml version="1.0"?>
<worksheet>
  <dimension ref="A1:B2"/>
  <sheetData>
    <row r="1">
      <c r="A1" t="inlineStr"><is><t>Region</t></is></c>
    </row>
    <row r="2">
      <c r="B2"><v>42</v></c>
    </row>
  </sheetData>
  <mergeCells count="1"><mergeCell ref="A1:A2"/></mergeCells>
</worksheet>"#;
        let (grid, merges) = parse_sheet_xml(xml, &[]).expect("sheet should parse");
        assert_eq!(grid.nrows, 2);
        assert_eq!(grid.ncols, 2);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Text("Region".into())));
        assert_eq!(grid.get(1, 1), Some(&CellValue::Number(42.0)));
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].last_row, 1);
    }
}
