//! Full runs over real files on disk: discovery, parsing, diff, annotation.

mod common;

use rust_xlsxwriter::{Format, Workbook};
use sheet_recon::{
    open_first_sheet, ReconConfig, ReconError, ReconSession, SubstitutionMap,
};
use std::path::Path;
use tempfile::TempDir;

fn write_sheet(dir: &Path, name: &str, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(r as u32, c as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save(dir.join(name)).unwrap();
}

fn session(keys: &[&str]) -> ReconSession {
    let config = ReconConfig::builder()
        .key_columns(keys.iter().map(|k| k.to_string()))
        .build();
    ReconSession::new(config)
}

#[test]
fn clean_run_saves_a_result_file_and_reports_zero() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let rows: &[&[&str]] = &[&["ID", "Note"], &["1", "a"]];
    write_sheet(left.path(), "old.xlsx", rows);
    write_sheet(right.path(), "new.xlsx", rows);

    let outcome = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap();

    assert!(outcome.report.is_clean());
    assert!(outcome.result_path.exists());
    let name = outcome
        .result_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(name.starts_with("Result_") && name.ends_with(".xlsx"));
    assert_eq!(outcome.left_file, left.path().join("old.xlsx"));
    assert_eq!(outcome.right_file, right.path().join("new.xlsx"));
}

#[test]
fn composite_key_run_counts_mismatches_and_unmatched_rows() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    write_sheet(
        left.path(),
        "old.xlsx",
        &[&["ID", "Note", "Amt"], &["1", "a", "10"]],
    );
    write_sheet(
        right.path(),
        "new.xlsx",
        &[
            &["ID", "Note", "Amt"],
            &["1", "a", "11"],
            &["2", "b", "20"],
        ],
    );

    let outcome = session(&["ID", "Note"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap();

    assert_eq!(outcome.report.cell_mismatches, 1);
    assert_eq!(outcome.report.rows_missing, 1);
}

#[test]
fn substitutions_apply_to_the_right_file_only() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    write_sheet(left.path(), "old.xlsx", &[&["ID", "Name"], &["1", "Acme Corp"]]);
    write_sheet(right.path(), "new.xlsx", &[&["ID", "Name"], &["1", "Acme"]]);

    let subs = SubstitutionMap::parse("Acme=Acme Corp\n");
    let outcome = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &subs)
        .unwrap();

    assert!(outcome.report.is_clean());
}

#[test]
fn merged_cells_in_the_input_fill_down_before_comparison() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    // Left file spells the group out on every row; the right file merges
    // B2:B3 so only the anchor cell carries the value on disk.
    write_sheet(
        left.path(),
        "old.xlsx",
        &[&["ID", "Group"], &["1", "g"], &["2", "g"]],
    );

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "ID").unwrap();
    worksheet.write_string(0, 1, "Group").unwrap();
    worksheet.write_string(1, 0, "1").unwrap();
    worksheet.write_string(2, 0, "2").unwrap();
    worksheet.merge_range(1, 1, 2, 1, "g", &Format::new()).unwrap();
    workbook.save(right.path().join("new.xlsx")).unwrap();

    let outcome = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap();

    assert!(outcome.report.is_clean());
}

#[test]
fn annotated_copy_preserves_the_right_file_contents() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    write_sheet(left.path(), "old.xlsx", &[&["ID", "Amt"], &["1", "10"]]);
    write_sheet(right.path(), "new.xlsx", &[&["ID", "Amt"], &["1", "99"]]);

    let outcome = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap();

    assert_eq!(outcome.report.cell_mismatches, 1);
    let annotated = open_first_sheet(&outcome.result_path).unwrap();
    assert_eq!(
        annotated.get(1, 1).and_then(|c| c.as_text()),
        Some("99"),
        "annotation must flag, not rewrite"
    );
}

#[test]
fn empty_input_directory_is_a_user_error() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    write_sheet(right.path(), "new.xlsx", &[&["ID"], &["1"]]);

    let err = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap_err();

    assert!(matches!(err, ReconError::NoInputFile { .. }));
    assert_eq!(err.code(), "SHRECON_INPUT_001");
    // Nothing may be written on failure.
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn missing_key_column_aborts_before_any_output() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    write_sheet(left.path(), "old.xlsx", &[&["ID"], &["1"]]);
    write_sheet(right.path(), "new.xlsx", &[&["ID"], &["1"]]);

    let err = session(&["Nope"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap_err();

    assert!(matches!(err, ReconError::MissingKeyColumn { .. }));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn non_spreadsheet_input_is_rejected() {
    let left = TempDir::new().unwrap();
    let right = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    std::fs::write(left.path().join("notes.txt"), "not a workbook").unwrap();
    write_sheet(right.path(), "new.xlsx", &[&["ID"], &["1"]]);

    let err = session(&["ID"])
        .run(left.path(), right.path(), out.path(), &SubstitutionMap::empty())
        .unwrap_err();

    assert!(matches!(err, ReconError::Container(_)));
}
