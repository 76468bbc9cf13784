use crate::commands::compare::Verbosity;
use anyhow::Result;
use sheet_recon::{column_label, MismatchRecord, ReconOutcome};
use std::io::Write;

pub fn write_text_report<W: Write>(
    w: &mut W,
    outcome: &ReconOutcome,
    verbosity: Verbosity,
) -> Result<()> {
    if verbosity == Verbosity::Verbose {
        writeln!(w, "Left file:  {}", outcome.left_file.display())?;
        writeln!(w, "Right file: {}", outcome.right_file.display())?;
        writeln!(w)?;
    }

    if verbosity != Verbosity::Quiet {
        for record in &outcome.report.records {
            writeln!(w, "{}", render_record(record))?;
        }
        if !outcome.report.records.is_empty() {
            writeln!(w)?;
        }
    }

    write_summary(w, outcome)?;
    Ok(())
}

fn render_record(record: &MismatchRecord) -> String {
    match record {
        MismatchRecord::CellMismatch {
            sheet_row,
            col,
            column,
            left,
            right,
        } => format!(
            "Mismatch at row {}, column {} ({}): '{}' vs '{}'",
            sheet_row,
            column_label(col.saturating_sub(1)),
            column,
            left,
            right
        ),
        MismatchRecord::RowMissing { sheet_row, key, .. } => {
            format!("Row {} with key '{}' not found in left file", sheet_row, key)
        }
        _ => format!("{:?}", record),
    }
}

fn write_summary<W: Write>(w: &mut W, outcome: &ReconOutcome) -> Result<()> {
    if outcome.report.is_clean() {
        writeln!(w, "No mismatches found.")?;
    } else {
        writeln!(
            w,
            "{} cell mismatches, {} rows only in right file.",
            outcome.report.cell_mismatches, outcome.report.rows_missing
        )?;
    }
    writeln!(w, "Result saved to {}", outcome.result_path.display())?;
    Ok(())
}
