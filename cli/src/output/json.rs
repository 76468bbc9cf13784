use anyhow::Result;
use serde::Serialize;
use sheet_recon::{ReconOutcome, ReconReport};
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct JsonOutcome<'a> {
    result_path: &'a Path,
    report: &'a ReconReport,
}

pub fn write_json_report<W: Write>(w: &mut W, outcome: &ReconOutcome) -> Result<()> {
    let payload = JsonOutcome {
        result_path: &outcome.result_path,
        report: &outcome.report,
    };
    serde_json::to_writer_pretty(&mut *w, &payload)?;
    writeln!(w)?;
    Ok(())
}
