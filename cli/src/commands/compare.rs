use crate::output::{json, text};
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use log::debug;
use sheet_recon::{ReconConfig, ReconSession, SubstitutionMap};
use std::io;
use std::path::Path;
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    left_dir: &str,
    right_dir: &str,
    out_dir: &str,
    keys: &str,
    header_row: u32,
    replace_file: Option<&str>,
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
) -> Result<ExitCode> {
    if quiet && verbose {
        bail!("Cannot use both --quiet and --verbose flags together");
    }

    let key_columns: Vec<String> = keys
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if key_columns.is_empty() {
        bail!("--keys must name at least one column");
    }

    let verbosity = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let substitutions = match replace_file {
        Some(path) => SubstitutionMap::load(path)
            .with_context(|| format!("Failed to read replacement file: {}", path))?,
        None => SubstitutionMap::empty(),
    };

    let config = ReconConfig::builder()
        .key_columns(key_columns)
        .header_row(header_row)
        .build();
    debug!(
        "comparing '{}' against '{}' on keys {:?} ({} substitutions)",
        left_dir,
        right_dir,
        config.key_columns,
        substitutions.len()
    );
    let session = ReconSession::new(config);
    let outcome = session.run(
        Path::new(left_dir),
        Path::new(right_dir),
        Path::new(out_dir),
        &substitutions,
    )?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => text::write_text_report(&mut handle, &outcome, verbosity)?,
        OutputFormat::Json => json::write_json_report(&mut handle, &outcome)?,
    }

    if outcome.report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
