mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use sheet_recon::{ContainerError, GridParseError, ReconError};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheet-recon")]
#[command(about = "Reconcile two spreadsheet tables by key and flag mismatches")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare the first file in each of two folders")]
    Compare {
        #[arg(help = "Folder holding the reference (left) file")]
        left_dir: String,
        #[arg(help = "Folder holding the file to check (right)")]
        right_dir: String,
        #[arg(help = "Folder where the annotated result is saved")]
        out_dir: String,
        #[arg(
            long,
            help = "Key columns matched by header label (comma-separated, e.g. ID,Note)"
        )]
        keys: String,
        #[arg(
            long,
            default_value_t = 0,
            value_name = "N",
            help = "Zero-based row of the header labels"
        )]
        header_row: u32,
        #[arg(
            long,
            value_name = "PATH",
            help = "File of NAME=REPLACEMENT lines applied to right-hand values"
        )]
        replace_file: Option<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: show additional details")]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            left_dir,
            right_dir,
            out_dir,
            keys,
            header_row,
            replace_file,
            format,
            quiet,
            verbose,
        } => commands::compare::run(
            &left_dir,
            &right_dir,
            &out_dir,
            &keys,
            header_row,
            replace_file.as_deref(),
            format,
            quiet,
            verbose,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_internal_error(err) {
        ExitCode::from(3)
    } else {
        ExitCode::from(2)
    }
}

fn is_internal_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(recon_err) = cause.downcast_ref::<ReconError>() {
            return matches!(
                recon_err,
                ReconError::Sink { .. } | ReconError::Container(_) | ReconError::Parse(_)
            );
        }
        cause.is::<ContainerError>() || cause.is::<GridParseError>()
    })
}
