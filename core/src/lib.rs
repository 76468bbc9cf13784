//! Sheet Recon: key-based reconciliation of spreadsheet tables.
//!
//! This crate provides functionality for:
//! - Opening and parsing spreadsheet workbooks (`.xlsx` files)
//! - Normalizing the first worksheet into a logical table under a header row
//! - Matching rows across two tables by a composite key
//! - Reporting cell-level mismatches after value substitution
//! - Saving an annotated copy of the right-hand file with mismatches flagged
//!
//! # Quick Start
//!
//! ```ignore
//! use sheet_recon::{ReconConfig, ReconSession, SubstitutionMap};
//!
//! let config = ReconConfig::builder()
//!     .key_columns(["ID", "Note"])
//!     .build();
//! let session = ReconSession::new(config);
//! let outcome = session.run(
//!     "old/".as_ref(),
//!     "new/".as_ref(),
//!     "out/".as_ref(),
//!     &SubstitutionMap::empty(),
//! )?;
//!
//! for record in &outcome.report.records {
//!     println!("{:?}", record);
//! }
//! ```

mod addressing;
mod annotate;
mod config;
mod container;
mod discover;
mod engine;
pub(crate) mod error_codes;
mod grid;
mod grid_parser;
mod key;
mod report;
mod session;
mod sink;
mod subst;
mod table;
mod workbook;

pub use addressing::{cell_ref, column_label, parse_cell_ref};
pub use annotate::{AnnotationSink, FLAG_FILL_RGB};
pub use config::{ReconConfig, ReconConfigBuilder};
pub use container::{ContainerError, ContainerLimits, PackageContainer};
pub use discover::first_file_in_dir;
pub use engine::{diff, diff_with_sink};
pub use grid::{CellValue, Grid};
pub use grid_parser::{expand_merged_regions, GridParseError, MergedRange, SheetDescriptor};
pub use key::{KeyedTable, build_key, NULL_KEY_SENTINEL};
pub use report::{MismatchRecord, ReconError, ReconReport, ReconSummary, TableSide};
pub use session::{ReconOutcome, ReconSession};
pub use sink::{CallbackSink, MismatchSink, VecSink};
pub use subst::SubstitutionMap;
pub use table::{LogicalTable, TableRow};
pub use workbook::open_first_sheet;
