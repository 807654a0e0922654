#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/encore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dictionary;
pub mod export;
pub mod run;
pub mod summary;

pub use dictionary::{ColumnDescription, DataDictionary};
pub use export::{ExportError, ExportFormat, Exporter, MatchRow, MatchTable};
pub use run::{RunFiles, export_run};
pub use summary::{RejectionRecord, RunSummary, TopMatch};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
