#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/encore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;

// Re-export main types from sub-crates
pub use encore_data as data;
pub use encore_output as output;
pub use encore_rank as rank;
pub use encore_scoring as scoring;

pub use config::{DEFAULT_MIN_MEDIA_SPEND, DEFAULT_TOP_N, EngineConfig};
pub use engine::{Inspection, MatchEngine, MatchRun, Rejection};
pub use error::{EngineError, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
