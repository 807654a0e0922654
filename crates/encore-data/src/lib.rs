#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/encore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod audience_text;
pub mod buckets;
pub mod error;
pub mod industry;
pub mod market;
pub mod profile;
pub mod source;

pub use audience_text::{ParsedAudience, parse_audience_text};
pub use buckets::{AgeBucket, Axis, BucketRange, Ethnicity, Gender, IncomeBucket, IndexConvention};
pub use error::{DataError, Result};
pub use industry::IndustryCategory;
pub use market::{Market, MarketKind, Region};
pub use profile::{ArtistProfile, BrandProfile, ConsumerAttribute, Demographics, ProfileKind};
pub use source::{JsonExtract, JsonSource, Loaded, ProfileSource, RecordError, SqliteSource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
