//! Sources of artist and brand records.
//!
//! The engine consumes an already-extracted, finite set of records. A source
//! only has to hand back every record it holds, in a stable order. A record
//! that cannot be decoded is reported alongside the others instead of
//! failing the whole load.

pub mod json;
pub mod sqlite;

pub use json::{JsonExtract, JsonSource};
pub use sqlite::SqliteSource;

use crate::error::{DataError, Result};
use crate::profile::{ArtistProfile, BrandProfile, ProfileKind};
use std::fmt;

/// A record a source could not decode.
#[derive(Debug)]
pub struct RecordError {
    /// Artist or brand.
    pub kind: ProfileKind,
    /// Identifier of the record, or its position when it has none.
    pub id: String,
    /// Decode failure.
    pub error: DataError,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.error)
    }
}

/// Records read from a source, with the ones that failed to decode.
#[derive(Debug)]
pub struct Loaded<T> {
    /// Decoded records, in source order.
    pub records: Vec<T>,
    /// Records skipped because they could not be decoded.
    pub failures: Vec<RecordError>,
}

impl<T> Loaded<T> {
    /// Records with no failures.
    pub const fn complete(records: Vec<T>) -> Self {
        Self {
            records,
            failures: Vec::new(),
        }
    }

    /// Sort per-record results into records and failures.
    pub fn from_results(
        kind: ProfileKind,
        results: impl IntoIterator<Item = (String, Result<T>)>,
    ) -> Self {
        let mut loaded = Self::complete(Vec::new());
        for (id, result) in results {
            match result {
                Ok(record) => loaded.records.push(record),
                Err(error) => loaded.failures.push(RecordError { kind, id, error }),
            }
        }
        loaded
    }

    /// Whether every record decoded.
    pub const fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A data source exposing artist and brand demographic records.
pub trait ProfileSource {
    /// Load every artist record.
    fn load_artists(&self) -> Result<Loaded<ArtistProfile>>;

    /// Load every brand record.
    fn load_brands(&self) -> Result<Loaded<BrandProfile>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_results_splits_failures() {
        let results = vec![
            ("b1".to_string(), Ok(1)),
            ("b2".to_string(), Err(DataError::Parse("bad".to_string()))),
            ("b3".to_string(), Ok(3)),
        ];
        let loaded = Loaded::from_results(ProfileKind::Brand, results);
        assert_eq!(loaded.records, vec![1, 3]);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].id, "b2");
        assert!(!loaded.is_complete());
        assert!(loaded.failures[0].to_string().starts_with("brand b2: "));
    }
}
