//! Flat JSON extract source.

use super::{Loaded, ProfileSource};
use crate::error::{DataError, Result};
use crate::profile::{ArtistProfile, BrandProfile, ProfileKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a JSON extract file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonExtract {
    /// Artist records
    pub artists: Vec<ArtistProfile>,
    /// Brand records
    pub brands: Vec<BrandProfile>,
}

impl JsonExtract {
    /// Parse an extract from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the extract as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Extract file with records left undecoded, so one bad record does not
/// void the rest.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExtract {
    artists: Vec<Value>,
    brands: Vec<Value>,
}

/// Decode each record on its own. Records without a string `id` are named
/// by their position.
fn decode_records<T: DeserializeOwned>(kind: ProfileKind, values: Vec<Value>) -> Loaded<T> {
    let results = values.into_iter().enumerate().map(|(index, value)| {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map_or_else(|| format!("#{index}"), str::to_string);
        let record = serde_json::from_value(value)
            .map_err(|e| DataError::Parse(format!("{id}: invalid {kind} record: {e}")));
        (id, record)
    });
    Loaded::from_results(kind, results)
}

/// Reads a JSON extract file from disk on every load.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Create a source backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RawExtract> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl ProfileSource for JsonSource {
    fn load_artists(&self) -> Result<Loaded<ArtistProfile>> {
        Ok(decode_records(ProfileKind::Artist, self.read()?.artists))
    }

    fn load_brands(&self) -> Result<Loaded<BrandProfile>> {
        Ok(decode_records(ProfileKind::Brand, self.read()?.brands))
    }
}

impl ProfileSource for JsonExtract {
    fn load_artists(&self) -> Result<Loaded<ArtistProfile>> {
        Ok(Loaded::complete(self.artists.clone()))
    }

    fn load_brands(&self) -> Result<Loaded<BrandProfile>> {
        Ok(Loaded::complete(self.brands.clone()))
    }
}
