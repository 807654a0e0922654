//! SQLite extract source.
//!
//! Scalar fields live in columns; nested fields (demographics, attributes,
//! markets) are stored as JSON text.

use super::{Loaded, ProfileSource};
use crate::error::{DataError, Result};
use crate::profile::{ArtistProfile, BrandProfile, ConsumerAttribute, Demographics, ProfileKind};
use rusqlite::{Connection, Row, params};
use serde::de::DeserializeOwned;
use std::path::Path;

/// SQLite-backed profile extract.
#[derive(Debug)]
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open (or create) an extract database.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let source = Self { conn };
        source.initialize_schema()?;
        Ok(source)
    }

    /// Create an in-memory extract (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let source = Self { conn };
        source.initialize_schema()?;
        Ok(source)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS artists (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                genre TEXT,
                demographics TEXT,
                attributes TEXT NOT NULL DEFAULT '[]',
                markets TEXT NOT NULL DEFAULT '[]',
                audience_text TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS brands (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                industry TEXT NOT NULL,
                media_spend REAL,
                demographics TEXT,
                attributes TEXT NOT NULL DEFAULT '[]',
                markets TEXT NOT NULL DEFAULT '[]',
                audience_description TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert or replace an artist record.
    pub fn upsert_artist(&self, artist: &ArtistProfile) -> Result<()> {
        let demographics = artist
            .demographics
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO artists
                (id, name, genre, demographics, attributes, markets, audience_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                artist.id,
                artist.name,
                artist.genre,
                demographics,
                serde_json::to_string(&artist.attributes)?,
                serde_json::to_string(&artist.markets)?,
                artist.audience_text,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a brand record.
    pub fn upsert_brand(&self, brand: &BrandProfile) -> Result<()> {
        let demographics = brand
            .demographics
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO brands
                (id, name, industry, media_spend, demographics, attributes, markets,
                 audience_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                brand.id,
                brand.name,
                brand.industry,
                brand.media_spend,
                demographics,
                serde_json::to_string(&brand.attributes)?,
                serde_json::to_string(&brand.markets)?,
                brand.audience_description,
            ],
        )?;
        Ok(())
    }

    /// Count records as (artists, brands).
    pub fn counts(&self) -> Result<(usize, usize)> {
        let artists: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM artists", [], |row| row.get(0))?;
        let brands: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM brands", [], |row| row.get(0))?;
        Ok((artists as usize, brands as usize))
    }
}

/// Raw artist row before JSON columns are decoded.
struct ArtistRow {
    id: String,
    name: String,
    genre: Option<String>,
    demographics: Option<String>,
    attributes: String,
    markets: String,
    audience_text: Option<String>,
}

impl ArtistRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            genre: row.get(2)?,
            demographics: row.get(3)?,
            attributes: row.get(4)?,
            markets: row.get(5)?,
            audience_text: row.get(6)?,
        })
    }

    fn decode(self) -> Result<ArtistProfile> {
        let demographics: Option<Demographics> = self
            .demographics
            .as_deref()
            .map(|json| decode_column(&self.id, "demographics", json))
            .transpose()?;
        let attributes: Vec<ConsumerAttribute> =
            decode_column(&self.id, "attributes", &self.attributes)?;
        let markets: Vec<String> = decode_column(&self.id, "markets", &self.markets)?;
        Ok(ArtistProfile {
            id: self.id,
            name: self.name,
            genre: self.genre,
            demographics,
            attributes,
            markets,
            audience_text: self.audience_text,
        })
    }
}

/// Raw brand row before JSON columns are decoded.
struct BrandRow {
    id: String,
    name: String,
    industry: String,
    media_spend: Option<f64>,
    demographics: Option<String>,
    attributes: String,
    markets: String,
    audience_description: Option<String>,
}

impl BrandRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            industry: row.get(2)?,
            media_spend: row.get(3)?,
            demographics: row.get(4)?,
            attributes: row.get(5)?,
            markets: row.get(6)?,
            audience_description: row.get(7)?,
        })
    }

    fn decode(self) -> Result<BrandProfile> {
        let demographics: Option<Demographics> = self
            .demographics
            .as_deref()
            .map(|json| decode_column(&self.id, "demographics", json))
            .transpose()?;
        let attributes: Vec<ConsumerAttribute> =
            decode_column(&self.id, "attributes", &self.attributes)?;
        let markets: Vec<String> = decode_column(&self.id, "markets", &self.markets)?;
        Ok(BrandProfile {
            id: self.id,
            name: self.name,
            industry: self.industry,
            media_spend: self.media_spend,
            demographics,
            attributes,
            markets,
            audience_description: self.audience_description,
        })
    }
}

fn decode_column<T: DeserializeOwned>(id: &str, column: &str, json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| DataError::Parse(format!("{id}: invalid JSON in column '{column}': {e}")))
}

impl ProfileSource for SqliteSource {
    fn load_artists(&self) -> Result<Loaded<ArtistProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, genre, demographics, attributes, markets, audience_text
             FROM artists
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], ArtistRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Loaded::from_results(
            ProfileKind::Artist,
            rows.into_iter().map(|row| (row.id.clone(), row.decode())),
        ))
    }

    fn load_brands(&self) -> Result<Loaded<BrandProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, industry, media_spend, demographics, attributes, markets,
                    audience_description
             FROM brands
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], BrandRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Loaded::from_results(
            ProfileKind::Brand,
            rows.into_iter().map(|row| (row.id.clone(), row.decode())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artist() -> ArtistProfile {
        let mut artist = ArtistProfile::new("a1", "The Lanterns");
        let mut demographics = Demographics::default();
        demographics.gender.insert("Female".to_string(), 0.55);
        demographics.gender.insert("Male".to_string(), 0.45);
        demographics.age.insert("21-29".to_string(), 135.0);
        artist.demographics = Some(demographics);
        artist.attributes = vec![ConsumerAttribute::new("Coffee Houses", 0.3)];
        artist.markets = vec!["Seattle".to_string()];
        artist
    }

    #[test]
    fn test_schema_initialization() {
        let source = SqliteSource::in_memory().unwrap();
        assert_eq!(source.counts().unwrap(), (0, 0));
    }

    #[test]
    fn test_artist_round_trip() {
        let source = SqliteSource::in_memory().unwrap();
        let artist = sample_artist();
        source.upsert_artist(&artist).unwrap();

        let loaded = source.load_artists().unwrap();
        assert!(loaded.is_complete());
        assert_eq!(loaded.records, vec![artist]);
    }

    #[test]
    fn test_brand_round_trip_and_order() {
        let source = SqliteSource::in_memory().unwrap();
        let mut second = BrandProfile::new("b2", "Zeta Cola", "Beverages");
        second.media_spend = Some(7_500_000.0);
        second.audience_description = Some("Young coffee drinkers".to_string());
        let first = BrandProfile::new("b1", "Acme Pet", "Pet Care");

        source.upsert_brand(&second).unwrap();
        source.upsert_brand(&first).unwrap();

        let loaded = source.load_brands().unwrap();
        assert_eq!(loaded.records, vec![first, second]);
        assert_eq!(source.counts().unwrap(), (0, 2));
    }

    #[test]
    fn test_upsert_replaces() {
        let source = SqliteSource::in_memory().unwrap();
        let mut artist = sample_artist();
        source.upsert_artist(&artist).unwrap();
        artist.name = "The Lanterns (Live)".to_string();
        source.upsert_artist(&artist).unwrap();

        let loaded = source.load_artists().unwrap().records;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "The Lanterns (Live)");
    }

    #[test]
    fn test_invalid_json_column_skips_row() {
        let source = SqliteSource::in_memory().unwrap();
        source
            .upsert_brand(&BrandProfile::new("b1", "Acme Pet", "Pet Care"))
            .unwrap();
        source
            .conn
            .execute(
                "INSERT INTO brands (id, name, industry, markets) VALUES ('b9', 'Bad', 'Retail', 'not json')",
                [],
            )
            .unwrap();

        let loaded = source.load_brands().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].id, "b1");
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].id, "b9");
        assert_eq!(loaded.failures[0].kind, ProfileKind::Brand);
        assert!(loaded.failures[0].error.to_string().contains("markets"));
    }
}
