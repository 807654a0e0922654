//! Match Engine
//!
//! Runs the full pipeline over one extract:
//!
//! 1. media-spend pre-filter on brands
//! 2. normalization of every profile, rejecting bad records without aborting
//! 3. parallel scoring of every (artist, brand) pair
//! 4. per-artist statistics and ranking once all of an artist's pairs are in
//!
//! Every run is a full recompute; nothing is cached between runs.

use crate::config::EngineConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use encore_data::{
    ArtistProfile, BrandProfile, DataError, Loaded, ProfileKind, ProfileSource, RecordError,
};
use encore_output::{ExportFormat, RejectionRecord, RunFiles, RunSummary, export_run};
use encore_rank::{CollectingMatches, RankedMatches};
use encore_scoring::{MatchScorer, NormalizedArtist, NormalizedBrand, Normalizer, ScoringError};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// A profile excluded from the run, with the reason.
#[derive(Debug)]
pub struct Rejection {
    /// Artist or brand.
    pub kind: ProfileKind,
    /// Profile identifier.
    pub id: String,
    /// Why the profile could not be used.
    pub error: ScoringError,
}

impl Rejection {
    /// Summary record for reporting.
    pub fn to_record(&self) -> RejectionRecord {
        RejectionRecord::new(self.kind, self.id.clone(), self.error.to_string())
    }
}

impl From<RecordError> for Rejection {
    fn from(failure: RecordError) -> Self {
        Self {
            kind: failure.kind,
            id: failure.id,
            error: ScoringError::Data(failure.error),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.error)
    }
}

/// Result of one match run.
#[derive(Debug)]
pub struct MatchRun {
    /// Ranked matches per artist, artists ordered by name then identifier.
    pub ranked: Vec<RankedMatches>,
    /// Profiles excluded during normalization.
    pub rejections: Vec<Rejection>,
    /// Brands removed by the media-spend pre-filter.
    pub filtered_brands: usize,
    /// Brands that were scored against every artist.
    pub scored_brands: usize,
}

impl MatchRun {
    /// Total number of match rows.
    pub fn total_matches(&self) -> usize {
        self.ranked.iter().map(|artist| artist.matches().len()).sum()
    }

    /// Rejections as summary records.
    pub fn rejection_records(&self) -> Vec<RejectionRecord> {
        self.rejections.iter().map(Rejection::to_record).collect()
    }

    /// Summary stamped with the current time.
    pub fn summary(&self) -> RunSummary {
        self.summary_at(Utc::now())
    }

    /// Summary stamped with `generated_at`.
    pub fn summary_at(&self, generated_at: DateTime<Utc>) -> RunSummary {
        RunSummary::new(
            &self.ranked,
            self.rejection_records(),
            self.filtered_brands,
            generated_at,
        )
    }

    /// Write the run's files into `dir`.
    pub fn export(&self, dir: &Path, top_n: usize, format: ExportFormat) -> Result<RunFiles> {
        let summary = self.summary();
        Ok(export_run(dir, &self.ranked, &summary, top_n, format)?)
    }
}

/// Outcome of checking an extract without scoring it.
#[derive(Debug)]
pub struct Inspection {
    /// Artist records read.
    pub artists: usize,
    /// Brand records read.
    pub brands: usize,
    /// Brands passing the media-spend filter.
    pub eligible_brands: usize,
    /// Profiles that would be rejected.
    pub rejections: Vec<Rejection>,
}

/// Scores and ranks every artist against every brand.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    scorer: MatchScorer,
}

impl MatchEngine {
    /// Build an engine, validating the configuration.
    ///
    /// # Errors
    ///
    /// Fails on any invalid parameter; an invalid weight vector is reported
    /// as [`ScoringError::WeightConfiguration`].
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let industry_map = config.industry_map()?;
        let lexicon = config.lexicon(&industry_map);
        debug!(
            attributes = industry_map.len(),
            keywords = lexicon.len(),
            "Built attribute lookups"
        );
        let normalizer = Normalizer::new(config.scoring.top_attributes, lexicon);
        let scorer = MatchScorer::from_config(&config.scoring, industry_map)?;
        Ok(Self {
            config,
            normalizer,
            scorer,
        })
    }

    /// Configuration in use.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalize every profile and report what a run would reject.
    pub fn inspect(&self, artists: &[ArtistProfile], brands: &[BrandProfile]) -> Inspection {
        let eligible = self.eligible_brands(brands);
        let mut rejections = Vec::new();
        self.normalize_artists(artists, &mut rejections);
        self.normalize_brands(&eligible, &mut rejections);
        Inspection {
            artists: artists.len(),
            brands: brands.len(),
            eligible_brands: eligible.len(),
            rejections,
        }
    }

    /// Inspect records loaded from a source, counting undecodable records
    /// as rejections.
    pub fn inspect_loaded(
        &self,
        artists: Loaded<ArtistProfile>,
        brands: Loaded<BrandProfile>,
    ) -> Inspection {
        let mut inspection = self.inspect(&artists.records, &brands.records);
        inspection.artists += artists.failures.len();
        inspection.brands += brands.failures.len();
        inspection.rejections = with_source_failures(
            artists.failures,
            brands.failures,
            inspection.rejections,
        );
        inspection
    }

    /// Load both profile sets from `source` and run.
    ///
    /// Only a source that cannot be read at all fails the run; single
    /// records that do not decode become rejections.
    pub fn run_source(&self, source: &dyn ProfileSource) -> Result<MatchRun> {
        let artists = source.load_artists()?;
        let brands = source.load_brands()?;
        self.run_loaded(artists, brands, || {})
    }

    /// Run over records loaded from a source, with a progress callback.
    pub fn run_loaded<F>(
        &self,
        artists: Loaded<ArtistProfile>,
        brands: Loaded<BrandProfile>,
        on_artist_ranked: F,
    ) -> Result<MatchRun>
    where
        F: Fn() + Sync,
    {
        for failure in artists.failures.iter().chain(&brands.failures) {
            warn!(kind = %failure.kind, id = %failure.id, error = %failure.error, "Record not decoded");
        }
        let mut run = self.run_with_progress(&artists.records, &brands.records, on_artist_ranked)?;
        run.rejections = with_source_failures(artists.failures, brands.failures, run.rejections);
        Ok(run)
    }

    /// Run over in-memory profiles.
    pub fn run(&self, artists: &[ArtistProfile], brands: &[BrandProfile]) -> Result<MatchRun> {
        self.run_with_progress(artists, brands, || {})
    }

    /// Run, calling `on_artist_ranked` each time an artist's ranking completes.
    pub fn run_with_progress<F>(
        &self,
        artists: &[ArtistProfile],
        brands: &[BrandProfile],
        on_artist_ranked: F,
    ) -> Result<MatchRun>
    where
        F: Fn() + Sync,
    {
        info!(artists = artists.len(), brands = brands.len(), "Starting match run");

        let eligible = self.eligible_brands(brands);
        let filtered_brands = brands.len() - eligible.len();
        if filtered_brands > 0 {
            info!(
                filtered = filtered_brands,
                threshold = self.config.min_media_spend,
                "Brands removed by media-spend filter"
            );
        }

        let mut rejections = Vec::new();
        let normalized_artists = self.normalize_artists(artists, &mut rejections);
        let normalized_brands = self.normalize_brands(&eligible, &mut rejections);
        for rejection in &rejections {
            warn!(kind = %rejection.kind, id = %rejection.id, error = %rejection.error, "Profile rejected");
        }

        let mut ranked = normalized_artists
            .par_iter()
            .map(|artist| {
                let ranked = self.rank_artist(artist, &normalized_brands);
                on_artist_ranked();
                ranked
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| {
            a.artist_name()
                .cmp(b.artist_name())
                .then_with(|| a.artist_id().cmp(b.artist_id()))
        });

        let run = MatchRun {
            ranked,
            rejections,
            filtered_brands,
            scored_brands: normalized_brands.len(),
        };
        info!(
            artists = run.ranked.len(),
            brands = run.scored_brands,
            matches = run.total_matches(),
            rejected = run.rejections.len(),
            "Match run complete"
        );
        Ok(run)
    }

    fn eligible_brands<'a>(&self, brands: &'a [BrandProfile]) -> Vec<&'a BrandProfile> {
        brands
            .iter()
            .filter(|brand| brand.passes_spend_filter(self.config.min_media_spend))
            .collect()
    }

    fn normalize_artists(
        &self,
        artists: &[ArtistProfile],
        rejections: &mut Vec<Rejection>,
    ) -> Vec<NormalizedArtist> {
        let results: Vec<_> = artists
            .par_iter()
            .map(|artist| self.normalizer.normalize_artist(artist))
            .collect();
        keep_normalized(
            ProfileKind::Artist,
            artists.iter().map(|artist| artist.id.as_str()),
            results,
            rejections,
        )
    }

    fn normalize_brands(
        &self,
        brands: &[&BrandProfile],
        rejections: &mut Vec<Rejection>,
    ) -> Vec<NormalizedBrand> {
        let results: Vec<_> = brands
            .par_iter()
            .map(|brand| self.normalizer.normalize_brand(brand))
            .collect();
        keep_normalized(
            ProfileKind::Brand,
            brands.iter().map(|brand| brand.id.as_str()),
            results,
            rejections,
        )
    }

    /// Score one artist against every brand, then rank.
    fn rank_artist(
        &self,
        artist: &NormalizedArtist,
        brands: &[NormalizedBrand],
    ) -> Result<RankedMatches> {
        let pairs = brands
            .par_iter()
            .map(|brand| self.scorer.score_pair(artist, brand))
            .collect::<std::result::Result<Vec<_>, ScoringError>>()?;

        let mut collecting = CollectingMatches::new(&artist.id, &artist.name);
        for pair in pairs {
            collecting.push(pair)?;
        }
        let computed = collecting.compute_statistics();
        debug!(
            artist = %artist.id,
            scored = computed.statistics().scored,
            mean = ?computed.statistics().mean,
            std_dev = computed.statistics().std_dev,
            "Artist statistics"
        );
        Ok(computed.rank())
    }
}

/// Source failures first, then normalization rejections.
fn with_source_failures(
    artists: Vec<RecordError>,
    brands: Vec<RecordError>,
    rejections: Vec<Rejection>,
) -> Vec<Rejection> {
    artists
        .into_iter()
        .chain(brands)
        .map(Rejection::from)
        .chain(rejections)
        .collect()
}

/// Split normalization results into usable profiles and rejections.
///
/// Later records reusing an identifier are rejected.
fn keep_normalized<'a, T>(
    kind: ProfileKind,
    ids: impl Iterator<Item = &'a str>,
    results: Vec<encore_scoring::Result<T>>,
    rejections: &mut Vec<Rejection>,
) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(results.len());
    for (id, result) in ids.zip(results) {
        if !seen.insert(id) {
            rejections.push(Rejection {
                kind,
                id: id.to_string(),
                error: ScoringError::Data(DataError::DuplicateId {
                    kind: kind.to_string(),
                    profile: id.to_string(),
                }),
            });
            continue;
        }
        match result {
            Ok(normalized) => kept.push(normalized),
            Err(error) => rejections.push(Rejection {
                kind,
                id: id.to_string(),
                error,
            }),
        }
    }
    kept
}
