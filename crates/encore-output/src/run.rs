//! Writes the files of a match run into an output directory.

use crate::dictionary::DataDictionary;
use crate::export::{ExportError, ExportFormat, Exporter, MatchTable};
use crate::summary::RunSummary;
use encore_rank::RankedMatches;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    /// Every match of every artist.
    pub matches: PathBuf,
    /// Best matches of each artist.
    pub top_matches: PathBuf,
    /// Run summary (always JSON).
    pub summary: PathBuf,
    /// Column descriptions.
    pub data_dictionary: PathBuf,
}

/// Write `matches`, `top_matches`, `summary.json` and `data_dictionary` into `dir`.
///
/// Tables use `format`; the summary is always pretty JSON. The directory is
/// created if needed and existing files are overwritten.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// serialized or written.
pub fn export_run(
    dir: &Path,
    ranked: &[RankedMatches],
    summary: &RunSummary,
    top_n: usize,
    format: ExportFormat,
) -> Result<RunFiles, ExportError> {
    fs::create_dir_all(dir)?;
    let ext = format.extension();
    let files = RunFiles {
        matches: dir.join(format!("matches.{ext}")),
        top_matches: dir.join(format!("top_matches.{ext}")),
        summary: dir.join("summary.json"),
        data_dictionary: dir.join(format!("data_dictionary.{ext}")),
    };

    let table = MatchTable::from_ranked(ranked);
    table.export_to_file(&files.matches, format)?;

    let top = MatchTable::top_per_artist(ranked, top_n);
    top.export_to_file(&files.top_matches, format)?;

    summary.export_to_file(&files.summary, ExportFormat::PrettyJson)?;
    DataDictionary::for_match_table().export_to_file(&files.data_dictionary, format)?;

    info!(
        dir = %dir.display(),
        rows = table.len(),
        top_rows = top.len(),
        "Wrote match run"
    );
    Ok(files)
}
