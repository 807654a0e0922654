//! Encore CLI binary.
//!
//! Provides command-line interface for the Encore matching engine.

use clap::{Args, Parser, Subcommand, ValueEnum};
use encore::data::{
    ArtistProfile, BrandProfile, IndustryCategory, JsonSource, Loaded, Market, MarketKind,
    ProfileSource, SqliteSource,
};
use encore::output::ExportFormat;
use encore::{EngineConfig, MatchEngine};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore: artist-brand partnership matching", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank every artist against every brand
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the output files
        #[arg(long, default_value = "encore-output")]
        output_dir: PathBuf,

        /// Format of the match tables
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Matches per artist in the top-matches table
        #[arg(long)]
        top: Option<usize>,

        /// Override the media-spend threshold (USD, 0 disables)
        #[arg(long)]
        min_spend: Option<f64>,
    },

    /// Check an extract and report profiles a run would reject
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the industry taxonomy
    Industries,

    /// List the known markets
    Markets,

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// JSON extract file
    #[arg(long)]
    input: Option<PathBuf>,

    /// SQLite extract database
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
    PrettyJson,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::PrettyJson => Self::PrettyJson,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            config,
            output_dir,
            format,
            top,
            min_spend,
        } => {
            let mut config = EngineConfig::load_or_default(config.as_deref())?;
            if let Some(top) = top {
                config.top_n = top;
            }
            if let Some(min_spend) = min_spend {
                config.min_media_spend = min_spend;
            }
            run_matching(&source, config, &output_dir, format.into())?;
        }
        Commands::Inspect { source, config } => {
            let config = EngineConfig::load_or_default(config.as_deref())?;
            inspect(&source, config)?;
        }
        Commands::Industries => list_industries(),
        Commands::Markets => list_markets(),
        Commands::Config { config } => {
            let config = EngineConfig::load_or_default(config.as_deref())?;
            println!("# default location: {}", EngineConfig::default_path().display());
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

fn load_profiles(
    source: &SourceArgs,
) -> CliResult<(Loaded<ArtistProfile>, Loaded<BrandProfile>)> {
    let source: Box<dyn ProfileSource> = match (&source.input, &source.db) {
        (Some(path), _) => Box::new(JsonSource::new(path)),
        (None, Some(path)) => Box::new(SqliteSource::open(path)?),
        (None, None) => return Err("either --input or --db is required".into()),
    };
    let artists = source.load_artists()?;
    let brands = source.load_brands()?;
    Ok((artists, brands))
}

fn run_matching(
    source: &SourceArgs,
    config: EngineConfig,
    output_dir: &Path,
    format: ExportFormat,
) -> CliResult<()> {
    let top_n = config.top_n;
    let engine = MatchEngine::new(config)?;
    let (artists, brands) = load_profiles(source)?;
    info!(
        artists = artists.records.len(),
        brands = brands.records.len(),
        undecoded = artists.failures.len() + brands.failures.len(),
        "Loaded extract"
    );

    let pb = ProgressBar::new(artists.records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Scoring {} brands per artist...", brands.records.len()));

    let run = match engine.run_loaded(artists, brands, || pb.inc(1)) {
        Ok(run) => {
            pb.finish_with_message(format!("Scored {} matches", run.total_matches()));
            run
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let summary = run.summary();
    let files = encore::output::export_run(output_dir, &run.ranked, &summary, top_n, format)?;

    print!("{}", summary.to_ascii_table());
    println!("\nOutput files:");
    for path in [
        &files.matches,
        &files.top_matches,
        &files.summary,
        &files.data_dictionary,
    ] {
        println!("  {}", path.display());
    }

    Ok(())
}

fn inspect(source: &SourceArgs, config: EngineConfig) -> CliResult<()> {
    let threshold = config.min_media_spend;
    let engine = MatchEngine::new(config)?;
    let (artists, brands) = load_profiles(source)?;
    let inspection = engine.inspect_loaded(artists, brands);

    println!("Extract Inspection");
    println!("==================\n");
    println!("  Artists:            {}", inspection.artists);
    println!("  Brands:             {}", inspection.brands);
    println!(
        "  Eligible Brands:    {} (media spend > ${threshold:.0})",
        inspection.eligible_brands
    );
    println!("  Rejected Profiles:  {}", inspection.rejections.len());

    if !inspection.rejections.is_empty() {
        println!("\nRejections:");
        for rejection in &inspection.rejections {
            println!("  {rejection}");
        }
    }

    Ok(())
}

fn list_industries() {
    println!("Industry Categories:");
    println!("====================\n");

    for industry in IndustryCategory::all() {
        println!("  {}", industry.name());
    }
}

fn list_markets() {
    println!("Markets:");
    println!("========\n");

    for market in Market::all() {
        let kind = match market.kind() {
            MarketKind::National => "national".to_string(),
            MarketKind::Region(region) => format!("region ({region:?})"),
            MarketKind::Metro(region) => format!("metro, {region:?}"),
        };
        println!("  {:24} {}", market.name(), kind);
    }
}
