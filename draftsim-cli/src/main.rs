mod reports;
mod seeds;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

use draftsim_engine::{
    AggregatedPlayerStats, CorpusAggregator, DraftsimEngine, GenerationConfig, MemoryStore,
    Position, StaticStats, StatsAggregator,
};
use seeds::{parse_position, parse_seed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Machine-readable league tables
    Json,
    /// Colored human-readable summary
    Console,
}

#[derive(Debug, Parser)]
#[command(name = "draftsim", version)]
#[command(about = "Synthetic football league generator driven by real roster frequencies")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Optional path to write output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate an athlete corpus into attribute frequency tables
    Aggregate {
        /// Corpus file shaped as {"athletes": [...]}
        #[arg(long)]
        corpus: PathBuf,

        /// Year experience is measured against (defaults to this year)
        #[arg(long)]
        reference_year: Option<i32>,
    },
    /// Generate a league with rosters and careers and seed an in-memory store
    Generate {
        /// Aggregated stats written by `draftsim aggregate`
        #[arg(long)]
        stats: PathBuf,

        /// Seed (decimal or 0x hex)
        #[arg(long, default_value = "1337", value_parser = parse_seed)]
        seed: u64,

        /// Generation settings as JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        report: ReportFormat,
    },
    /// Generate one player and their career
    Player {
        /// Aggregated stats written by `draftsim aggregate`
        #[arg(long)]
        stats: PathBuf,

        /// Position abbreviation (QB, RB, WR, TE, PK)
        #[arg(long, value_parser = parse_position)]
        position: Position,

        /// Team the player belongs to (random when omitted)
        #[arg(long)]
        team: Option<Uuid>,

        /// Seed (decimal or 0x hex)
        #[arg(long, default_value = "1337", value_parser = parse_seed)]
        seed: u64,

        /// Generation settings as JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    announce_banner();

    match &args.command {
        Command::Aggregate {
            corpus,
            reference_year,
        } => run_aggregate(&args, corpus, *reference_year),
        Command::Generate {
            stats,
            seed,
            config,
            report,
        } => run_generate(&args, stats, *seed, config.as_deref(), *report),
        Command::Player {
            stats,
            position,
            team,
            seed,
            config,
        } => run_player(&args, stats, *position, *team, *seed, config.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    eprintln!("{}", "🏈 Draftsim League Generator".bright_cyan().bold());
    eprintln!("{}", "============================".cyan());
}

fn run_aggregate(args: &Args, corpus: &Path, reference_year: Option<i32>) -> Result<()> {
    let reference_year = reference_year.unwrap_or_else(|| chrono::Local::now().year());
    let raw = std::fs::read_to_string(corpus)
        .with_context(|| format!("failed to read corpus {}", corpus.display()))?;
    let aggregator = CorpusAggregator::from_json(&raw, reference_year)
        .with_context(|| format!("failed to parse corpus {}", corpus.display()))?;
    let stats = aggregator.aggregate().context("aggregation failed")?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    reports::generate_stats_report(&mut output_target, &stats)?;
    output_target.flush_inner()?;

    eprintln!(
        "✅ Aggregated {} of {} records across {} positions (reference year {reference_year})",
        stats.first_names.values().sum::<u32>().to_string().green(),
        aggregator.len(),
        stats.position_profile.len()
    );
    Ok(())
}

fn load_stats(path: &Path) -> Result<AggregatedPlayerStats> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read stats {}", path.display()))?;
    let stats = AggregatedPlayerStats::from_json(&raw)
        .with_context(|| format!("failed to parse stats {}", path.display()))?;
    log::debug!(
        "loaded stats from {}: {} position profiles",
        path.display(),
        stats.position_profile.len()
    );
    Ok(stats)
}

fn load_config(path: Option<&Path>) -> Result<GenerationConfig> {
    let Some(path) = path else {
        log::debug!("no config given, using defaults");
        return Ok(GenerationConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GenerationConfig::load(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn run_generate(
    args: &Args,
    stats: &Path,
    seed: u64,
    config: Option<&Path>,
    report: ReportFormat,
) -> Result<()> {
    let start_time = Instant::now();
    let engine = DraftsimEngine::new(StaticStats(load_stats(stats)?), load_config(config)?);

    let mut store = MemoryStore::new();
    let (document, counts) = engine
        .seed_league(seed, &mut store)
        .with_context(|| format!("seeding league for seed {seed:#x} failed"))?;
    log::info!(
        "seeded league for seed {seed:#x}: {} teams, {} players",
        counts.teams,
        counts.players
    );

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match report {
        ReportFormat::Json => {
            reports::generate_json_report(&mut output_target, &document, &counts, store.tables())?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(
                &mut output_target,
                &document,
                &counts,
                start_time.elapsed(),
            )?;
        }
    }
    output_target.flush_inner()?;

    eprintln!("🏁 Total time: {:?}", start_time.elapsed());
    Ok(())
}

fn run_player(
    args: &Args,
    stats: &Path,
    position: Position,
    team: Option<Uuid>,
    seed: u64,
    config: Option<&Path>,
) -> Result<()> {
    let engine = DraftsimEngine::new(StaticStats(load_stats(stats)?), load_config(config)?);
    let career = engine
        .generate_player(position, team, seed)
        .with_context(|| format!("failed to generate {position} for seed {seed:#x}"))?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    reports::generate_player_report(&mut output_target, &career)?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
