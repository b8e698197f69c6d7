use anyhow::Context;
use clap::{Parser, Subcommand};
use dota_hero_stats::analysis::hero_stats::{HeroTable, MatchEntry};
use dota_hero_stats::analysis::ranking::{HeroRanker, RankColumn};
use dota_hero_stats::analysis::ratings::RatingTable;
use dota_hero_stats::api::client::{OpenDotaClient, PandaScoreClient};
use dota_hero_stats::api::models::HeroConstants;
use dota_hero_stats::config::{
    Config, HERO_CONSTANTS_FILE, HERO_STATS_FILE, MATCH_ARCHIVE_FILE, MATCH_ENTRIES_FILE,
    RATINGS_INPUT_FILE,
};
use dota_hero_stats::display::output::{
    display_error, display_fetch_summary, display_info, display_phase_summary,
    display_request_budget, display_success, display_top_heroes,
};
use dota_hero_stats::export::{export_rows, ExportFormat, KnowledgeMetadata};
use dota_hero_stats::fetch::{fetch_hero_constants, fetch_new_matches};
use dota_hero_stats::live::{poll_once, run_poller, LiveFilter};
use dota_hero_stats::pipeline::run_pipeline;
use dota_hero_stats::rate_limit::RequestLog;
use dota_hero_stats::store::{load_json, load_json_optional, save_json, MatchArchive};
use indicatif::ProgressBar;
use std::env;
use tracing::{warn, Level};
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Parser, Debug)]
#[command(name = "Dota Hero Stats")]
#[command(about = "Fetch Dota 2 match data and compile hero statistics", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate match entries, classify phases and write exports (default)
    Pipeline {
        /// Also write the table after each stage
        #[arg(long)]
        write_stages: bool,

        /// Export formats (default: all)
        #[arg(short, long, value_enum)]
        format: Vec<ExportFormat>,
    },

    /// Fetch hero constants and recent pro matches from OpenDota
    Fetch {
        /// Number of pro matches to consider (default: 50)
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Rank heroes on a numeric column
    Rank {
        /// Column to rank on
        #[arg(short, long, value_enum, default_value = "kda-ratio")]
        column: RankColumn,

        /// Number of heroes to display (default: 10)
        #[arg(short, long, default_value = "10")]
        top_n: usize,
    },

    /// Poll running matches from PandaScore until interrupted
    Poll {
        /// Run a single poll cycle and exit
        #[arg(long)]
        once: bool,
    },
}

fn init_logging() {
    let level = env::var("DOTA_STATS_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let mut filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_err() {
        if let Ok(directive) = format!("dota_hero_stats={}", level).parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    match args.command.unwrap_or(Command::Pipeline {
        write_stages: false,
        format: Vec::new(),
    }) {
        Command::Pipeline { write_stages, format } => pipeline(&config, write_stages, format),
        Command::Fetch { limit } => fetch(&config, limit),
        Command::Rank { column, top_n } => rank(&config, column, top_n),
        Command::Poll { once } => poll(&config, once),
    }
}

fn pipeline(config: &Config, write_stages: bool, formats: Vec<ExportFormat>) -> anyhow::Result<()> {
    let entries_path = config.data_path(MATCH_ENTRIES_FILE);
    let entries: Vec<MatchEntry> =
        load_json(&entries_path).context("Failed to load match entries")?;
    display_info(&format!(
        "Loaded {} match entries from {}",
        entries.len(),
        entries_path.display()
    ));

    let constants: HeroConstants = load_json_optional(&config.data_path(HERO_CONSTANTS_FILE))
        .context("Failed to load hero constants")?
        .unwrap_or_else(|| {
            warn!("no hero constants file, unpicked heroes will be missing");
            HeroConstants::new()
        });

    let ratings: RatingTable = load_json_optional(&config.data_path(RATINGS_INPUT_FILE))
        .context("Failed to load phase ratings")?
        .unwrap_or_default();

    let output = run_pipeline(&entries, &constants, &ratings, write_stages);

    if let Some(snapshots) = &output.snapshots {
        snapshots
            .save(&config.data_dir)
            .context("Failed to write stage tables")?;
    }

    let stats_path = config.data_path(HERO_STATS_FILE);
    save_json(&stats_path, &output.records).context("Failed to write hero stats")?;
    display_success(&format!("Hero stats written to {}", stats_path.display()));

    let formats = if formats.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        formats
    };
    let metadata = KnowledgeMetadata::new(&output.rows, output.thresholds);
    for format in formats {
        let path = export_rows(format, &output.rows, &metadata, &config.data_dir)
            .with_context(|| format!("Failed to export {:?}", format))?;
        display_success(&format!("Exported {} heroes to {}", output.rows.len(), path.display()));
    }

    display_phase_summary(&output.rows, output.thresholds.as_ref());
    Ok(())
}

fn fetch(config: &Config, limit: usize) -> anyhow::Result<()> {
    let client = OpenDotaClient::new(config);
    let mut budget = RequestLog::load("opendota", &config.request_log_path("opendota"))?;

    display_info("Step 1: Fetching hero constants...");
    let constants =
        fetch_hero_constants(&client, &mut budget).context("Failed to fetch hero constants")?;
    save_json(&config.data_path(HERO_CONSTANTS_FILE), &constants)?;
    display_success(&format!("Found {} heroes", constants.len()));

    display_info(&format!("Step 2: Fetching up to {} pro matches...", limit));
    let mut archive = MatchArchive::load(&config.data_path(MATCH_ARCHIVE_FILE))?;
    let pb = ProgressBar::new(0);
    pb.set_message("Fetching match details");
    let summary = fetch_new_matches(&client, &constants, &mut archive, &mut budget, limit, &pb)
        .context("Failed to list pro matches")?;
    pb.finish_with_message("✓ Match data fetched");

    archive.save()?;
    let entries = archive.entries();
    save_json(&config.data_path(MATCH_ENTRIES_FILE), &entries)?;
    display_success(&format!(
        "{} matches archived, {} participant entries written",
        archive.matches.len(),
        entries.len()
    ));

    display_fetch_summary(&summary);
    display_request_budget(&budget);
    Ok(())
}

fn rank(config: &Config, column: RankColumn, top_n: usize) -> anyhow::Result<()> {
    let records: HeroTable =
        load_json(&config.data_path(HERO_STATS_FILE)).context("Failed to load hero stats")?;
    let ranked = HeroRanker::top_heroes(&records, column, top_n);
    display_top_heroes(&ranked, column);
    Ok(())
}

fn poll(config: &Config, once: bool) -> anyhow::Result<()> {
    let client = PandaScoreClient::new(config)?;
    let filter = LiveFilter {
        league_ids: config.live_league_ids.clone(),
    };
    let out_dir = config.live_dir();

    if once {
        let written = poll_once(&client, &filter, &out_dir).context("Live poll failed")?;
        display_success(&format!("Wrote {} live matches to {}", written, out_dir.display()));
        return Ok(());
    }

    run_poller(&client, &filter, &out_dir, config.poll_interval)
}
