//! Pitboard - F1 session results dashboard for the terminal
//!
//! A CLI tool that fetches one session's classification from an
//! Ergast-compatible motorsport API, aggregates it into KPIs, rankings
//! and charts, and exports the classification as CSV.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (provider unreachable, no data, invalid records, ...)

mod analysis;
mod cache;
mod cli;
mod config;
mod error;
mod export;
mod models;
mod provider;
mod report;

use anyhow::{Context, Result};
use cache::ResponseCache;
use cli::{Args, OutputFormat, SessionArg};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{SessionKind, SessionMeta};
use provider::ErgastClient;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first: the log level can come from the file
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("Pitboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the dashboard
    match run_dashboard(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Request failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            eprintln!("   Try another round or session and re-run.");
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .pitboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".pitboard.toml");

    if path.exists() {
        eprintln!("⚠️  .pitboard.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .pitboard.toml")?;

    println!("✅ Created .pitboard.toml with default settings.");
    println!("   Edit it to customize the API endpoint and cache directory.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = effective_log_level(args, config);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Log level from CLI flags and the merged config file. --quiet wins,
/// then --verbose or `general.verbose` from the file.
fn effective_log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Run the complete fetch-aggregate-render-export workflow.
async fn run_dashboard(args: Args, config: Config) -> Result<()> {
    let season = args.season_year();
    let round = args.round_number();
    let kind = session_arg_to_kind(args.session);

    if !args.quiet {
        println!("📡 Loading F1 session: {} round {} — {}", season, round, kind);
    }

    if !kind.has_provider_data() {
        warn!("The Ergast schema carries no {} classification", kind);
    }

    // Step 1: Get the raw session data (cache first, network on a miss)
    let cache = ResponseCache::new(config.cache.dir.clone(), config.cache.enabled);
    let body = match cache.load(season, round, kind) {
        Some(body) => {
            info!("Using cached response for {} r{} {}", season, round, kind.code());
            body
        }
        None => {
            let client = ErgastClient::new(&config.provider.base_url, config.provider.timeout_seconds);
            let body = fetch_with_spinner(&client, season, round, kind, args.quiet).await?;
            cache.store(season, round, kind, &body);
            body
        }
    };

    // Step 2: Map the response into raw result records
    let (records, event_name) = provider::parse_session(&body, season, round, kind)?;

    let meta = SessionMeta {
        event_name,
        season,
        round,
        session_kind: kind,
    };

    // Step 3: Aggregate into the derived views
    let view = analysis::aggregate(&records, &meta)?;

    // Step 4: Print the dashboard
    if !args.quiet {
        print!("{}", report::render_dashboard(&view, &meta));
    }

    // Step 5: Export the classification as CSV (--csv was merged into the
    // config and takes precedence over a `[general] csv` file setting)
    let csv_path = config
        .general
        .csv
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| export::suggested_filename(&meta).into());
    export::write_csv_file(&view.base_table, &csv_path)?;

    if !args.quiet {
        println!("\n⬇️  Classification exported to: {}", csv_path.display());
    }

    // Step 6: Optionally write a report file
    if let Some(ref output) = args.output {
        let content = match args.format {
            OutputFormat::Markdown => report::generate_markdown_report(&view, &meta),
            OutputFormat::Json => report::generate_json_report(&view, &meta)?,
        };
        std::fs::write(output, &content)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;

        if !args.quiet {
            println!("📝 Report saved to: {}", output.display());
        }
    }

    if !args.quiet {
        println!(
            "\n✅ Done: {} entrants, winner {} ({}).",
            view.kpis.entrant_count, view.kpis.winner_driver, view.kpis.winner_team
        );
    }

    Ok(())
}

/// Fetch the raw body with a spinner while the request is in flight.
async fn fetch_with_spinner(
    client: &ErgastClient,
    season: u16,
    round: u8,
    kind: SessionKind,
    quiet: bool,
) -> Result<String> {
    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message("Fetching session results...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = client.fetch_raw(season, round, kind).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(result?)
}

/// Convert the CLI session selector to the domain session kind.
fn session_arg_to_kind(arg: SessionArg) -> SessionKind {
    match arg {
        SessionArg::Race => SessionKind::Race,
        SessionArg::Qualifying => SessionKind::Qualifying,
        SessionArg::Fp1 => SessionKind::Practice1,
        SessionArg::Fp2 => SessionKind::Practice2,
        SessionArg::Fp3 => SessionKind::Practice3,
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .pitboard.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
