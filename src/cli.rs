//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Season range the provider reliably covers (also what the UI offers).
pub const SEASON_MIN: u16 = 2018;
pub const SEASON_MAX: u16 = 2024;

/// Highest round number a season can have.
pub const ROUND_MAX: u8 = 23;

/// Pitboard - F1 session results dashboard for the terminal
///
/// Fetch one session's classification from an Ergast-compatible API,
/// show KPIs, rankings and charts, and export the classification as CSV.
///
/// Examples:
///   pitboard --season 2023 --round 7
///   pitboard --season 2022 --round 1 --session qualifying
///   pitboard --season 2023 --round 7 --output report.md --format markdown
///   pitboard --season 2023 --round 7 --no-cache --verbose
///   pitboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Season year to load (2018-2024)
    #[arg(short, long, value_name = "YEAR", required_unless_present = "init_config")]
    pub season: Option<u16>,

    /// Round number within the season (1-23)
    #[arg(short, long, value_name = "N", required_unless_present = "init_config")]
    pub round: Option<u8>,

    /// Session of the weekend to load
    ///
    /// Note: the Ergast schema carries no practice classifications, so
    /// fp1/fp2/fp3 will report "no data" from the provider.
    #[arg(long, default_value = "race", value_name = "KIND")]
    pub session: SessionArg,

    /// CSV export file path
    ///
    /// Defaults to f1_{season}_round_{round}_{session}.csv in the
    /// current directory.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Also write a report file to this path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report file format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Base URL of the Ergast-compatible API
    #[arg(long, value_name = "URL", env = "PITBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory for cached provider responses
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the response cache and always fetch fresh data
    #[arg(long)]
    pub no_cache: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pitboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (no dashboard, only the export)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .pitboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Session selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SessionArg {
    /// The race itself (default)
    #[default]
    Race,
    /// Qualifying
    Qualifying,
    /// Free Practice 1
    Fp1,
    /// Free Practice 2
    Fp2,
    /// Free Practice 3
    Fp3,
}

/// Output format for the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the season, defaulting to 0 if unset (should be validated first).
    pub fn season_year(&self) -> u16 {
        self.season.unwrap_or(0)
    }

    /// Get the round, defaulting to 0 if unset (should be validated first).
    pub fn round_number(&self) -> u8 {
        self.round.unwrap_or(0)
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let season = self.season_year();
        if !(SEASON_MIN..=SEASON_MAX).contains(&season) {
            return Err(format!(
                "Season must be between {} and {}",
                SEASON_MIN, SEASON_MAX
            ));
        }

        let round = self.round_number();
        if round == 0 || round > ROUND_MAX {
            return Err(format!("Round must be between 1 and {}", ROUND_MAX));
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
