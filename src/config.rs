//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.pitboard.toml` files. Precedence: CLI arguments over config file,
//! config file over built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default CSV export path. When unset, the per-session suggested
    /// filename is used.
    #[serde(default)]
    pub csv: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            csv: None,
            verbose: false,
        }
    }
}

/// Session data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Ergast-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    crate::provider::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether cached responses are used at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory the raw responses are stored in.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_dir() -> String {
    "f1_cache".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".pitboard.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; optional arguments only override when
    /// explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref csv) = args.csv {
            self.general.csv = Some(csv.display().to_string());
        }
        if let Some(ref api_url) = args.api_url {
            self.provider.base_url = api_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.provider.timeout_seconds = timeout;
        }
        if let Some(ref cache_dir) = args.cache_dir {
            self.cache.dir = cache_dir.display().to_string();
        }
        if args.no_cache {
            self.cache.enabled = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.base_url, "https://api.jolpi.ca/ergast/f1");
        assert_eq!(config.provider.timeout_seconds, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.dir, "f1_cache");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[provider]
base_url = "http://localhost:8000/ergast/f1"
timeout_seconds = 5

[cache]
enabled = false
dir = "custom_cache"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.provider.base_url, "http://localhost:8000/ergast/f1");
        assert_eq!(config.provider.timeout_seconds, 5);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.dir, "custom_cache");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[provider]\ntimeout_seconds = 10\n").unwrap();
        assert_eq!(config.provider.timeout_seconds, 10);
        assert_eq!(config.provider.base_url, "https://api.jolpi.ca/ergast/f1");
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_general_csv_setting_is_parsed() {
        let config: Config = toml::from_str("[general]\ncsv = \"my_export.csv\"\n").unwrap();
        assert_eq!(config.general.csv.as_deref(), Some("my_export.csv"));
    }

    fn make_args() -> crate::cli::Args {
        crate::cli::Args {
            season: Some(2023),
            round: Some(7),
            session: crate::cli::SessionArg::Race,
            csv: None,
            output: None,
            format: crate::cli::OutputFormat::Markdown,
            api_url: None,
            timeout: None,
            cache_dir: None,
            no_cache: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    const FILE_TOML: &str = r#"
[general]
csv = "file.csv"

[provider]
base_url = "http://file.example/ergast/f1"
timeout_seconds = 60

[cache]
dir = "file_cache"
"#;

    #[test]
    fn test_merge_cli_overrides_file_values() {
        let mut config: Config = toml::from_str(FILE_TOML).unwrap();

        let mut args = make_args();
        args.csv = Some(PathBuf::from("cli.csv"));
        args.api_url = Some("http://cli.example/ergast/f1".to_string());
        args.timeout = Some(5);
        args.cache_dir = Some(PathBuf::from("cli_cache"));
        args.no_cache = true;
        args.verbose = true;

        config.merge_with_args(&args);

        assert_eq!(config.general.csv.as_deref(), Some("cli.csv"));
        assert_eq!(config.provider.base_url, "http://cli.example/ergast/f1");
        assert_eq!(config.provider.timeout_seconds, 5);
        assert_eq!(config.cache.dir, "cli_cache");
        assert!(!config.cache.enabled);
        assert!(config.general.verbose);
    }

    #[test]
    fn test_merge_keeps_file_values_without_cli_overrides() {
        let mut config: Config = toml::from_str(FILE_TOML).unwrap();

        config.merge_with_args(&make_args());

        assert_eq!(config.general.csv.as_deref(), Some("file.csv"));
        assert_eq!(config.provider.base_url, "http://file.example/ergast/f1");
        assert_eq!(config.provider.timeout_seconds, 60);
        assert_eq!(config.cache.dir, "file_cache");
        assert!(config.cache.enabled);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[provider]"));
        assert!(toml_str.contains("[cache]"));
    }
}
