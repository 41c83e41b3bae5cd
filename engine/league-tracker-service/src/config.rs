//! Service configuration management

use anyhow::{Context, Result};
use league_scraper::ScraperConfig;
use serde::{Deserialize, Serialize};
use snapshot_store::StoreConfig;
use std::path::Path;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "league-tracker.toml";

/// Prefix of environment overrides, e.g. `LEAGUE_TRACKER_LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "LEAGUE_TRACKER";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Page fetching configuration
    pub scraper: ScraperConfig,

    /// Snapshot storage configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins if set
    pub level: String,

    /// Log format (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

/// Load configuration from defaults, a TOML file and environment variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let defaults = config::Config::try_from(&ServiceConfig::default())
        .context("Failed to serialize default configuration")?;

    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config: ServiceConfig = config::Config::builder()
        .add_source(defaults)
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__"))
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.scraper.validate().map_err(|e| anyhow::anyhow!("Invalid scraper configuration: {}", e))?;
    config.store.validate().map_err(|e| anyhow::anyhow!("Invalid store configuration: {}", e))?;

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}
