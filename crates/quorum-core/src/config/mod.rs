//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `SLOT_QUORUM_CONFIG` env var
//! 3. **Environment variables**: `SLOT_QUORUM__*` env vars override specific fields
//! 4. **Legacy endpoint list**: `PRIVATE_ENDPOINTS`, used only when no endpoint
//!    was configured by the layers above
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Configuration Sections
//!
//! - [`EndpointsConfig`]: Node RPC addresses to poll
//! - [`RoundConfig`]: Slot override, timeouts and concurrency for a pass
//! - [`LoggingConfig`]: Log level and format
//!
//! # Example
//!
//! ```toml
//! [endpoints]
//! urls = ["http://10.0.0.1:8899", "http://10.0.0.2:8899"]
//!
//! [round]
//! query_timeout_seconds = 10
//! commitment = "confirmed"
//!
//! [logging]
//! format = "json"
//! ```

pub use crate::consensus::RoundConfig;
use crate::upstream::Endpoint;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "SLOT_QUORUM_CONFIG";

/// Legacy environment variable with a `;`-separated endpoint list.
pub const LEGACY_ENDPOINTS_ENV: &str = "PRIVATE_ENDPOINTS";

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("No endpoints configured")]
    NoEndpoints,

    #[error("Invalid endpoint address: {0}")]
    InvalidEndpoint(String),

    #[error("Max concurrent queries must be greater than 0")]
    ZeroConcurrency,

    #[error("Logging format must be 'json' or 'pretty', got '{0}'")]
    InvalidLoggingFormat(String),
}

/// Node RPC endpoints to poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Endpoint addresses in configured order. Duplicates are kept and each
    /// occurrence is queried.
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set. Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Root application configuration.
///
/// Loaded with the `SLOT_QUORUM` prefix for environment overrides using `__`
/// as a separator, e.g. `SLOT_QUORUM__ROUND__SLOT_OVERRIDE=250000000`.
/// `SLOT_QUORUM__ENDPOINTS__URLS` takes a `;`-separated list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub round: RoundConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// The file is optional; a missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be parsed or a value
    /// cannot be deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("endpoints.urls", Vec::<String>::new())?
            .set_default("round.query_timeout_seconds", 30)?
            .set_default("round.max_concurrent_queries", 64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("SLOT_QUORUM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(";")
                    .with_list_parse_key("endpoints.urls"),
            )
            .build()?;

        let mut config: Self = config_builder.try_deserialize()?;
        config.apply_legacy_endpoints(std::env::var(LEGACY_ENDPOINTS_ENV).ok().as_deref());
        Ok(config)
    }

    /// Loads configuration from `config/config.toml`, or from the path in
    /// `SLOT_QUORUM_CONFIG` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&config_path)
    }

    /// Fills the endpoint list from the legacy `;`-separated value when no
    /// endpoints are configured.
    pub fn apply_legacy_endpoints(&mut self, raw: Option<&str>) {
        if !self.endpoints.urls.is_empty() {
            return;
        }
        if let Some(raw) = raw {
            self.endpoints.urls = parse_endpoint_list(raw);
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no endpoints, an endpoint that is not
    /// an HTTP(S) address, a zero concurrency cap, or an unknown log format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.urls.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        if let Some(bad) = self.endpoints.urls.iter().find(|url| !is_http_address(url)) {
            return Err(ConfigError::InvalidEndpoint(bad.clone()));
        }

        if self.round.max_concurrent_queries == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidLoggingFormat(self.logging.format.clone()));
        }

        Ok(())
    }

    /// Returns the configured endpoints in order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Endpoint> {
        Endpoint::from_addresses(&self.endpoints.urls)
    }
}

fn is_http_address(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Splits a `;`-separated endpoint list, trimming entries and dropping blanks.
#[must_use]
pub fn parse_endpoint_list(raw: &str) -> Vec<String> {
    raw.split(';').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
