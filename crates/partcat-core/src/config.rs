//! Configuration structures for partcat.
//!
//! Configuration is loaded from TOML files and can be overridden via CLI flags.
//! Every section is optional; an empty file yields the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest page size accepted by the Glue `GetPartitions` API.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Catalog service configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Partition cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Monitoring configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// Glue catalog configuration.
///
/// Credentials are never configured here; the AWS default credential chain
/// (environment, profile, instance role) is always used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// AWS region, falls back to the SDK default region chain
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Endpoint override (LocalStack or other Glue-compatible endpoints)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Glue catalog ID (defaults to AWS account ID)
    #[serde(default)]
    pub catalog_id: Option<String>,

    /// Partitions requested per `GetPartitions` page
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            aws_region: None,
            endpoint_url: None,
            catalog_id: None,
            page_size: default_page_size(),
        }
    }
}

/// Partition cache configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; unset keeps entries for the process lifetime
    #[serde(default)]
    pub ttl_seconds: Option<u64>,

    /// Maximum number of cached tables; unset means unbounded
    #[serde(default)]
    pub max_tables: Option<usize>,
}

impl CacheConfig {
    /// Entry lifetime as a [`Duration`].
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }
}

/// Monitoring configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log format
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

fn default_page_size() -> i32 {
    500
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.catalog.page_size) {
            return Err(crate::Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.catalog.page_size
            )));
        }

        for (name, value) in [
            ("aws_region", &self.catalog.aws_region),
            ("endpoint_url", &self.catalog.endpoint_url),
            ("catalog_id", &self.catalog.catalog_id),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(crate::Error::Config(format!(
                    "{} must not be empty when set",
                    name
                )));
            }
        }

        if self.cache.max_tables == Some(0) {
            return Err(crate::Error::Config(
                "cache.max_tables must be at least 1".into(),
            ));
        }

        if self.cache.ttl_seconds == Some(0) {
            tracing::warn!("cache.ttl_seconds = 0 disables partition caching");
        }

        Ok(())
    }
}
