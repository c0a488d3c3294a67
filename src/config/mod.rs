//! Configuration management for the suchna service
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source page configuration
    pub source: SourceConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Ingestion cadence and batching
    pub ingest: IngestConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Source page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the notice-board page
    pub url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Seconds between scheduled ingestion runs
    pub interval_secs: u64,

    /// Upsert batch size; an operational constant, not a correctness knob
    pub batch_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let source_url = std::env::var("SUCHNA_SOURCE_URL")
            .unwrap_or_else(|_| String::from("http://www.ipu.ac.in/notices.php"));

        let request_timeout_secs = std::env::var("SUCHNA_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let user_agent = std::env::var("SUCHNA_USER_AGENT")
            .unwrap_or_else(|_| format!("suchna/{}", env!("CARGO_PKG_VERSION")));

        let sqlite_path = std::env::var("SUCHNA_SQLITE_PATH")
            .unwrap_or_else(|_| String::from("data/notices.db"))
            .into();

        let host = std::env::var("SUCHNA_HOST").unwrap_or_else(|_| String::from("127.0.0.1"));

        let port = std::env::var("SUCHNA_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let interval_secs = std::env::var("SUCHNA_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);

        let batch_size = std::env::var("SUCHNA_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(500);

        let log_level = std::env::var("SUCHNA_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("SUCHNA_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            source: SourceConfig {
                url: source_url,
                request_timeout_secs,
                user_agent,
            },
            database: DatabaseConfig { sqlite_path },
            server: ServerConfig { host, port },
            ingest: IngestConfig {
                interval_secs,
                batch_size,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.source.url)
            .with_context(|| format!("source.url is not a valid URL: {}", self.source.url))?;

        if url.host_str().is_none() {
            anyhow::bail!("source.url must have a host: {}", self.source.url);
        }

        if self.source.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.ingest.interval_secs == 0 {
            anyhow::bail!("interval_secs must be greater than 0");
        }

        if self.ingest.batch_size == 0 {
            anyhow::bail!("batch_size must be greater than 0");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.request_timeout_secs)
    }

    /// Get the interval between scheduled runs as Duration
    #[must_use]
    pub fn ingest_interval(&self) -> Duration {
        Duration::from_secs(self.ingest.interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                url: String::from("http://www.ipu.ac.in/notices.php"),
                request_timeout_secs: 30,
                user_agent: format!("suchna/{}", env!("CARGO_PKG_VERSION")),
            },
            database: DatabaseConfig {
                sqlite_path: PathBuf::from("data/notices.db"),
            },
            server: ServerConfig {
                host: String::from("127.0.0.1"),
                port: 3000,
            },
            ingest: IngestConfig {
                interval_secs: 3600,
                batch_size: 500,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
