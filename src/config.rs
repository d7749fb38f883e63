//! Client configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront REST API
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token of the signed-in user; omit to act as a guest
    #[arg(long, env = "STOREFRONT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "STOREFRONT_HTTP_TIMEOUT_SECONDS", default_value_t = 30_u64)]
    pub http_timeout_seconds: u64,
}

impl ApiConfig {
    /// Configuration pointing at `api_url` with default settings otherwise.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: None,
            http_timeout_seconds: 30,
        }
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Durable client storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// File holding durable client storage (the guest session id)
    #[arg(
        long,
        env = "STOREFRONT_STORAGE_PATH",
        default_value = ".storefront/storage.json"
    )]
    pub storage_path: PathBuf,
}
