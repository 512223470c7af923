//! Service configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for sparklab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// External scorer configuration
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// URL trial tasks post reaction callbacks to. Defaults to the
    /// service's own webhook endpoint on the bound address.
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_webhook_url() -> String {
    "http://127.0.0.1:8000/webhook/reaction".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_url: default_webhook_url(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".sparklab/sparklab.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// External scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScorerConfig {
    /// Endpoint the scorer is reached at
    #[serde(default = "default_scorer_endpoint")]
    pub endpoint_url: String,

    /// Request timeout in seconds; a timed-out call counts as a failed trial
    #[serde(default = "default_scorer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scorer_endpoint() -> String {
    "https://spark-joy.local-services.workers.dev/spark".to_string()
}

const fn default_scorer_timeout_secs() -> u64 {
    10
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_scorer_endpoint(),
            timeout_secs: default_scorer_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
