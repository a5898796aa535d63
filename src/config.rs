//! Configuration module for Evently
//!
//! Settings are read from environment variables (and a `.env` file when
//! present) into strongly-typed sections for the server, the database and
//! the events API.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration structure for Evently
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Server configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub database: DatabaseConfig,

    /// Events API configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub api: ApiConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    /// Host to bind to
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Request timeout in seconds
    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[envconfig(from = "SHUTDOWN_TIMEOUT_SECS", default = "30")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[envconfig(from = "DATABASE_URL")]
    pub url: String,

    /// Maximum pool size
    #[envconfig(from = "DATABASE_POOL_MAX_SIZE", default = "10")]
    pub pool_max_size: u32,

    /// Minimum idle connections
    #[envconfig(from = "DATABASE_POOL_MIN_IDLE", default = "1")]
    pub pool_min_idle: u32,

    /// Pool acquire timeout in seconds
    #[envconfig(from = "DATABASE_POOL_TIMEOUT_SECONDS", default = "30")]
    pub pool_timeout_seconds: u64,

    /// Idle timeout in seconds
    #[envconfig(from = "DATABASE_POOL_IDLE_TIMEOUT_SECONDS", default = "600")]
    pub pool_idle_timeout_seconds: u64,

    /// Apply pending migrations at startup
    #[envconfig(from = "RUN_MIGRATIONS", default = "true")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn pool_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }

    /// Mask credentials in the URL for logging
    pub fn masked_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
                format!("{}***{}", &self.url[..scheme_end + 3], &self.url[at_pos..])
            },
            _ => "***".to_string(),
        }
    }
}

/// Events API configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ApiConfig {
    /// Page size when a listing request gives no limit
    #[envconfig(from = "EVENTS_DEFAULT_PAGE_SIZE", default = "20")]
    pub default_page_size: u32,

    /// Upper bound on any requested page size
    #[envconfig(from = "EVENTS_MAX_PAGE_SIZE", default = "100")]
    pub max_page_size: u32,

    /// Interval between background storage health checks
    #[envconfig(from = "HEALTH_CHECK_INTERVAL_SECS", default = "30")]
    pub health_check_interval_secs: u64,
}

impl ApiConfig {
    /// Clamp a requested page size into `1..=max_page_size`
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            health_check_interval_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }

        if self.database.url.is_empty() {
            return Err(Error::config("Database URL cannot be empty"));
        }

        if self.database.pool_max_size == 0 {
            return Err(Error::config("Database pool size must be at least 1"));
        }

        if self.api.default_page_size == 0 {
            return Err(Error::config("Default page size must be at least 1"));
        }

        if self.api.max_page_size < self.api.default_page_size {
            return Err(Error::config(
                "Maximum page size cannot be smaller than the default page size",
            ));
        }

        Ok(())
    }

    /// Log configuration (with sensitive data masked)
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            request_timeout_secs = self.server.request_timeout_secs,
            "Server configuration"
        );

        tracing::info!(
            url = %self.database.masked_url(),
            pool_size = %self.database.pool_max_size,
            run_migrations = self.database.run_migrations,
            "Database configuration"
        );

        tracing::info!(
            default_page_size = self.api.default_page_size,
            max_page_size = self.api.max_page_size,
            health_check_interval_secs = self.api.health_check_interval_secs,
            "Events API configuration"
        );
    }
}
