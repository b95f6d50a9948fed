//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rental: RentalConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_timeout() -> u64 {
    30
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// Rental engine configuration
///
/// Operational knobs for overdue detection, idle-fleet analytics and
/// ranking sizes. Per-tenant billing settings (fine percent, plan tier)
/// live in the database, not here.
#[derive(Debug, Deserialize, Clone)]
pub struct RentalConfig {
    /// Days past the expected return after which a rental is critical
    #[serde(default = "default_critical_overdue_days")]
    pub critical_overdue_days: i64,

    /// Trailing window (days) used for idle and zombie detection
    #[serde(default = "default_idle_window_days")]
    pub idle_window_days: i64,

    /// Look-ahead window (days) for expiring rentals
    #[serde(default = "default_expiring_window_days")]
    pub expiring_window_days: i64,

    /// Number of entries in analytics rankings
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,
}

fn default_critical_overdue_days() -> i64 {
    3
}

fn default_idle_window_days() -> i64 {
    30
}

fn default_expiring_window_days() -> i64 {
    2
}

fn default_ranking_size() -> usize {
    5
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("server.timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("rental.critical_overdue_days", 3)?
            .set_default("rental.idle_window_days", 30)?
            .set_default("rental.expiring_window_days", 2)?
            .set_default("rental.ranking_size", 5)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with LOCAVIA_ prefix
            .add_source(
                Environment::with_prefix("LOCAVIA")
                    .separator("__")
                    .try_parsing(true),
            )
            // DATABASE_URL wins over any file or prefixed variable
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("LOCAVIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            critical_overdue_days: 3,
            idle_window_days: 30,
            expiring_window_days: 2,
            ranking_size: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rental_config() {
        let config = RentalConfig::default();
        assert_eq!(config.critical_overdue_days, 3);
        assert_eq!(config.idle_window_days, 30);
        assert_eq!(config.expiring_window_days, 2);
        assert_eq!(config.ranking_size, 5);
    }
}
