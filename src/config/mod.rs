//! Configuration management for the loan tracker
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default directory for persisted collections
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the loan and audit collections
    pub data_dir: PathBuf,

    /// Current environment
    pub environment: Environment,

    /// Audit log retention applied at start-up, if set
    pub audit_max_entries: Option<usize>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let data_dir = env::var("TREDGATE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let audit_max_entries = parse_max_entries(env::var("AUDIT_MAX_ENTRIES").ok().as_deref())?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            data_dir,
            environment,
            audit_max_entries,
            log_level,
        })
    }
}

/// Parse the audit retention limit; it must be a positive integer when present
fn parse_max_entries(raw: Option<&str>) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue(format!(
            "AUDIT_MAX_ENTRIES must be a positive integer, got '{}'",
            raw
        ))),
        Ok(n) => Ok(Some(n)),
    }
}
