// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures log levels and output formats via environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration with environment-driven output formats

use crate::errors::{AppError, AppResult};
use std::env;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error or any `EnvFilter` directive)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Build a configuration from `SOMNIA_LOG_LEVEL` and `SOMNIA_LOG_FORMAT`
    ///
    /// # Errors
    /// Returns an error if `SOMNIA_LOG_FORMAT` names an unknown format
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(level) = env::var("SOMNIA_LOG_LEVEL") {
            config.level = level;
        }

        if let Ok(format) = env::var("SOMNIA_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                other => {
                    return Err(AppError::config(format!(
                        "unknown log format '{other}' (expected json, pretty, or compact)"
                    )))
                }
            };
        }

        Ok(config)
    }
}

/// Initialize the global tracing subscriber
///
/// # Errors
/// Returns an error if the level filter cannot be parsed or a global
/// subscriber is already installed
pub fn init(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| AppError::config(format!("invalid log level '{}': {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };

    result.map_err(|e| AppError::config(format!("failed to initialize logging: {e}")))
}

/// Initialize logging from environment variables
///
/// # Errors
/// Returns an error if the environment configuration is invalid or a global
/// subscriber is already installed
pub fn init_from_env() -> AppResult<()> {
    init(&LoggingConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_format_rejected() {
        env::set_var("SOMNIA_LOG_FORMAT", "yaml");
        let result = LoggingConfig::from_env();
        env::remove_var("SOMNIA_LOG_FORMAT");
        assert!(result.is_err());
    }
}
