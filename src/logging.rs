//! Structured logging initialization and configuration
//!
//! restmux logs through `tracing` everywhere. This module wires a subscriber
//! for binaries and services that embed the mux:
//! - JSON output for production, pretty output for development
//! - `EnvFilter` level control plus extra per-target directives
//! - Optional non-blocking output through `tracing-appender`
//!
//! ## Environment Variables
//!
//! | Variable                        | Default | Meaning                          |
//! |---------------------------------|---------|----------------------------------|
//! | `RESTMUX_LOG_LEVEL`             | `info`  | trace, debug, info, warn, error  |
//! | `RESTMUX_LOG_FORMAT`            | `json`  | `json` or `pretty`               |
//! | `RESTMUX_LOG_TARGET_FILTER`     | unset   | comma-separated `target=level`   |
//! | `RESTMUX_LOG_INCLUDE_LOCATION`  | `false` | add file and line to each event  |
//! | `RESTMUX_LOG_ASYNC`             | `false` | write through a background thread|
//!
//! `RUST_LOG`, when set, takes precedence over `RESTMUX_LOG_LEVEL`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json, // Default to JSON
        }
    }
}

/// Logging configuration, from a config file section and/or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Extra `target=level` directives, comma separated
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
    /// Write through a non-blocking background writer
    #[serde(rename = "async")]
    pub async_logging: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
            async_logging: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Create a configuration for local development
    pub fn default_dev() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
            async_logging: false,
        }
    }

    /// Override fields with any `RESTMUX_LOG_*` variables that are set.
    ///
    /// Unparseable boolean values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(level) = env::var("RESTMUX_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("RESTMUX_LOG_FORMAT") {
            self.format = LogFormat::parse(&format);
        }
        if let Ok(filter) = env::var("RESTMUX_LOG_TARGET_FILTER") {
            self.target_filter = Some(filter);
        }
        if let Some(include) = env_bool("RESTMUX_LOG_INCLUDE_LOCATION") {
            self.include_location = include;
        }
        if let Some(async_logging) = env_bool("RESTMUX_LOG_ASYNC") {
            self.async_logging = async_logging;
        }
    }

    fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Build the filter: `RUST_LOG` if set, else the configured level, plus
    /// the configured target directives.
    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        // Connection pool chatter from the HTTP client stack
        if let Ok(directive) = "hyper_util=warn".parse() {
            env_filter = env_filter.add_directive(directive);
        }

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

/// Initialize the global subscriber.
///
/// With `async_logging` the returned guard owns the background writer; keep
/// it alive for the lifetime of the program or buffered events are lost.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use restmux::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())
///     .expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    registry
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
