//! # Configuration Module
//!
//! File-based service configuration with environment overrides.
//!
//! ## Format
//!
//! YAML (`.yaml`, `.yml`) or TOML (`.toml`), picked by file extension. Every
//! field is optional:
//!
//! ```yaml
//! mux:
//!   root: /api/v1
//! logging:
//!   level: debug
//!   format: pretty
//!   target_filter: "restmux::mux=trace"
//!   include_location: true
//!   async: false
//! ```
//!
//! ## Environment Overrides
//!
//! Applied after the file is read:
//! - `RESTMUX_ROOT` replaces `mux.root`
//! - `RESTMUX_LOG_*` replace the matching `logging` fields (see
//!   [`crate::logging`])

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::logging::LogConfig;

/// Settings for a [`Mux`](crate::mux::Mux).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MuxConfig {
    /// Path prefix every route is mounted under
    pub root: String,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
        }
    }
}

/// Top-level configuration of a restmux service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub mux: MuxConfig,
    pub logging: LogConfig,
}

impl ServiceConfig {
    /// Defaults plus environment overrides, for services without a file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read `path`, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, has an unknown extension, or does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Read `path` without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display())),
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML config {}", path.display())),
            _ => bail!(
                "Unsupported config format for {} (expected .yaml, .yml or .toml)",
                path.display()
            ),
        }
    }

    /// Override fields from `RESTMUX_*` environment variables that are set.
    pub fn apply_env(&mut self) {
        if let Ok(root) = env::var("RESTMUX_ROOT") {
            self.mux.root = root;
        }
        self.logging.apply_env();
    }
}
