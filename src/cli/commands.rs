use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::header::CONTENT_TYPE;
use http::{Method, Request};
use std::io::Write;
use std::path::PathBuf;

use super::demo::ItemService;
use crate::config::ServiceConfig;
use crate::logging::init_logging_with_config;
use crate::mux::Mux;

/// Command-line interface for restmux
#[derive(Parser, Debug)]
#[command(name = "restmux")]
#[command(about = "Typed REST dispatch demo", long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "RESTMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered routes
    Routes,
    /// Dispatch a single request through the mux
    Call {
        /// HTTP method (GET, POST, PUT, DELETE, ...)
        method: String,

        /// Request path, including the mux root
        path: String,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,

        /// Content type sent with the body
        #[arg(long, default_value = "application/json")]
        content_type: String,
    },
}

impl Cli {
    /// Load the configuration this invocation asks for.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::from_env(),
        };
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(config)
    }
}

/// Build the demo mux described by `config`.
///
/// # Errors
///
/// Fails if a demo route is rejected at registration.
pub fn build_mux(config: &ServiceConfig) -> Result<Mux> {
    let mut mux = Mux::from_config(&config.mux);
    mux.add_service(&ItemService::seeded())
        .context("Failed to register demo routes")?;
    Ok(mux)
}

/// Parse arguments, initialize logging and run the command on stdout.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, logging cannot be
/// initialized, or the command fails.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.service_config()?;
    let _guard = init_logging_with_config(&config.logging)?;

    let stdout = std::io::stdout();
    execute(&cli, &config, &mut stdout.lock())
}

/// Run a parsed command against `config`, writing its output to `out`.
pub fn execute(cli: &Cli, config: &ServiceConfig, out: &mut impl Write) -> Result<()> {
    let mux = build_mux(config)?;

    match &cli.command {
        Commands::Routes => {
            for route in mux.router().routes() {
                writeln!(out, "{:<7} {}", route.method().as_str(), route.path())?;
            }
        }
        Commands::Call {
            method,
            path,
            body,
            content_type,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;

            let mut builder = Request::builder().method(method).uri(path.as_str());
            if body.is_some() {
                builder = builder.header(CONTENT_TYPE, content_type.as_str());
            }
            let request = builder
                .body(body.clone().unwrap_or_default().into_bytes())
                .context("Invalid request")?;

            let response = mux.serve(request);
            writeln!(out, "{}", response.status())?;
            let text = String::from_utf8_lossy(response.body());
            let text = text.trim_end();
            if !text.is_empty() {
                writeln!(out, "{text}")?;
            }
        }
    }
    Ok(())
}
