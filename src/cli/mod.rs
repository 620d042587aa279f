//! # CLI Module
//!
//! Command-line front end for poking at a mux without a network in between.
//! It mounts the demo [`ItemService`] and dispatches requests in-process.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the registered routes:
//!
//! ```bash
//! restmux routes
//! ```
//!
//! ### `call`
//!
//! Dispatch one request through the mux and print the status and body:
//!
//! ```bash
//! restmux call GET /items/1
//! restmux call POST /items --body '{"name": "sprocket"}'
//! restmux --config service.yaml call DELETE /api/items/2
//! ```
//!
//! ## Configuration
//!
//! `--config` points at a YAML or TOML [`ServiceConfig`](crate::config::ServiceConfig);
//! without it, defaults plus `RESTMUX_*` environment variables are used.

mod commands;
mod demo;


pub use commands::{build_mux, execute, run_cli, Cli, Commands};
pub use demo::{Item, ItemService, NewItem};
