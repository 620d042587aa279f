//! # restmux
//!
//! **restmux** binds HTTP method and templated path pairs to plain Rust
//! functions. Handlers take natural argument lists and return natural results;
//! argument extraction, body decoding and response encoding happen around them.
//!
//! ## Overview
//!
//! ```rust
//! use http::{Method, Request, StatusCode};
//! use restmux::mux::Mux;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct Item { id: u64, name: String }
//!
//! #[derive(Deserialize)]
//! struct Rename { name: String }
//!
//! let mut mux = Mux::new();
//! mux.add_route("/items/:id", Method::PUT, |id: u64, body: Rename| {
//!     Ok::<_, anyhow::Error>(Item { id, name: body.name })
//! })?;
//!
//! let req = Request::put("/items/7")
//!     .header("Content-Type", "application/json")
//!     .body(br#"{"name":"sprocket"}"#.to_vec())
//!     .unwrap();
//! let resp = mux.serve(req);
//! assert_eq!(resp.status(), StatusCode::OK);
//! assert_eq!(resp.body(), br#"{"id":7,"name":"sprocket"}"#);
//! # Ok::<(), restmux::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - **[`path`]** - Template parsing (`/items/:id`) and positional matching
//! - **[`route`]** - The handler contract: shape validation at registration,
//!   argument binding and result interpretation per call
//! - **[`router`]** - Per-method segment trie resolving requests to routes
//! - **[`mux`]** - HTTP boundary: root prefix, content type, status mapping,
//!   error hook and fallback
//! - **[`client`]** - Blocking client speaking the same conventions
//! - **[`error`]** - The closed error taxonomy shared by all of the above
//! - **[`config`]** / **[`logging`]** - Service configuration and tracing setup
//! - **[`cli`]** - The `restmux` binary and its demo service
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as Embedding server
//!     participant Mux
//!     participant Router
//!     participant Route
//!     participant Handler
//!
//!     Server->>Mux: serve(Request<Vec<u8>>)
//!     Mux->>Router: route(method, path below root)
//!     alt no match
//!         Router-->>Mux: None
//!         Mux-->>Server: fallback or 404 UnknownRoute
//!     end
//!     Router-->>Mux: (Route, args)
//!     Mux->>Mux: percent-decode args, check Content-Type
//!     Mux->>Route: invoke(args, body)
//!     Route->>Route: parse args, decode JSON body
//!     Route->>Handler: call
//!     Handler-->>Route: return value
//!     Route-->>Mux: encoded body or Error
//!     Mux-->>Server: 200 JSON / 204 / text error
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous. Routes are registered through `&mut Mux` at
//! startup; afterwards the mux is `Send + Sync` and serves any number of
//! threads through `&self` without locking. Handlers must be `Fn + Send +
//! Sync`; shared state goes behind whatever synchronization the service picks.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod mux;
pub mod path;
pub mod route;
pub mod router;

pub use client::Client;
pub use error::{CodedError, Error, ErrorKind, Result};
pub use mux::{Mux, Routable};
pub use path::Path;
pub use route::{Json, Route, Routes};
pub use router::Router;
