//! # Router Module
//!
//! The router indexes [`Route`](crate::route::Route)s by HTTP method and path
//! template, and resolves an incoming method and path to at most one of them.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Rejecting a route whose method and template shape are already taken
//! - Matching request paths segment by segment against registered templates
//! - Capturing the concrete segments at argument positions, in template order
//!
//! It does not decode, parse or invoke anything; that is the job of the
//! [`Mux`](crate::mux::Mux) and the route itself.
//!
//! ## Matching Rules
//!
//! - Paths are split on `/` after trimming leading and trailing slashes, so
//!   `/items/` and `items` are the same path and `/` has zero segments.
//! - A literal segment matches only itself; an argument matches any segment.
//! - The segment count must match exactly.
//! - When both a literal and an argument could match, the literal wins; if
//!   the literal branch does not complete the path, the argument is tried.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use restmux::route::Route;
//! use restmux::router::Router;
//!
//! let mut router = Router::new();
//! router.add(Route::new("/items/:id", Method::GET, |_id: i64| ()).unwrap()).unwrap();
//! router.add(Route::new("/items/new", Method::GET, || ()).unwrap()).unwrap();
//!
//! let m = router.route(&Method::GET, "/items/42").unwrap();
//! assert_eq!(m.route.path().to_string(), "/items/:id");
//! assert_eq!(m.args.as_slice(), ["42"]);
//!
//! let m = router.route(&Method::GET, "/items/new").unwrap();
//! assert!(m.args.is_empty());
//!
//! assert!(router.route(&Method::POST, "/items/42").is_none());
//! ```
//!
//! ## Performance
//!
//! One trie per method; lookup cost grows with the depth of the request path,
//! not the number of registered routes, as long as no literal branch has to be
//! abandoned for its argument sibling. Backtracking can visit the whole
//! abandoned subtrie. Captured arguments are stored inline
//! for up to [`MAX_INLINE_ARGS`](crate::path::MAX_INLINE_ARGS) segments.

mod core;
mod radix;

pub use crate::path::ArgVec;
pub use core::{RouteMatch, Router};
