//! # Route Module
//!
//! A [`Route`] binds a handler function to an HTTP method and a path
//! template. It is where the typed contract between a template and a plain
//! Rust function is enforced.
//!
//! ## Overview
//!
//! The route is responsible for:
//! - Validating the handler shape against the template, once, at registration
//! - Converting path argument strings into the handler's argument types
//! - Decoding the JSON body into the handler's final argument, if it takes one
//! - Interpreting the handler's return value into a response body or an error
//!
//! ## Handler Shape
//!
//! A handler for a template with `N` arguments takes either `N` arguments, or
//! `N + 1` where the last one is decoded from the request body:
//!
//! ```rust
//! use http::Method;
//! use restmux::route::{Json, Route};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct Item { id: i64, name: String }
//!
//! #[derive(Deserialize)]
//! struct Rename { name: String }
//!
//! // GET /items/:id -> Item
//! let get = Route::new("/items/:id", Method::GET, |id: i64| {
//!     Json(Item { id, name: "widget".into() })
//! }).unwrap();
//!
//! // PUT /items/:id with a JSON body
//! let put = Route::new("/items/:id", Method::PUT, |id: i64, body: Rename| {
//!     Ok::<_, anyhow::Error>(Item { id, name: body.name })
//! }).unwrap();
//!
//! let encoded = get.invoke(&["7".to_string()], b"").unwrap();
//! assert_eq!(encoded, br#"{"id":7,"name":"widget"}"#);
//! assert_eq!(put.body_arg(), Some(1));
//! ```
//!
//! Path-bound arguments must be `String`, `bool`, a signed or unsigned integer
//! or a float; the body argument can be any `DeserializeOwned` type. Return
//! shapes are described in [`Responder`].
//!
//! ## Performance
//!
//! Argument kinds and output slots are resolved when the route is built. Per
//! request the route only parses strings, decodes the body, makes one call and
//! encodes the result.

mod args;
mod core;
mod empty;
mod handler;
mod responder;
#[cfg(test)]
mod tests;

pub use args::{ArgError, ArgKind, InputType, SegmentDeserializer};
pub use core::Route;
pub use handler::{Binder, Handler};
pub use responder::{Json, OutputKind, Outputs, Responder};

/// A list of routes, as returned by a [`Routable`](crate::mux::Routable).
pub type Routes = Vec<Route>;
