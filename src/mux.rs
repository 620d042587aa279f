//! # Mux Module
//!
//! The [`Mux`] is the HTTP boundary of restmux. It takes an already-read
//! request, finds the route, runs it and turns the outcome into a response.
//!
//! ## Overview
//!
//! For every request the mux:
//! 1. Strips its root prefix and resolves the method and path to a route
//! 2. Percent-decodes the captured path arguments
//! 3. Rejects a non-empty body whose `Content-Type` is not JSON
//! 4. Invokes the route with the arguments and the body
//! 5. Answers `204 No Content` for an empty result, or `200` with the JSON
//!    body, `Content-Type` and `Content-Length`
//!
//! Failures are answered in `text/plain` with the error message. The status
//! comes from [`ErrorKind::status_code`] unless the error hook returns a
//! [`CodedError`].
//!
//! The mux does not own a socket. Whatever server embeds it reads the body
//! into a `Vec<u8>` and hands over an `http::Request`.
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, Request, StatusCode};
//! use restmux::mux::Mux;
//! use restmux::route::Json;
//!
//! let mut mux = Mux::with_root("/api");
//! mux.add_route("/double/:n", Method::GET, |n: i64| Json(n * 2)).unwrap();
//!
//! let req = Request::get("/api/double/21").body(Vec::new()).unwrap();
//! let resp = mux.serve(req);
//! assert_eq!(resp.status(), StatusCode::OK);
//! assert_eq!(resp.body(), b"42");
//! ```

use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::MuxConfig;
use crate::error::{CodedError, Error, ErrorKind};
use crate::path::ArgVec;
use crate::route::{Handler, Route, Routes};
use crate::router::Router;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Rewrites a per-request error before it is sent.
pub type ErrorHook = dyn Fn(ErrorKind, anyhow::Error) -> anyhow::Error + Send + Sync;

/// Answers requests that match no route.
pub type Fallback = dyn Fn(&Request<Vec<u8>>) -> Response<Vec<u8>> + Send + Sync;

/// A service that contributes a set of routes to a mux.
pub trait Routable {
    /// The routes to register.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRoute`] if any route fails to build.
    fn rest_routes(&self) -> Result<Routes, Error>;
}

/// Dispatches HTTP requests to registered routes.
///
/// Built and populated at startup through `&mut self`, then shared across
/// request threads through `&self`.
pub struct Mux {
    root: String,
    router: Router,
    error_hook: Option<Box<ErrorHook>>,
    fallback: Option<Box<Fallback>>,
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl Mux {
    /// A mux serving routes directly under `/`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root("/")
    }

    /// A mux serving routes under `root` (e.g. `/api/v1`).
    ///
    /// The root is normalized to a leading `/` with no trailing one, so
    /// `api/`, `/api` and `/api/` are equivalent.
    #[must_use]
    pub fn with_root(root: &str) -> Self {
        let trimmed = root.trim_matches('/');
        Self {
            root: format!("/{trimmed}"),
            router: Router::new(),
            error_hook: None,
            fallback: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &MuxConfig) -> Self {
        Self::with_root(&config.root)
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Install a hook that sees, and may replace, every per-request error.
    ///
    /// Returning a [`CodedError`] sets the response status.
    pub fn set_error_hook<F>(&mut self, hook: F)
    where
        F: Fn(ErrorKind, anyhow::Error) -> anyhow::Error + Send + Sync + 'static,
    {
        self.error_hook = Some(Box::new(hook));
    }

    /// Install the handler used when no route matches.
    pub fn set_fallback<F>(&mut self, fallback: F)
    where
        F: Fn(&Request<Vec<u8>>) -> Response<Vec<u8>> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(fallback));
    }

    /// Build a route from `handler` and register it.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRoute`] if the handler does not fit the template
    /// or the route conflicts with one already registered.
    pub fn add_route<Args, H>(&mut self, path: &str, method: Method, handler: H) -> Result<(), Error>
    where
        Args: 'static,
        H: Handler<Args>,
    {
        let route = Route::new(path, method.clone(), handler).inspect_err(|err| {
            error!(method = %method, path = %path, error = %err, "Route registration failed");
        })?;
        self.add(route)
    }

    /// Register an already built route.
    pub fn add(&mut self, route: Route) -> Result<(), Error> {
        let method = route.method().clone();
        let path = route.path().to_string();
        match self.router.add(route) {
            Ok(()) => {
                info!(method = %method, path = %path, root = %self.root, "Route registered");
                Ok(())
            }
            Err(err) => {
                error!(method = %method, path = %path, error = %err, "Route registration failed");
                Err(err)
            }
        }
    }

    /// Register every route, stopping at the first failure.
    pub fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) -> Result<(), Error> {
        routes.into_iter().try_for_each(|route| self.add(route))
    }

    /// Register all routes a service provides.
    pub fn add_service(&mut self, service: &dyn Routable) -> Result<(), Error> {
        let routes = service.rest_routes().inspect_err(|err| {
            error!(error = %err, "Service routes failed to build");
        })?;
        self.add_routes(routes)
    }

    /// Resolve a full request path (root included) to a route and its
    /// percent-decoded path arguments.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::UnknownRoute`] if the path is outside the root or no
    ///   route matches
    /// - [`ErrorKind::UnmarshalError`] if an argument does not decode to UTF-8
    pub fn resolve(&self, method: &Method, path: &str) -> Result<(Arc<Route>, ArgVec), Error> {
        let unknown = || Error::msg(ErrorKind::UnknownRoute, format!("unknown path: '{path}'"));

        let sub = self.strip_root(path).ok_or_else(unknown)?;
        let found = self.router.route(method, sub).ok_or_else(unknown)?;

        let args = found
            .args
            .iter()
            .map(|raw| {
                urlencoding::decode(raw)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|e| Error::new(ErrorKind::UnmarshalError, e))
            })
            .collect::<Result<ArgVec, Error>>()?;

        Ok((found.route, args))
    }

    /// Answer one request.
    pub fn serve(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let start = Instant::now();
        let method = req.method();
        let path = req.uri().path();

        let (route, args) = match self.resolve(method, path) {
            Ok(found) => found,
            Err(err) if err.kind() == ErrorKind::UnknownRoute => {
                if let Some(fallback) = &self.fallback {
                    warn!(method = %method, path = %path, "No route matched, using fallback handler");
                    return fallback(&req);
                }
                return self.respond_error(err);
            }
            Err(err) => return self.respond_error(err),
        };

        let result = check_content_type(req.headers(), req.body())
            .and_then(|()| route.invoke(&args, req.body()));

        let response = match result {
            Ok(body) => respond_body(body),
            Err(err) => self.respond_error(err),
        };

        debug!(
            method = %method,
            path = %path,
            route = %route,
            status = response.status().as_u16(),
            duration_us = start.elapsed().as_micros() as u64,
            "Request dispatched"
        );
        response
    }

    /// The part of `path` below the root, or `None` if it is outside it.
    fn strip_root<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.root == "/" {
            return Some(path);
        }
        let rest = path.strip_prefix(self.root.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    fn respond_error(&self, err: Error) -> Response<Vec<u8>> {
        let (kind, cause) = err.into_parts();
        let mut status = kind.status_code();

        let cause = match &self.error_hook {
            Some(hook) => hook(kind, cause),
            None => cause,
        };
        let message = match cause.downcast::<CodedError>() {
            Ok(coded) => {
                status = coded.code;
                coded.source.to_string()
            }
            Err(cause) => cause.to_string(),
        };

        debug!(kind = %kind, status = status.as_u16(), error = %message, "Request failed");
        text_response(status, message)
    }
}

impl fmt::Debug for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("root", &self.root)
            .field("routes", &self.router.len())
            .field("error_hook", &self.error_hook.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Only a non-empty body needs a JSON content type; media type parameters
/// such as `charset` are accepted.
fn check_content_type(headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
    if body.is_empty() {
        return Ok(());
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        return Ok(());
    }
    Err(Error::msg(
        ErrorKind::UnsupportedContentType,
        format!("unsupported content type: got '{content_type}' expected '{JSON_CONTENT_TYPE}'"),
    ))
}

fn respond_body(body: Vec<u8>) -> Response<Vec<u8>> {
    if body.is_empty() {
        let mut response = Response::new(Vec::new());
        *response.status_mut() = StatusCode::NO_CONTENT;
        return response;
    }
    let length = body.len();
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn text_response(status: StatusCode, message: String) -> Response<Vec<u8>> {
    let mut body = message.into_bytes();
    body.push(b'\n');
    let length = body.len();
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}
