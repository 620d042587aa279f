//! # Client Module
//!
//! A small blocking client for JSON REST endpoints, the outbound counterpart
//! of the [`Mux`](crate::mux::Mux).
//!
//! ## Overview
//!
//! Requests are built fluently and never fail half-way: a failure while
//! building (a bad header, a body that does not encode) is recorded and
//! reported when the response is read. Reading a [`Response`] classifies the
//! outcome into the same [`ErrorKind`] taxonomy the mux uses:
//!
//! | Outcome                                  | Kind                     |
//! |------------------------------------------|--------------------------|
//! | request could not be built               | `NewRequestError`, `MarshalError` |
//! | request could not be sent                | `SendRequestError`       |
//! | response body could not be read          | `ReadBodyError`          |
//! | `404`                                    | `UnknownRoute`           |
//! | any other status `>= 400`                | `EndpointError`          |
//! | any other status outside `2xx`           | `UnexpectedStatusCode`   |
//! | `204` when a body was expected           | `UnexpectedStatusCode`   |
//! | body with a non-JSON content type        | `UnsupportedContentType` |
//! | body that does not decode                | `UnmarshalError`         |
//!
//! ## Example
//!
//! ```no_run
//! use http::Method;
//! use restmux::client::Client;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Item { id: i64, name: String }
//!
//! let client = Client::new("http://127.0.0.1:8080").with_root("/api");
//! let item: Item = client
//!     .request(Method::GET)
//!     .path("/items/7")
//!     .send()
//!     .body()?;
//! # Ok::<(), restmux::Error>(())
//! ```

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, ErrorKind};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Join `root` and `path` into one absolute path.
///
/// Empty parts and duplicate separators at the seam are dropped; the result
/// always starts with `/` and never ends with one (except for `/` itself).
///
/// ```rust
/// use restmux::client::join_path;
///
/// assert_eq!(join_path("/api/", "/items/7"), "/api/items/7");
/// assert_eq!(join_path("", "items"), "/items");
/// assert_eq!(join_path("/", ""), "/");
/// ```
#[must_use]
pub fn join_path(root: &str, path: &str) -> String {
    let parts: Vec<&str> = [root, path]
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}

/// Sends requests to one remote host, under an optional root path.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    host: String,
    root: String,
}

impl Client {
    /// A client for `host` (scheme and authority, e.g. `http://10.0.0.1:8080`).
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_http_client(host, reqwest::blocking::Client::new())
    }

    /// A client sending through a preconfigured `reqwest` client (timeouts,
    /// proxies, TLS settings).
    #[must_use]
    pub fn with_http_client(host: impl Into<String>, http: reqwest::blocking::Client) -> Self {
        Self {
            http,
            host: host.into(),
            root: String::new(),
        }
    }

    /// Prefix every request path with `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Start a request with the given method, targeting the root.
    #[must_use]
    pub fn request(&self, method: Method) -> Request {
        Request {
            http: self.http.clone(),
            host: self.host.clone(),
            root: self.root.clone(),
            method,
            path: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            error: None,
        }
    }
}

/// A request under construction.
#[derive(Debug)]
#[must_use = "a request does nothing until sent"]
pub struct Request {
    http: reqwest::blocking::Client,
    host: String,
    root: String,
    method: Method,
    path: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    error: Option<Error>,
}

impl Request {
    /// Set the target path; it is joined under the client's root.
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(join_path(&self.root, path));
        self
    }

    /// Append a header.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        let parsed = HeaderName::from_bytes(key.as_bytes())
            .map_err(anyhow::Error::new)
            .and_then(|name| Ok((name, HeaderValue::from_str(value)?)));
        match parsed {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(e) => self.record(Error::new(
                ErrorKind::NewRequestError,
                e.context(format!("invalid header '{key}'")),
            )),
        }
        self
    }

    /// Encode `body` as the JSON request body.
    pub fn body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(encoded) => self.body = encoded,
            Err(e) => self.record(Error::new(ErrorKind::MarshalError, e)),
        }
        self
    }

    /// Keep the first building failure; it is what the caller needs to fix.
    fn record(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Send the request and wait for the full response.
    ///
    /// Never fails directly; check the returned [`Response`].
    pub fn send(self) -> Response {
        let start = Instant::now();
        let method = self.method.clone();
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| join_path(&self.root, ""));

        let outcome = match self.error {
            Some(err) => Err(err),
            None => execute(
                &self.http,
                &self.host,
                &path,
                self.method,
                self.headers,
                self.body,
            ),
        };
        let latency = start.elapsed();

        match &outcome {
            Ok(exchange) => debug!(
                method = %method,
                host = %self.host,
                path = %path,
                status = exchange.code.as_u16(),
                latency_us = latency.as_micros() as u64,
                "Request completed"
            ),
            Err(err) => warn!(
                method = %method,
                host = %self.host,
                path = %path,
                error = %err,
                "Request failed"
            ),
        }

        Response { outcome, latency }
    }
}

fn execute(
    http: &reqwest::blocking::Client,
    host: &str,
    path: &str,
    method: Method,
    mut headers: HeaderMap,
    body: Vec<u8>,
) -> Result<Exchange, Error> {
    let url = Url::parse(&format!("{}{path}", host.trim_end_matches('/')))
        .map_err(|e| Error::new(ErrorKind::NewRequestError, e))?;

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }

    let mut builder = http.request(method, url).headers(headers);
    if !body.is_empty() {
        builder = builder.body(body);
    }
    let request = builder
        .build()
        .map_err(|e| Error::new(ErrorKind::NewRequestError, e))?;

    let response = http
        .execute(request)
        .map_err(|e| Error::new(ErrorKind::SendRequestError, e))?;

    let code = response.status();
    let headers = response.headers().clone();
    let body = response
        .bytes()
        .map_err(|e| Error::new(ErrorKind::ReadBodyError, e))?
        .to_vec();

    Ok(Exchange {
        code,
        headers,
        body,
    })
}

/// What came back over the wire.
#[derive(Debug)]
struct Exchange {
    code: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// The result of [`Request::send`].
#[derive(Debug)]
pub struct Response {
    outcome: Result<Exchange, Error>,
    latency: Duration,
}

impl Response {
    /// Status code, if a response was received.
    #[must_use]
    pub fn code(&self) -> Option<StatusCode> {
        self.outcome.as_ref().ok().map(|exchange| exchange.code)
    }

    /// Response headers, if a response was received.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.outcome.as_ref().ok().map(|exchange| &exchange.headers)
    }

    /// Undecoded response body; empty if no response was received.
    #[must_use]
    pub fn raw_body(&self) -> &[u8] {
        self.outcome
            .as_ref()
            .map(|exchange| exchange.body.as_slice())
            .unwrap_or_default()
    }

    /// The failure that prevented a response, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }

    /// Round-trip time, building included.
    #[must_use]
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Check the response and decode its JSON body.
    ///
    /// # Errors
    ///
    /// See the module table; a `204` is an error here.
    pub fn body<T: DeserializeOwned>(self) -> Result<T, Error> {
        let exchange = self.checked(true)?;

        let content_type = exchange
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if !essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            return Err(Error::msg(
                ErrorKind::UnsupportedContentType,
                format!("unsupported content type: got '{content_type}' expected '{JSON_CONTENT_TYPE}'"),
            ));
        }

        serde_json::from_slice(&exchange.body).map_err(|e| Error::new(ErrorKind::UnmarshalError, e))
    }

    /// Check the response, ignoring any body.
    ///
    /// # Errors
    ///
    /// See the module table; any `2xx`, including `204`, is a success.
    pub fn no_content(self) -> Result<(), Error> {
        self.checked(false).map(|_| ())
    }

    fn checked(self, expect_body: bool) -> Result<Exchange, Error> {
        let exchange = self.outcome?;
        let code = exchange.code;

        if code == StatusCode::NOT_FOUND {
            return Err(Error::msg(ErrorKind::UnknownRoute, body_text(&exchange.body)));
        }
        if code.as_u16() >= 400 {
            return Err(Error::msg(ErrorKind::EndpointError, body_text(&exchange.body)));
        }
        if !code.is_success() || (expect_body && code == StatusCode::NO_CONTENT) {
            return Err(Error::msg(
                ErrorKind::UnexpectedStatusCode,
                format!("unexpected status code: {}", code.as_u16()),
            ));
        }
        Ok(exchange)
    }
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).trim_end().to_string()
}
