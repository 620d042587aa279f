//! # Error Module
//!
//! Every failure restmux reports, whether at registration time or per request,
//! is an [`Error`]: a tag from the closed [`ErrorKind`] taxonomy plus the
//! underlying cause as an [`anyhow::Error`].
//!
//! ## Registration vs. request failures
//!
//! - [`ErrorKind::InvalidRoute`] is only produced while routes are being
//!   registered. It means a handler does not fit its path template (wrong
//!   arity, unsupported argument type, malformed output shape) or that two
//!   routes collide. Services should treat it as fatal and abort startup.
//! - Every other kind is produced per request (or per outbound client call)
//!   and is returned to the caller as a value. Nothing in the dispatch path
//!   panics or exits on these.
//!
//! ## Status codes
//!
//! The core never picks HTTP status codes itself; [`ErrorKind::status_code`]
//! is the default table the [`Mux`](crate::mux::Mux) uses, and an error hook
//! can override it per error by returning a [`CodedError`].

use http::StatusCode;
use std::fmt;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Closed taxonomy of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A route failed validation or conflicts with an already registered one.
    InvalidRoute,
    /// A path argument failed to parse, or a body failed to decode.
    UnmarshalError,
    /// A handler result failed to encode as JSON.
    MarshalError,
    /// The handler returned an error.
    HandlerError,
    /// No route matches the method and path.
    UnknownRoute,
    /// A body was sent with a content type other than JSON.
    UnsupportedContentType,
    /// The request or response body could not be read.
    ReadBodyError,
    /// Client side: the outbound request could not be built.
    NewRequestError,
    /// Client side: the outbound request could not be sent.
    SendRequestError,
    /// Client side: the remote endpoint answered with an error status.
    EndpointError,
    /// Client side: the remote endpoint answered with a status outside 2xx.
    UnexpectedStatusCode,
}

impl ErrorKind {
    /// Stable name of the kind, as used in logs and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRoute => "InvalidRoute",
            ErrorKind::UnmarshalError => "UnmarshalError",
            ErrorKind::MarshalError => "MarshalError",
            ErrorKind::HandlerError => "HandlerError",
            ErrorKind::UnknownRoute => "UnknownRoute",
            ErrorKind::UnsupportedContentType => "UnsupportedContentType",
            ErrorKind::ReadBodyError => "ReadBodyError",
            ErrorKind::NewRequestError => "NewRequestError",
            ErrorKind::SendRequestError => "SendRequestError",
            ErrorKind::EndpointError => "EndpointError",
            ErrorKind::UnexpectedStatusCode => "UnexpectedStatusCode",
        }
    }

    /// Default HTTP status used by the mux when answering with this kind.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::UnknownRoute => StatusCode::NOT_FOUND,
            ErrorKind::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::MarshalError | ErrorKind::InvalidRoute => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::NewRequestError
            | ErrorKind::SendRequestError
            | ErrorKind::EndpointError
            | ErrorKind::UnexpectedStatusCode => StatusCode::BAD_GATEWAY,
            ErrorKind::UnmarshalError | ErrorKind::HandlerError | ErrorKind::ReadBodyError => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged error: a kind from [`ErrorKind`] plus its underlying cause.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: anyhow::Error,
}

impl Error {
    /// Wrap `source` under `kind`.
    pub fn new(kind: ErrorKind, source: impl Into<anyhow::Error>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// Build an error whose cause is a plain message.
    pub fn msg<M>(kind: ErrorKind, message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(kind, anyhow::Error::msg(message))
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The underlying cause.
    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        &self.source
    }

    /// Split into kind and cause, e.g. to hand both to an error hook.
    #[must_use]
    pub fn into_parts(self) -> (ErrorKind, anyhow::Error) {
        (self.kind, self.source)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// An error that carries the HTTP status the mux should answer with.
///
/// Return one (wrapped in an `anyhow::Error`) from a mux error hook to
/// override the default status of an [`ErrorKind`]. The response body is the
/// message of the wrapped cause.
#[derive(Debug)]
pub struct CodedError {
    pub code: StatusCode,
    pub source: anyhow::Error,
}

impl CodedError {
    pub fn new(code: StatusCode, source: impl Into<anyhow::Error>) -> Self {
        Self {
            code,
            source: source.into(),
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CodedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
