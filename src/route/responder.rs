//! Handler return shapes.
//!
//! A handler may produce at most two outputs: a body that gets JSON-encoded
//! into the response, and an error. [`Responder`] describes which of those a
//! return type carries and splits a returned value into them.
//!
//! | Return type          | Outputs          |
//! |----------------------|------------------|
//! | `()`                 | none             |
//! | `Json<T>`            | body             |
//! | `Result<(), E>`      | error            |
//! | `Result<T, E>`       | body, error      |
//! | `(T, Option<E>)`     | body, error      |
//!
//! The output list is checked once when a route is registered, so a custom
//! `Responder` that declares two error outputs is rejected up front.

use serde::Serialize;
use std::any::TypeId;

/// Role of one handler output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Body,
    Error,
}

/// A handler's outputs after it returned.
pub struct Outputs<B> {
    pub body: Option<B>,
    pub error: Option<anyhow::Error>,
}

impl<B> Outputs<B> {
    #[must_use]
    pub fn none() -> Self {
        Self {
            body: None,
            error: None,
        }
    }
}

/// Return types a handler is allowed to have.
pub trait Responder: 'static {
    /// Type of the body output (`()` when there is none).
    type Body: Serialize;

    /// Output slots this type carries, in declaration order.
    fn outputs() -> &'static [OutputKind];

    fn into_outputs(self) -> Outputs<Self::Body>;
}

/// Marks a handler result as a JSON response body.
///
/// Needed for handlers that return a body and no error; handlers returning
/// `Result<T, E>` do not need it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl Responder for () {
    type Body = ();

    fn outputs() -> &'static [OutputKind] {
        &[]
    }

    fn into_outputs(self) -> Outputs<()> {
        Outputs::none()
    }
}

impl<T> Responder for Json<T>
where
    T: Serialize + 'static,
{
    type Body = T;

    fn outputs() -> &'static [OutputKind] {
        &[OutputKind::Body]
    }

    fn into_outputs(self) -> Outputs<T> {
        Outputs {
            body: Some(self.0),
            error: None,
        }
    }
}

fn body_and_error<T: 'static>() -> &'static [OutputKind] {
    if TypeId::of::<T>() == TypeId::of::<()>() {
        &[OutputKind::Error]
    } else {
        &[OutputKind::Body, OutputKind::Error]
    }
}

impl<T, E> Responder for Result<T, E>
where
    T: Serialize + 'static,
    E: Into<anyhow::Error> + 'static,
{
    type Body = T;

    fn outputs() -> &'static [OutputKind] {
        body_and_error::<T>()
    }

    fn into_outputs(self) -> Outputs<T> {
        match self {
            Ok(body) => Outputs {
                body: Some(body),
                error: None,
            },
            Err(err) => Outputs {
                body: None,
                error: Some(err.into()),
            },
        }
    }
}

/// A body and an optional error returned side by side. When both are set the
/// error wins and the body is discarded.
impl<T, E> Responder for (T, Option<E>)
where
    T: Serialize + 'static,
    E: Into<anyhow::Error> + 'static,
{
    type Body = T;

    fn outputs() -> &'static [OutputKind] {
        body_and_error::<T>()
    }

    fn into_outputs(self) -> Outputs<T> {
        let (body, error) = self;
        Outputs {
            body: Some(body),
            error: error.map(Into::into),
        }
    }
}
