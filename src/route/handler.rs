//! The handler contract.
//!
//! Any `Fn(A1, .., An) -> R` with up to eight arguments is a [`Handler`] as
//! long as every argument is `DeserializeOwned` and `R` is a
//! [`Responder`](super::Responder). Whether an argument comes from a path
//! segment or from the request body is decided by position when the route is
//! registered: the first `num_args` arguments are path arguments, an optional
//! final one is the body.

use serde::de::DeserializeOwned;

use super::args::{InputType, SegmentDeserializer};
use super::responder::Responder;
use crate::error::{Error, ErrorKind};

/// Per-request argument source handed to [`Handler::call`].
pub struct Binder<'a> {
    args: &'a [String],
    body: &'a [u8],
    body_arg: Option<usize>,
}

impl<'a> Binder<'a> {
    pub(crate) fn new(args: &'a [String], body: &'a [u8], body_arg: Option<usize>) -> Self {
        Self {
            args,
            body,
            body_arg,
        }
    }

    /// Produce the value for the argument at `position`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnmarshalError`] if the segment does not parse as `T`, the
    /// body is not valid JSON for `T`, or nothing is bound to `position`.
    pub fn bind<T: DeserializeOwned>(&self, position: usize) -> Result<T, Error> {
        if let Some(raw) = self.args.get(position) {
            return T::deserialize(SegmentDeserializer::new(raw))
                .map_err(|e| Error::new(ErrorKind::UnmarshalError, e));
        }
        if self.body_arg == Some(position) {
            return serde_json::from_slice(self.body)
                .map_err(|e| Error::new(ErrorKind::UnmarshalError, e));
        }
        Err(Error::msg(
            ErrorKind::UnmarshalError,
            format!("no value bound to handler argument {position}"),
        ))
    }
}

/// A function that can be bound to a route.
///
/// `Args` is the tuple of argument types; it only exists to let one closure
/// type implement the trait for exactly its own arity.
pub trait Handler<Args>: Send + Sync + 'static {
    type Output: Responder;

    /// Descriptors of the handler's inputs, in order.
    fn inputs() -> Vec<InputType>;

    /// Bind every argument from `binder` and call the function.
    ///
    /// # Errors
    ///
    /// The first binding failure, as returned by [`Binder::bind`].
    fn call(&self, binder: &Binder<'_>) -> Result<Self::Output, Error>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Responder,
            $($arg: DeserializeOwned + 'static,)*
        {
            type Output = R;

            fn inputs() -> Vec<InputType> {
                vec![$(InputType::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn call(&self, binder: &Binder<'_>) -> Result<R, Error> {
                let mut position = 0;
                $(
                    let $arg = binder.bind::<$arg>(position)?;
                    position += 1;
                )*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
impl_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
