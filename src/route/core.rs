use http::Method;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::args::InputType;
use super::empty::is_empty_body;
use super::handler::{Binder, Handler};
use super::responder::{OutputKind, Outputs, Responder};
use crate::error::{Error, ErrorKind};
use crate::path::Path;

/// Most outputs a handler may declare: one body plus one error.
const MAX_OUTPUTS: usize = 2;

type Invoker = dyn Fn(&Binder<'_>) -> Result<Vec<u8>, Error> + Send + Sync;

/// Binding metadata derived once from the handler shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    body_arg: Option<usize>,
    body_output: Option<usize>,
    error_output: Option<usize>,
}

/// A handler bound to an HTTP method and a path template.
///
/// Construction validates the handler against the template; a `Route` that
/// exists is always invocable.
pub struct Route {
    method: Method,
    path: Path,
    inputs: Vec<InputType>,
    binding: Binding,
    invoker: Arc<Invoker>,
}

impl Route {
    /// Bind `handler` to `method` and the template `path`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRoute`] when:
    /// - the handler takes fewer arguments than the path has, or more than
    ///   one extra (the body);
    /// - a path-bound argument is not text, boolean, integer or float;
    /// - the return type declares more than two outputs, or two bodies, or
    ///   two errors.
    ///
    /// These are programming mistakes; callers are expected to abort startup.
    pub fn new<Args, H>(path: &str, method: Method, handler: H) -> Result<Self, Error>
    where
        Args: 'static,
        H: Handler<Args>,
    {
        let path = Path::parse(path);
        let inputs = H::inputs();
        let binding = validate(&method, &path, &inputs, <H::Output as Responder>::outputs())?;

        debug!(
            method = %method,
            path = %path,
            inputs = inputs.len(),
            body_arg = ?binding.body_arg,
            body_output = ?binding.body_output,
            error_output = ?binding.error_output,
            "Route validated"
        );

        let invoker: Arc<Invoker> = Arc::new(move |binder: &Binder<'_>| {
            let outputs = handler.call(binder)?.into_outputs();
            encode_outputs(outputs, binding)
        });

        Ok(Self {
            method,
            path,
            inputs,
            binding,
            invoker,
        })
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn inputs(&self) -> &[InputType] {
        &self.inputs
    }

    /// Handler argument position fed from the request body, if any.
    #[must_use]
    pub fn body_arg(&self) -> Option<usize> {
        self.binding.body_arg
    }

    /// Output slot holding the response body, if any.
    #[must_use]
    pub fn body_output(&self) -> Option<usize> {
        self.binding.body_output
    }

    /// Output slot holding the handler error, if any.
    #[must_use]
    pub fn error_output(&self) -> Option<usize> {
        self.binding.error_output
    }

    /// Bind `args` and `body` to the handler, call it and encode the result.
    ///
    /// An empty `Ok` vector means "no content": the handler has no body
    /// output, or returned an empty one (`()`, `None`, `""`).
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::UnmarshalError`]: wrong number of `args`, an argument
    ///   failed to parse, or the body failed to decode;
    /// - [`ErrorKind::HandlerError`]: the handler returned an error (any body
    ///   it returned alongside is discarded);
    /// - [`ErrorKind::MarshalError`]: the body failed to encode.
    pub fn invoke(&self, args: &[String], body: &[u8]) -> Result<Vec<u8>, Error> {
        if args.len() != self.path.num_args() {
            return Err(Error::msg(
                ErrorKind::UnmarshalError,
                format!(
                    "route {self} expects {} path arguments, got {}",
                    self.path.num_args(),
                    args.len()
                ),
            ));
        }
        let binder = Binder::new(args, body, self.binding.body_arg);
        (self.invoker)(&binder)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} {} }}", self.method, self.path)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path.to_string())
            .field("inputs", &self.inputs)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

fn invalid(method: &Method, path: &Path, detail: impl fmt::Display) -> Error {
    Error::msg(
        ErrorKind::InvalidRoute,
        format!("{detail} for route {{ {method} {path} }}"),
    )
}

fn validate(
    method: &Method,
    path: &Path,
    inputs: &[InputType],
    outputs: &[OutputKind],
) -> Result<Binding, Error> {
    let path_args = path.num_args();
    let handler_args = inputs.len();

    if handler_args > path_args + 1 {
        return Err(invalid(
            method,
            path,
            format!("not enough path arguments: {path_args} < {}", handler_args - 1),
        ));
    }
    if path_args > handler_args {
        return Err(invalid(
            method,
            path,
            format!("too many path arguments: {path_args} > {handler_args}"),
        ));
    }
    let body_arg = (handler_args > path_args).then_some(path_args);

    for (position, input) in inputs.iter().take(path_args).enumerate() {
        if input.kind().is_none() {
            return Err(invalid(
                method,
                path,
                format!(
                    "unsupported type `{}` for path argument {position} \
                     (expected text, boolean, integer or floating point)",
                    input.type_name()
                ),
            ));
        }
    }

    if outputs.len() > MAX_OUTPUTS {
        return Err(invalid(
            method,
            path,
            format!("too many return values: {} > {MAX_OUTPUTS}", outputs.len()),
        ));
    }

    let mut body_output = None;
    let mut error_output = None;
    for (slot, output) in outputs.iter().enumerate() {
        let target = match output {
            OutputKind::Body => &mut body_output,
            OutputKind::Error => &mut error_output,
        };
        if target.is_some() {
            let what = match output {
                OutputKind::Body => "body",
                OutputKind::Error => "error",
            };
            return Err(invalid(method, path, format!("too many {what} return values")));
        }
        *target = Some(slot);
    }

    Ok(Binding {
        body_arg,
        body_output,
        error_output,
    })
}

fn encode_outputs<B: Serialize>(outputs: Outputs<B>, binding: Binding) -> Result<Vec<u8>, Error> {
    if binding.error_output.is_some() {
        if let Some(err) = outputs.error {
            return Err(Error::new(ErrorKind::HandlerError, err));
        }
    }

    let body = match outputs.body {
        Some(body) if binding.body_output.is_some() => body,
        _ => return Ok(Vec::new()),
    };

    if is_empty_body(&body).map_err(|e| Error::new(ErrorKind::MarshalError, e))? {
        return Ok(Vec::new());
    }
    serde_json::to_vec(&body).map_err(|e| Error::new(ErrorKind::MarshalError, e))
}
