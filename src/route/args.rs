//! Type-directed parsing of path arguments.
//!
//! Path segments arrive as strings. A handler argument bound from a segment
//! must be one of the scalar kinds in [`ArgKind`]; the kind is resolved once
//! per handler argument at registration time and each request only parses the
//! string.
//!
//! Parsing goes through [`SegmentDeserializer`], a minimal serde deserializer
//! over a single segment. Asking it for an `i16` parses the segment as an
//! `i16`, so integer widths are enforced by the target type itself.

use serde::de::{self, Visitor};
use serde::forward_to_deserialize_any;
use std::any::{type_name, TypeId};
use std::fmt;

/// Kinds of values that can be derived from a raw path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Text,
    Bool,
    Int,
    Uint,
    Float,
}

impl ArgKind {
    /// Resolve the kind of `T`, or `None` if `T` cannot come from a segment.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Option<ArgKind> {
        let id = TypeId::of::<T>();
        let is = |ids: &[TypeId]| ids.contains(&id);

        if is(&[TypeId::of::<String>()]) {
            Some(ArgKind::Text)
        } else if is(&[TypeId::of::<bool>()]) {
            Some(ArgKind::Bool)
        } else if is(&[
            TypeId::of::<i8>(),
            TypeId::of::<i16>(),
            TypeId::of::<i32>(),
            TypeId::of::<i64>(),
            TypeId::of::<i128>(),
            TypeId::of::<isize>(),
        ]) {
            Some(ArgKind::Int)
        } else if is(&[
            TypeId::of::<u8>(),
            TypeId::of::<u16>(),
            TypeId::of::<u32>(),
            TypeId::of::<u64>(),
            TypeId::of::<u128>(),
            TypeId::of::<usize>(),
        ]) {
            Some(ArgKind::Uint)
        } else if is(&[TypeId::of::<f32>(), TypeId::of::<f64>()]) {
            Some(ArgKind::Float)
        } else {
            None
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Text => "text",
            ArgKind::Bool => "boolean",
            ArgKind::Int => "signed integer",
            ArgKind::Uint => "unsigned integer",
            ArgKind::Float => "floating point",
        };
        f.write_str(name)
    }
}

/// Descriptor of one handler input, computed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputType {
    type_name: &'static str,
    kind: Option<ArgKind>,
}

impl InputType {
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_name: type_name::<T>(),
            kind: ArgKind::of::<T>(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The segment kind, `None` if this input can only be bound from a body.
    #[must_use]
    pub fn kind(&self) -> Option<ArgKind> {
        self.kind
    }
}

/// Failure to turn a path segment into the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgError {
    message: String,
}

impl ArgError {
    fn invalid(raw: &str, expected: &str, reason: impl fmt::Display) -> Self {
        Self {
            message: format!("invalid {expected} argument {raw:?}: {reason}"),
        }
    }
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ArgError {}

impl de::Error for ArgError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self {
            message: msg.to_string(),
        }
    }
}

/// Boolean spellings accepted in path segments.
fn parse_bool(raw: &str) -> Result<bool, ArgError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ArgError::invalid(raw, "bool", "invalid syntax")),
    }
}

/// Deserializer over a single raw path segment.
pub struct SegmentDeserializer<'a> {
    raw: &'a str,
}

impl<'a> SegmentDeserializer<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                let value = self
                    .raw
                    .parse::<$ty>()
                    .map_err(|e| ArgError::invalid(self.raw, stringify!($ty), e))?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for SegmentDeserializer<'_> {
    type Error = ArgError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_bool(parse_bool(self.raw)?)
    }

    deserialize_number! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.raw.to_owned())
    }

    forward_to_deserialize_any! {
        char bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}
