//! Decides whether a handler body counts as "nothing to send".
//!
//! Only the top-level value matters: `None`, `()` and `""` are empty, while
//! the same values nested in `Some`, a sequence or a struct are real content.
//! The walk also rejects non-finite floats anywhere in the value, since JSON
//! has no encoding for them.

use serde::ser::{self, Serialize};
use std::fmt;

#[derive(Debug)]
pub(crate) struct EmptyCheckError(String);

impl fmt::Display for EmptyCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for EmptyCheckError {}

impl ser::Error for EmptyCheckError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Returns `Ok(true)` when `value` should produce an empty response.
pub(crate) fn is_empty_body<T: Serialize + ?Sized>(value: &T) -> Result<bool, EmptyCheckError> {
    value.serialize(EmptyCheck { top: true })
}

#[derive(Clone, Copy)]
struct EmptyCheck {
    top: bool,
}

const NESTED: EmptyCheck = EmptyCheck { top: false };

fn finite(v: f64) -> Result<bool, EmptyCheckError> {
    if v.is_finite() {
        Ok(false)
    } else {
        Err(EmptyCheckError(format!("unsupported value: {v}")))
    }
}

/// Walks the children of a compound value; never empty itself.
struct Compound;

impl ser::Serializer for EmptyCheck {
    type Ok = bool;
    type Error = EmptyCheckError;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_bool(self, _v: bool) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_i8(self, _v: i8) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_i16(self, _v: i16) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_i32(self, _v: i32) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_i64(self, _v: i64) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_i128(self, _v: i128) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_u8(self, _v: u8) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_u16(self, _v: u16) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_u32(self, _v: u32) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_u64(self, _v: u64) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_u128(self, _v: u128) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_f32(self, v: f32) -> Result<bool, Self::Error> {
        finite(f64::from(v))
    }
    fn serialize_f64(self, v: f64) -> Result<bool, Self::Error> {
        finite(v)
    }
    fn serialize_char(self, _v: char) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_str(self, v: &str) -> Result<bool, Self::Error> {
        Ok(self.top && v.is_empty())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_none(self) -> Result<bool, Self::Error> {
        Ok(self.top)
    }
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<bool, Self::Error> {
        value.serialize(NESTED).map(|_| false)
    }
    fn serialize_unit(self) -> Result<bool, Self::Error> {
        Ok(self.top)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool, Self::Error> {
        Ok(false)
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<bool, Self::Error> {
        Ok(false)
    }
    // Transparent wrappers keep the emptiness of what they wrap.
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<bool, Self::Error> {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<bool, Self::Error> {
        value.serialize(NESTED).map(|_| false)
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_tuple(self, _len: usize) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, Self::Error> {
        Ok(Compound)
    }
}

impl Compound {
    fn visit<T: Serialize + ?Sized>(value: &T) -> Result<(), EmptyCheckError> {
        value.serialize(NESTED).map(|_| ())
    }
}

macro_rules! compound_elements {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl ser::$trait for Compound {
                type Ok = bool;
                type Error = EmptyCheckError;

                fn $method<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
                    Compound::visit(value)
                }

                fn end(self) -> Result<bool, Self::Error> {
                    Ok(false)
                }
            }
        )*
    };
}

compound_elements!(
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
);

impl ser::SerializeMap for Compound {
    type Ok = bool;
    type Error = EmptyCheckError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        Compound::visit(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        Compound::visit(value)
    }

    fn end(self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

macro_rules! compound_fields {
    ($($trait:ident),* $(,)?) => {
        $(
            impl ser::$trait for Compound {
                type Ok = bool;
                type Error = EmptyCheckError;

                fn serialize_field<T: Serialize + ?Sized>(
                    &mut self,
                    _key: &'static str,
                    value: &T,
                ) -> Result<(), Self::Error> {
                    Compound::visit(value)
                }

                fn end(self) -> Result<bool, Self::Error> {
                    Ok(false)
                }
            }
        )*
    };
}

compound_fields!(SerializeStruct, SerializeStructVariant);
