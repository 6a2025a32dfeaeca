//! Runtime shape detection for caller-supplied params.
//!
//! A value handed to a message constructor is probed through serde before it
//! is converted, so that maps keyed by non-strings are caught instead of being
//! silently stringified by `serde_json::to_value`.

use std::fmt;

use serde::Serialize;
use serde::ser::{
    Impossible, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

/// Top-level shape of a params value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsShape {
    /// `None`, `()` or JSON `null`; treated as "no params".
    Absent,
    /// Ordered sequence.
    Array,
    /// String-keyed mapping.
    Object,
    /// Mapping whose keys are not strings.
    NonStringKeys,
    /// Boolean, number or string.
    Scalar,
    /// Value whose serialization failed.
    Unserializable,
}

impl ParamsShape {
    /// Whether a value of this shape may be carried as `params`.
    pub fn is_structured(&self) -> bool {
        matches!(self, ParamsShape::Array | ParamsShape::Object)
    }

    /// Shape of an already-decoded JSON value.
    pub fn of_value(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ParamsShape::Absent,
            Value::Array(_) => ParamsShape::Array,
            Value::Object(_) => ParamsShape::Object,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => ParamsShape::Scalar,
        }
    }

    /// Probe the shape of any serializable value without converting it.
    pub fn probe<T: Serialize + ?Sized>(value: &T) -> Self {
        value
            .serialize(ShapeProbe)
            .unwrap_or(ParamsShape::Unserializable)
    }
}

impl fmt::Display for ParamsShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamsShape::Absent => "null",
            ParamsShape::Array => "array",
            ParamsShape::Object => "object",
            ParamsShape::NonStringKeys => "map with non-string keys",
            ParamsShape::Scalar => "scalar",
            ParamsShape::Unserializable => "value that failed to serialize",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct ProbeError;

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("shape probe failed")
    }
}

impl std::error::Error for ProbeError {}

impl serde::ser::Error for ProbeError {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        ProbeError
    }
}

struct ShapeProbe;

/// Compound state; elements are never visited, only map keys are checked.
struct ShapeCompound {
    shape: ParamsShape,
}

impl ShapeCompound {
    fn new(shape: ParamsShape) -> Self {
        Self { shape }
    }
}

macro_rules! scalar_shape {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<Self::Ok, Self::Error> {
                Ok(ParamsShape::Scalar)
            }
        )*
    };
}

impl Serializer for ShapeProbe {
    type Ok = ParamsShape;
    type Error = ProbeError;
    type SerializeSeq = ShapeCompound;
    type SerializeTuple = ShapeCompound;
    type SerializeTupleStruct = ShapeCompound;
    type SerializeTupleVariant = ShapeCompound;
    type SerializeMap = ShapeCompound;
    type SerializeStruct = ShapeCompound;
    type SerializeStructVariant = ShapeCompound;

    scalar_shape! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
    }

    // serde_json encodes byte slices as arrays of numbers
    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Array)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Absent)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Absent)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Scalar)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    // Externally tagged: {"Variant": value}
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(ParamsShape::Object)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Array))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Array))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Array))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Object))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Object))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Object))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(ShapeCompound::new(ParamsShape::Object))
    }
}

impl SerializeSeq for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeTuple for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeTupleStruct for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeTupleVariant for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeMap for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        if key.serialize(KeyProbe).is_err() {
            self.shape = ParamsShape::NonStringKeys;
        }
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeStruct for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

impl SerializeStructVariant for ShapeCompound {
    type Ok = ParamsShape;
    type Error = ProbeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.shape)
    }
}

/// Accepts only keys that are strings in the caller's own type.
struct KeyProbe;

macro_rules! reject_key {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<Self::Ok, Self::Error> {
                Err(ProbeError)
            }
        )*
    };
}

impl Serializer for KeyProbe {
    type Ok = ();
    type Error = ProbeError;
    type SerializeSeq = Impossible<(), ProbeError>;
    type SerializeTuple = Impossible<(), ProbeError>;
    type SerializeTupleStruct = Impossible<(), ProbeError>;
    type SerializeTupleVariant = Impossible<(), ProbeError>;
    type SerializeMap = Impossible<(), ProbeError>;
    type SerializeStruct = Impossible<(), ProbeError>;
    type SerializeStructVariant = Impossible<(), ProbeError>;

    fn serialize_str(self, _v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    // Enum keys serialize as their variant name
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    reject_key! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_bytes: &[u8],
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(ProbeError)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(ProbeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize)]
    struct Wrapper(Vec<u8>);

    #[test]
    fn test_probe_sequences() {
        assert_eq!(ParamsShape::probe(&vec![1, 2, 3]), ParamsShape::Array);
        assert_eq!(ParamsShape::probe(&[true, false]), ParamsShape::Array);
        assert_eq!(ParamsShape::probe(&("a", 1)), ParamsShape::Array);
        assert_eq!(ParamsShape::probe(&Wrapper(vec![1])), ParamsShape::Array);
    }

    #[test]
    fn test_probe_string_keyed_maps_and_structs() {
        let mut map = HashMap::new();
        map.insert("key", 1);
        assert_eq!(ParamsShape::probe(&map), ParamsShape::Object);
        assert_eq!(ParamsShape::probe(&Point { x: 1, y: 2 }), ParamsShape::Object);
        assert_eq!(ParamsShape::probe(&json!({"a": 1})), ParamsShape::Object);
    }

    #[test]
    fn test_probe_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(1, "test");
        map.insert(2, "other");
        assert_eq!(ParamsShape::probe(&map), ParamsShape::NonStringKeys);
    }

    #[test]
    fn test_probe_scalars_and_absent() {
        assert_eq!(ParamsShape::probe("invalid params type"), ParamsShape::Scalar);
        assert_eq!(ParamsShape::probe(&42), ParamsShape::Scalar);
        assert_eq!(ParamsShape::probe(&json!(true)), ParamsShape::Scalar);
        assert_eq!(ParamsShape::probe(&Option::<Vec<i32>>::None), ParamsShape::Absent);
        assert_eq!(ParamsShape::probe(&Some(vec![1])), ParamsShape::Array);
        assert_eq!(ParamsShape::probe(&json!(null)), ParamsShape::Absent);
    }

    #[test]
    fn test_shape_of_value() {
        assert_eq!(ParamsShape::of_value(&json!([1])), ParamsShape::Array);
        assert_eq!(ParamsShape::of_value(&json!("x")), ParamsShape::Scalar);
        assert!(ParamsShape::Object.is_structured());
        assert!(!ParamsShape::Scalar.is_structured());
    }
}
