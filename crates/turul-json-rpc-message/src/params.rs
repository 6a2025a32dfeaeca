use serde::Serialize;
use serde_json::{Map, Value};

use crate::shape::ParamsShape;

/// Parameters for a JSON-RPC request or notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Get a parameter by name (for object params)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None, // Can't get by name from array
        }
    }

    /// Get a parameter by index (for array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None, // Can't get by index from object
        }
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
        }
    }

    pub fn shape(&self) -> ParamsShape {
        match self {
            RequestParams::Object(_) => ParamsShape::Object,
            RequestParams::Array(_) => ParamsShape::Array,
        }
    }

    /// Convert to a serde_json::Value for serialization
    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => Value::Object(map.clone()),
            RequestParams::Array(arr) => Value::Array(arr.clone()),
        }
    }

    /// Decode-side check: a present `params` member must be an array or an
    /// object. `null` is read as "no params".
    pub(crate) fn from_wire(value: Option<Value>) -> Result<Option<Self>, ParamsShape> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(arr)) => Ok(Some(RequestParams::Array(arr))),
            Some(Value::Object(map)) => Ok(Some(RequestParams::Object(map))),
            Some(other) => Err(ParamsShape::of_value(&other)),
        }
    }

    /// Construction-side check for an arbitrary caller value.
    ///
    /// `None`/`()` yields no params. Sequences and string-keyed maps or structs
    /// are converted; any other shape is reported back to the caller.
    pub(crate) fn from_serialize<P: Serialize + ?Sized>(
        params: &P,
    ) -> Result<Option<Self>, ParamsShape> {
        let shape = ParamsShape::probe(params);
        if shape == ParamsShape::Absent {
            return Ok(None);
        }
        if !shape.is_structured() {
            return Err(shape);
        }
        let value =
            serde_json::to_value(params).map_err(|_| ParamsShape::Unserializable)?;
        Self::from_wire(Some(value))
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

impl TryFrom<Value> for RequestParams {
    type Error = ParamsShape;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(arr) => Ok(RequestParams::Array(arr)),
            Value::Object(map) => Ok(RequestParams::Object(map)),
            other => Err(ParamsShape::of_value(&other)),
        }
    }
}
