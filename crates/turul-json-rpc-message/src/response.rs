use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{
    ClassifyError, ConstructionError, InvalidMessage, JsonRpcErrorObject, ParseError,
};
use crate::keys;
use crate::types::{JsonRpcVersion, RequestId};

/// Which member a response carries.
///
/// Presence, not nullness, decides the variant: `Result(Value::Null)` is a
/// valid result response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Result(Value),
    Error(JsonRpcErrorObject),
}

/// A JSON-RPC response, carrying exactly one of `result` or `error`.
///
/// Encoded field order is `jsonrpc, result|error, id`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    version: JsonRpcVersion,
    id: RequestId,
    outcome: ResponseOutcome,
}

impl JsonRpcResponse {
    fn new(id: RequestId, outcome: ResponseOutcome) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            outcome,
        }
    }

    /// Successful response. `Value::Null` is a legal result.
    pub fn with_result(result: impl Into<Value>, id: impl Into<RequestId>) -> Self {
        Self::new(id.into(), ResponseOutcome::Result(result.into()))
    }

    /// Error response. Fails with [`ConstructionError::NilResponseError`] when
    /// no error object is supplied.
    pub fn with_error(
        error: impl Into<Option<JsonRpcErrorObject>>,
        id: impl Into<RequestId>,
    ) -> Result<Self, ConstructionError> {
        let error = error.into().ok_or(ConstructionError::NilResponseError)?;
        Ok(Self::new(id.into(), ResponseOutcome::Error(error)))
    }

    /// Error response answering a document that failed classification.
    pub fn for_rejected(id: impl Into<RequestId>, err: &ClassifyError) -> Self {
        Self::new(id.into(), ResponseOutcome::Error(JsonRpcErrorObject::from(err)))
    }

    pub fn jsonrpc_version(&self) -> &'static str {
        self.version.as_str()
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn outcome(&self) -> &ResponseOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> ResponseOutcome {
        self.outcome
    }

    pub fn is_result(&self) -> bool {
        matches!(self.outcome, ResponseOutcome::Result(_))
    }

    pub fn is_error(&self) -> bool {
        !self.is_result()
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            ResponseOutcome::Result(value) => Some(value),
            ResponseOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcErrorObject> {
        match &self.outcome {
            ResponseOutcome::Error(error) => Some(error),
            ResponseOutcome::Result(_) => None,
        }
    }

    fn from_wire(wire: ResponseWire) -> Result<Self, InvalidMessage> {
        let outcome = match (wire.result, wire.error) {
            (Field::Present(_), Field::Present(_)) => return Err(InvalidMessage::AmbiguousResponse),
            (Field::Present(result), Field::Absent | Field::Null) => ResponseOutcome::Result(result),
            (Field::Absent | Field::Null, Field::Present(error)) => ResponseOutcome::Error(error),
            // Only a `result` key whose value is null, with no `error` key
            (Field::Null, Field::Absent) => ResponseOutcome::Result(Value::Null),
            (Field::Null, Field::Null) => return Err(InvalidMessage::AmbiguousResponse),
            (Field::Absent, Field::Absent | Field::Null) => {
                return Err(InvalidMessage::MissingResponsePayload);
            }
        };
        Ok(Self {
            version: wire.version,
            id: wire.id,
            outcome,
        })
    }

    pub(crate) fn decode(document: Value) -> Result<Self, ClassifyError> {
        let wire: ResponseWire = serde_json::from_value(document)?;
        Ok(Self::from_wire(wire)?)
    }
}

impl Serialize for JsonRpcResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("JsonRpcResponse", 3)?;
        state.serialize_field(keys::VERSION, &self.version)?;
        match &self.outcome {
            ResponseOutcome::Result(result) => state.serialize_field(keys::RESULT, result)?,
            ResponseOutcome::Error(error) => state.serialize_field(keys::ERROR, error)?,
        }
        state.serialize_field(keys::ID, &self.id)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for JsonRpcResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = ResponseWire::deserialize(deserializer)?;
        Self::from_wire(wire).map_err(|reason| serde::de::Error::custom(ParseError::from(reason)))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseWire {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    #[serde(default)]
    result: Field<Value>,
    #[serde(default)]
    error: Field<JsonRpcErrorObject>,
    id: RequestId,
}

/// Presence-preserving field: absent, present as null, or present with a value.
///
/// `Option<T>` alone cannot tell `{"result": null}` from `{}`.
#[derive(Debug, Clone, PartialEq, Default)]
enum Field<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

// absent = Absent (via #[serde(default)]), null = Null, value = Present
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<T> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(Field::Null),
            Some(v) => Ok(Field::Present(v)),
        }
    }
}
