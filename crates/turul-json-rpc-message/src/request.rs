use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::{ClassifyError, ConstructionError, InvalidMessage, ParseError},
    params::RequestParams,
    types::{JsonRpcVersion, RequestId},
};

/// A JSON-RPC request
///
/// Encoded field order is `jsonrpc, method, params, id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<RequestParams>,
    id: RequestId,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestWire {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    method: String,
    #[serde(default)]
    params: Option<Value>,
    id: RequestId,
}

impl JsonRpcRequest {
    /// Create a new request with no parameters
    pub fn new(method: impl Into<String>, id: impl Into<RequestId>) -> Self {
        Self::from_parts(method, None, id)
    }

    pub fn from_parts(
        method: impl Into<String>,
        params: Option<RequestParams>,
        id: impl Into<RequestId>,
    ) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params,
            id: id.into(),
        }
    }

    /// Create a request from any serializable params value.
    ///
    /// Same shape rules as [`crate::JsonRpcNotification::with_params`].
    pub fn with_params<P>(
        method: impl Into<String>,
        params: &P,
        id: impl Into<RequestId>,
    ) -> Result<Self, ConstructionError>
    where
        P: Serialize + ?Sized,
    {
        let params = RequestParams::from_serialize(params)
            .map_err(|found| ConstructionError::InvalidRequestParams { found })?;
        Ok(Self::from_parts(method, params, id))
    }

    pub fn jsonrpc_version(&self) -> &'static str {
        self.version.as_str()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&RequestParams> {
        self.params.as_ref()
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }

    pub fn into_parts(self) -> (String, Option<RequestParams>, RequestId) {
        (self.method, self.params, self.id)
    }

    fn from_wire(wire: RequestWire) -> Result<Self, InvalidMessage> {
        let params = RequestParams::from_wire(wire.params).map_err(InvalidMessage::InvalidParams)?;
        Ok(Self {
            version: wire.version,
            method: wire.method,
            params,
            id: wire.id,
        })
    }

    pub(crate) fn decode(document: Value) -> Result<Self, ClassifyError> {
        let wire: RequestWire = serde_json::from_value(document)?;
        Ok(Self::from_wire(wire)?)
    }
}

impl<'de> Deserialize<'de> for JsonRpcRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = RequestWire::deserialize(deserializer)?;
        Self::from_wire(wire).map_err(|reason| serde::de::Error::custom(ParseError::from(reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ParamsShape;
    use serde_json::{from_str, json, to_string};
    use std::collections::BTreeMap;

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new("test_method", 1u64);

        let json = to_string(&request).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","method":"test_method","id":1}"#);

        let parsed: JsonRpcRequest = from_str(&json).unwrap();
        assert_eq!(parsed.id(), RequestId::new(1));
        assert_eq!(parsed.method(), "test_method");
        assert!(parsed.params().is_none());
    }

    #[test]
    fn test_request_with_object_params() {
        let request = JsonRpcRequest::with_params(
            "set_value",
            &json!({"name": "test", "value": 42}),
            7u64,
        )
        .unwrap();

        assert_eq!(request.get_param("name"), Some(&json!("test")));
        assert_eq!(request.get_param("value"), Some(&json!(42)));
        assert_eq!(request.get_param("missing"), None);
        assert_eq!(
            to_string(&request).unwrap(),
            r#"{"jsonrpc":"2.0","method":"set_value","params":{"name":"test","value":42},"id":7}"#
        );
    }

    #[test]
    fn test_request_with_array_params() {
        let request =
            JsonRpcRequest::with_params("process", &vec![json!("test"), json!(42), json!(true)], 2u64)
                .unwrap();

        assert_eq!(request.get_param_index(0), Some(&json!("test")));
        assert_eq!(request.get_param_index(1), Some(&json!(42)));
        assert_eq!(request.get_param_index(2), Some(&json!(true)));
        assert_eq!(request.get_param_index(3), None);
    }

    #[test]
    fn test_request_invalid_params_type() {
        let err = JsonRpcRequest::with_params("m", &3.5, 1u64).unwrap_err();
        assert_eq!(err, ConstructionError::InvalidRequestParams { found: ParamsShape::Scalar });

        let mut int_keys = BTreeMap::new();
        int_keys.insert(10u8, "ten");
        let err = JsonRpcRequest::with_params("m", &int_keys, 1u64).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::InvalidRequestParams { found: ParamsShape::NonStringKeys }
        );
    }

    #[test]
    fn test_request_decode_rejects_negative_id() {
        assert!(from_str::<JsonRpcRequest>(r#"{"jsonrpc":"2.0","method":"m","id":-1}"#).is_err());
        assert!(from_str::<JsonRpcRequest>(r#"{"jsonrpc":"2.0","method":"m","id":"abc"}"#).is_err());
    }

    #[test]
    fn test_request_decode_rejects_unknown_fields() {
        assert!(
            from_str::<JsonRpcRequest>(r#"{"jsonrpc":"2.0","method":"m","id":1,"extra":0}"#)
                .is_err()
        );
    }
}
