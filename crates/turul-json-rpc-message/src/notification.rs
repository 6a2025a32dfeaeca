use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::{ClassifyError, ConstructionError, InvalidMessage, ParseError},
    params::RequestParams,
    types::JsonRpcVersion,
};

/// A JSON-RPC notification (request without an id)
///
/// The sender does not expect a reply. Encoded field order is
/// `jsonrpc, method, params`; `params` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcNotification {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<RequestParams>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationWire {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a new notification with no parameters
    pub fn new(method: impl Into<String>) -> Self {
        Self::from_parts(method, None)
    }

    /// Create a notification from already-typed parameters.
    pub fn from_parts(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params,
        }
    }

    /// Create a notification from any serializable params value.
    ///
    /// `params` must serialize as a sequence or a string-keyed map (structs
    /// included); `None` and `()` produce a notification without params.
    pub fn with_params<P>(method: impl Into<String>, params: &P) -> Result<Self, ConstructionError>
    where
        P: Serialize + ?Sized,
    {
        let params = RequestParams::from_serialize(params)
            .map_err(|found| ConstructionError::InvalidNotificationParams { found })?;
        Ok(Self::from_parts(method, params))
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

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }

    pub fn into_parts(self) -> (String, Option<RequestParams>) {
        (self.method, self.params)
    }

    fn from_wire(wire: NotificationWire) -> Result<Self, InvalidMessage> {
        let params = RequestParams::from_wire(wire.params).map_err(InvalidMessage::InvalidParams)?;
        Ok(Self {
            version: wire.version,
            method: wire.method,
            params,
        })
    }

    pub(crate) fn decode(document: Value) -> Result<Self, ClassifyError> {
        let wire: NotificationWire = serde_json::from_value(document)?;
        Ok(Self::from_wire(wire)?)
    }
}

impl<'de> Deserialize<'de> for JsonRpcNotification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = NotificationWire::deserialize(deserializer)?;
        Self::from_wire(wire).map_err(|reason| serde::de::Error::custom(ParseError::from(reason)))
    }
}
