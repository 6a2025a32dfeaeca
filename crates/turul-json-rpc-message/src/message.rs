use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    classify::Classifier,
    keyset::{self, KeySpec},
    notification::JsonRpcNotification,
    request::JsonRpcRequest,
    response::JsonRpcResponse,
    types::RequestId,
};

/// Any JSON-RPC 2.0 message.
///
/// Deserializing a `JsonRpcMessage` runs the full classification engine; use
/// [`crate::classify()`] directly to keep the typed [`crate::ParseError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Notification(JsonRpcNotification),
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
}

/// The wire shapes a document can be classified as, in match precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Notification,
    Request,
    ErrorResponse,
    ResultResponse,
}

impl MessageKind {
    /// Fixed classification precedence.
    pub const PRECEDENCE: [MessageKind; 4] = [
        MessageKind::Notification,
        MessageKind::Request,
        MessageKind::ErrorResponse,
        MessageKind::ResultResponse,
    ];

    pub fn key_spec(&self) -> &'static KeySpec {
        match self {
            MessageKind::Notification => &keyset::NOTIFICATION,
            MessageKind::Request => &keyset::REQUEST,
            MessageKind::ErrorResponse => &keyset::ERROR_RESPONSE,
            MessageKind::ResultResponse => &keyset::RESULT_RESPONSE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.key_spec().name()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonRpcMessage {
    pub fn jsonrpc_version(&self) -> &'static str {
        match self {
            JsonRpcMessage::Notification(n) => n.jsonrpc_version(),
            JsonRpcMessage::Request(r) => r.jsonrpc_version(),
            JsonRpcMessage::Response(r) => r.jsonrpc_version(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            JsonRpcMessage::Notification(_) => MessageKind::Notification,
            JsonRpcMessage::Request(_) => MessageKind::Request,
            JsonRpcMessage::Response(r) if r.is_error() => MessageKind::ErrorResponse,
            JsonRpcMessage::Response(_) => MessageKind::ResultResponse,
        }
    }

    /// Get the method name, for requests and notifications
    pub fn method(&self) -> Option<&str> {
        match self {
            JsonRpcMessage::Notification(n) => Some(n.method()),
            JsonRpcMessage::Request(r) => Some(r.method()),
            JsonRpcMessage::Response(_) => None,
        }
    }

    /// Get the id, for requests and responses
    pub fn id(&self) -> Option<RequestId> {
        match self {
            JsonRpcMessage::Notification(_) => None,
            JsonRpcMessage::Request(r) => Some(r.id()),
            JsonRpcMessage::Response(r) => Some(r.id()),
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, JsonRpcMessage::Notification(_))
    }

    pub fn is_request(&self) -> bool {
        matches!(self, JsonRpcMessage::Request(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, JsonRpcMessage::Response(_))
    }

    pub fn as_notification(&self) -> Option<&JsonRpcNotification> {
        match self {
            JsonRpcMessage::Notification(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_request(&self) -> Option<&JsonRpcRequest> {
        match self {
            JsonRpcMessage::Request(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&JsonRpcResponse> {
        match self {
            JsonRpcMessage::Response(r) => Some(r),
            _ => None,
        }
    }

    /// Encode to wire format.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Encode any message to its wire form.
pub fn encode(message: &JsonRpcMessage) -> Result<String, serde_json::Error> {
    message.to_json_string()
}

impl From<JsonRpcNotification> for JsonRpcMessage {
    fn from(notification: JsonRpcNotification) -> Self {
        Self::Notification(notification)
    }
}

impl From<JsonRpcRequest> for JsonRpcMessage {
    fn from(request: JsonRpcRequest) -> Self {
        Self::Request(request)
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl<'de> Deserialize<'de> for JsonRpcMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Classifier::default()
            .classify_object(object)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonRpcErrorObject;
    use serde_json::json;

    #[test]
    fn test_message_accessors() {
        let request: JsonRpcMessage = JsonRpcRequest::new("sum", 4u64).into();
        assert!(request.is_request());
        assert_eq!(request.method(), Some("sum"));
        assert_eq!(request.id(), Some(RequestId::new(4)));
        assert_eq!(request.kind(), MessageKind::Request);
        assert_eq!(request.jsonrpc_version(), "2.0");

        let notification: JsonRpcMessage = JsonRpcNotification::new("ping").into();
        assert!(notification.is_notification());
        assert_eq!(notification.id(), None);

        let response: JsonRpcMessage = JsonRpcResponse::with_error(
            JsonRpcErrorObject::internal_error(None),
            4u64,
        )
        .unwrap()
        .into();
        assert!(response.is_response());
        assert_eq!(response.method(), None);
        assert_eq!(response.kind(), MessageKind::ErrorResponse);
    }

    #[test]
    fn test_encode_uses_variant_layout() {
        let message: JsonRpcMessage = JsonRpcResponse::with_result(json!([1, 2]), 5u64).into();
        assert_eq!(
            encode(&message).unwrap(),
            r#"{"jsonrpc":"2.0","result":[1,2],"id":5}"#
        );
    }

    #[test]
    fn test_deserialize_runs_classifier() {
        let message: JsonRpcMessage =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"m","id":2}"#).unwrap();
        assert!(message.is_request());

        let err = serde_json::from_str::<JsonRpcMessage>(r#"{"jsonrpc":"1.0","method":"m"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid version"));
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(MessageKind::PRECEDENCE[0], MessageKind::Notification);
        assert_eq!(MessageKind::PRECEDENCE[3], MessageKind::ResultResponse);
        assert_eq!(MessageKind::ErrorResponse.to_string(), "error response");
    }
}
