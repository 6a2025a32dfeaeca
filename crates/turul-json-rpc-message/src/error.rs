use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::shape::ParamsShape;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }

    /// Map a raw code back onto a reserved code, if it is one.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            crate::error_codes::PARSE_ERROR => Some(JsonRpcErrorCode::ParseError),
            crate::error_codes::INVALID_REQUEST => Some(JsonRpcErrorCode::InvalidRequest),
            crate::error_codes::METHOD_NOT_FOUND => Some(JsonRpcErrorCode::MethodNotFound),
            crate::error_codes::INVALID_PARAMS => Some(JsonRpcErrorCode::InvalidParams),
            crate::error_codes::INTERNAL_ERROR => Some(JsonRpcErrorCode::InternalError),
            c if (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
                .contains(&c) =>
            {
                Some(JsonRpcErrorCode::ServerError(c))
            }
            _ => None,
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The `{code, message, data}` object carried by an error response.
///
/// `data` is omitted from the encoded object when absent. The message text is
/// not validated; any string is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    code: i64,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Build from a reserved code, falling back to its default message.
    pub fn from_code(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::from_code(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::from_code(JsonRpcErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::from_code(
            JsonRpcErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::from_code(
            JsonRpcErrorCode::InvalidParams,
            Some(message.to_string()),
            None,
        )
    }

    pub fn internal_error(message: Option<String>) -> Self {
        Self::from_code(JsonRpcErrorCode::InternalError, message, None)
    }

    /// Implementation-defined server error. Panics unless `code` lies in -32099..=-32000.
    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        assert!(
            (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
                .contains(&code),
            "Server error code must be in range -32099 to -32000"
        );
        Self::from_code(
            JsonRpcErrorCode::ServerError(code),
            Some(message.to_string()),
            data,
        )
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The reserved code this object carries, if any.
    pub fn reserved_code(&self) -> Option<JsonRpcErrorCode> {
        JsonRpcErrorCode::from_code(self.code)
    }
}

impl fmt::Display for JsonRpcErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorObject {}

/// Why a document was rejected as `InvalidMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMessage {
    #[error("missing \"jsonrpc\" field")]
    MissingVersion,
    #[error("field set matches no message shape")]
    UnknownShape,
    #[error("\"error\" member is not a valid error object")]
    InvalidErrorObject,
    #[error("\"params\" must be an array or an object, found {0}")]
    InvalidParams(ParamsShape),
    #[error("response carries both a result and an error")]
    AmbiguousResponse,
    #[error("response carries neither a result nor an error")]
    MissingResponsePayload,
}

/// Errors produced while classifying an externally supplied document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error: invalid version {found:?}")]
    InvalidVersion { found: String },

    #[error("parse error: invalid message: {0}")]
    InvalidMessage(#[from] InvalidMessage),
}

impl ParseError {
    pub fn is_invalid_version(&self) -> bool {
        matches!(self, ParseError::InvalidVersion { .. })
    }

    pub fn is_invalid_message(&self) -> bool {
        matches!(self, ParseError::InvalidMessage(_))
    }
}

/// Errors produced when a message is built programmatically from an invalid
/// in-memory value. Never produced while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("object error: notification params must be an array or a string-keyed map, found {found}")]
    InvalidNotificationParams { found: ParamsShape },

    #[error("object error: request params must be an array or a string-keyed map, found {found}")]
    InvalidRequestParams { found: ParamsShape },

    #[error("object error: an error response requires an error object")]
    NilResponseError,
}

/// Failure of [`crate::classify()`].
///
/// JSON decode failures are reported as-is in `Json` and are never folded
/// into a [`ParseError`].
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ClassifyError {
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            ClassifyError::Parse(e) => Some(e),
            ClassifyError::Json(_) => None,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ClassifyError::Json(_))
    }
}

impl From<InvalidMessage> for ClassifyError {
    fn from(reason: InvalidMessage) -> Self {
        ClassifyError::Parse(ParseError::InvalidMessage(reason))
    }
}

impl From<&ClassifyError> for JsonRpcErrorObject {
    fn from(err: &ClassifyError) -> Self {
        match err {
            ClassifyError::Json(e) => JsonRpcErrorObject::parse_error(Some(Value::String(e.to_string()))),
            ClassifyError::Parse(e) => {
                JsonRpcErrorObject::invalid_request(Some(Value::String(e.to_string())))
            }
        }
    }
}

impl From<&ParseError> for JsonRpcErrorObject {
    fn from(err: &ParseError) -> Self {
        JsonRpcErrorObject::invalid_request(Some(Value::String(err.to_string())))
    }
}
