//! # JSON-RPC 2.0 Message Model
//!
//! Parsing, validation and encoding of single JSON-RPC 2.0 messages. A JSON
//! document is classified into exactly one of four shapes (notification,
//! request, result response, error response) by the exact set of its
//! top-level field names, then decoded with that shape's invariants.
//!
//! This crate produces and consumes message values; it has no transport,
//! no batching and no method dispatch.
//!
//! ## Features
//! - Exact key-set classification with a fixed precedence order
//! - `result: null` kept distinct from an absent `result`
//! - Validating constructors for every message type
//! - Stable wire field order for reproducible output
//!
//! ```rust
//! use turul_json_rpc_message::{classify, JsonRpcMessage};
//!
//! let message = classify(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
//! assert!(matches!(message, JsonRpcMessage::Request(_)));
//! ```

pub mod classify;
pub mod error;
pub mod keyset;
pub mod message;
pub mod notification;
pub mod params;
pub mod prelude;
pub mod request;
pub mod response;
pub mod shape;
pub mod types;

// Re-export main types
pub use classify::{
    Classifier, ClassifierConfig, ErrorObjectPolicy, classify, classify_slice, classify_value,
};
pub use error::{
    ClassifyError, ConstructionError, InvalidMessage, JsonRpcErrorCode, JsonRpcErrorObject,
    ParseError,
};
pub use message::{JsonRpcMessage, MessageKind, encode};
pub use notification::JsonRpcNotification;
pub use params::RequestParams;
pub use request::JsonRpcRequest;
pub use response::{JsonRpcResponse, ResponseOutcome};
pub use shape::ParamsShape;
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Wire field names
pub mod keys {
    pub const VERSION: &str = "jsonrpc";
    pub const METHOD: &str = "method";
    pub const PARAMS: &str = "params";
    pub const ID: &str = "id";
    pub const RESULT: &str = "result";
    pub const ERROR: &str = "error";

    // Members of the error object
    pub const ERROR_CODE: &str = "code";
    pub const ERROR_MESSAGE: &str = "message";
    pub const ERROR_DATA: &str = "data";
}

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
