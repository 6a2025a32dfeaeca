//! # JSON-RPC Message Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the JSON-RPC message library.
//!
//! ```rust
//! use turul_json_rpc_message::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::classify::{Classifier, ClassifierConfig, ErrorObjectPolicy, classify};
pub use crate::error::{
    ClassifyError, ConstructionError, JsonRpcErrorCode, JsonRpcErrorObject, ParseError,
};
pub use crate::message::{JsonRpcMessage, MessageKind, encode};
pub use crate::notification::JsonRpcNotification;
pub use crate::params::RequestParams;
pub use crate::request::JsonRpcRequest;
pub use crate::response::{JsonRpcResponse, ResponseOutcome};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
