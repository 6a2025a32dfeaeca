//! Classification of an undifferentiated JSON object into a message variant.
//!
//! The engine decodes the document into a field-name → value map, checks the
//! protocol version, exact-matches the field-name set against each variant's
//! [`KeySpec`](crate::keyset::KeySpec) in [`MessageKind::PRECEDENCE`] order, and
//! hands the document to the winning variant's decoder.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    JSONRPC_VERSION,
    error::{ClassifyError, InvalidMessage, ParseError},
    keys,
    keyset,
    message::{JsonRpcMessage, MessageKind},
    notification::JsonRpcNotification,
    request::JsonRpcRequest,
    response::JsonRpcResponse,
};

/// How strictly the `error` member of an error response is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorObjectPolicy {
    /// Exactly `code`, `message` and optionally `data`.
    #[default]
    Strict,
    /// `code` and `message` must be present; other members are dropped.
    Lenient,
}

impl ErrorObjectPolicy {
    fn accepts(&self, error: &Map<String, Value>) -> bool {
        let fields = field_names(error);
        match self {
            ErrorObjectPolicy::Strict => keyset::ERROR_OBJECT.matches(fields.iter().copied()),
            ErrorObjectPolicy::Lenient => {
                keyset::ERROR_OBJECT.matches_required(fields.iter().copied())
            }
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierConfig {
    pub error_object_policy: ErrorObjectPolicy,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_object_policy(mut self, policy: ErrorObjectPolicy) -> Self {
        self.error_object_policy = policy;
        self
    }
}

/// Stateless classification engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one JSON document.
    ///
    /// Malformed JSON, or a document that is not a JSON object, is reported as
    /// [`ClassifyError::Json`].
    pub fn classify(&self, document: &str) -> Result<JsonRpcMessage, ClassifyError> {
        let object: Map<String, Value> = serde_json::from_str(document)?;
        self.classify_object(object)
    }

    pub fn classify_slice(&self, document: &[u8]) -> Result<JsonRpcMessage, ClassifyError> {
        let object: Map<String, Value> = serde_json::from_slice(document)?;
        self.classify_object(object)
    }

    pub fn classify_value(&self, document: Value) -> Result<JsonRpcMessage, ClassifyError> {
        let object: Map<String, Value> = serde_json::from_value(document)?;
        self.classify_object(object)
    }

    pub fn classify_object(
        &self,
        object: Map<String, Value>,
    ) -> Result<JsonRpcMessage, ClassifyError> {
        let kind = self.match_kind(&object)?;
        trace!(kind = %kind, "Classified JSON-RPC document");

        let document = Value::Object(object);
        let message = match kind {
            MessageKind::Notification => JsonRpcNotification::decode(document)?.into(),
            MessageKind::Request => JsonRpcRequest::decode(document)?.into(),
            MessageKind::ErrorResponse | MessageKind::ResultResponse => {
                JsonRpcResponse::decode(document)?.into()
            }
        };
        Ok(message)
    }

    /// Decide which variant `object` is, without decoding it.
    pub fn match_kind(&self, object: &Map<String, Value>) -> Result<MessageKind, ClassifyError> {
        let Some(version) = object.get(keys::VERSION) else {
            debug!(fields = ?field_names(object), "Rejected JSON-RPC document: missing version");
            return Err(InvalidMessage::MissingVersion.into());
        };

        // null is a present-but-wrong version; other non-strings fail to decode
        let Some(version) = Option::<String>::deserialize(version)? else {
            debug!("Rejected JSON-RPC document: null version");
            return Err(ParseError::InvalidVersion { found: "null".into() }.into());
        };
        if version != JSONRPC_VERSION {
            debug!(version = %version, "Rejected JSON-RPC document: unsupported version");
            return Err(ParseError::InvalidVersion { found: version }.into());
        }

        let fields = field_names(object);
        let Some(kind) = MessageKind::PRECEDENCE
            .into_iter()
            .find(|kind| kind.key_spec().matches(fields.iter().copied()))
        else {
            debug!(fields = ?fields, "Rejected JSON-RPC document: unknown shape");
            return Err(InvalidMessage::UnknownShape.into());
        };

        if kind == MessageKind::ErrorResponse {
            let accepted = match object.get(keys::ERROR) {
                Some(Value::Object(error)) => self.config.error_object_policy.accepts(error),
                _ => false,
            };
            if !accepted {
                debug!(
                    policy = ?self.config.error_object_policy,
                    "Rejected JSON-RPC document: malformed error object"
                );
                return Err(InvalidMessage::InvalidErrorObject.into());
            }
        }

        Ok(kind)
    }
}

fn field_names(object: &Map<String, Value>) -> Vec<&str> {
    object.keys().map(String::as_str).collect()
}

/// Classify one JSON document with the default (strict) configuration.
pub fn classify(document: &str) -> Result<JsonRpcMessage, ClassifyError> {
    Classifier::default().classify(document)
}

/// Byte-slice variant of [`classify`].
pub fn classify_slice(document: &[u8]) -> Result<JsonRpcMessage, ClassifyError> {
    Classifier::default().classify_slice(document)
}

/// Variant of [`classify`] for an already-parsed JSON value.
pub fn classify_value(document: Value) -> Result<JsonRpcMessage, ClassifyError> {
    Classifier::default().classify_value(document)
}
