//! JSON conversion rules injected into the engine
//!
//! The walker and the template resolver never reach for global serializer
//! settings. Whatever needs to turn bytes into a document, a document into
//! bytes, or a scalar into href text goes through a [`JsonCodec`].

use crate::core::error::CodecError;
use serde_json::Value;

/// Conversion rules between raw bytes, documents and href text
pub trait JsonCodec: Send + Sync {
    /// Parse a document from bytes
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;

    /// Serialize a document to bytes
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Render a scalar for substitution into an href
    ///
    /// Returns `None` when the value has no href representation. `null` must
    /// never become the text `"null"`.
    fn scalar_to_string(&self, value: &Value) -> Option<String>;
}

/// [`JsonCodec`] backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec {
    pretty: bool,
}

impl SerdeJsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented output from [`JsonCodec::encode`]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl JsonCodec for SerdeJsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        if self.pretty {
            serde_json::to_vec_pretty(value).map_err(CodecError::Encode)
        } else {
            serde_json::to_vec(value).map_err(CodecError::Encode)
        }
    }

    fn scalar_to_string(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
