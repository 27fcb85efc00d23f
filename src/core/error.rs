//! Typed error handling for hypermedia injection
//!
//! Document shape variation is never an error: the walker and the template
//! resolver absorb it silently. The types here cover the failures that are
//! worth reporting to a caller.
//!
//! # Error Categories
//!
//! - [`SpecError`]: A link specification is malformed (programming misuse)
//! - [`ConfigError`]: Configuration could not be loaded or queried
//! - [`CodecError`]: A document could not be decoded or encoded
//!
//! # Example
//!
//! ```rust
//! use hypermedia::core::error::{HypermediaError, SpecError};
//! use hypermedia::core::LinkSpec;
//!
//! match LinkSpec::new("", "/orders/{OrderNo}", ["Results", "[]"]) {
//!     Err(HypermediaError::Spec(SpecError::EmptyRel)) => {}
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type for the hypermedia crate
#[derive(Debug)]
pub enum HypermediaError {
    /// Malformed link specification
    Spec(SpecError),

    /// Configuration errors
    Config(ConfigError),

    /// JSON decode/encode errors
    Codec(CodecError),
}

impl fmt::Display for HypermediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HypermediaError::Spec(e) => write!(f, "{}", e),
            HypermediaError::Config(e) => write!(f, "{}", e),
            HypermediaError::Codec(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HypermediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HypermediaError::Spec(e) => Some(e),
            HypermediaError::Config(e) => Some(e),
            HypermediaError::Codec(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HypermediaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HypermediaError::Spec(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HypermediaError::Config(e) => e.status_code(),
            HypermediaError::Codec(e) => e.status_code(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            HypermediaError::Spec(e) => e.error_code(),
            HypermediaError::Config(e) => e.error_code(),
            HypermediaError::Codec(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            HypermediaError::Spec(SpecError::MalformedPlaceholder { template, token }) => {
                Some(serde_json::json!({
                    "template": template,
                    "token": token
                }))
            }
            HypermediaError::Config(ConfigError::UnknownEndpoint { name }) => {
                Some(serde_json::json!({ "endpoint": name }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for HypermediaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Specification Errors
// =============================================================================

/// A link specification that cannot be used
///
/// These are raised when a [`LinkSpec`](crate::core::LinkSpec) is built, never
/// during traversal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// The `rel` is empty
    #[error("Link rel must not be empty")]
    EmptyRel,

    /// A path segment is an empty string
    #[error("Path segment {index} is empty")]
    EmptySegment { index: usize },

    /// A brace token in the href template is an ancestor escape or a dotted
    /// path with an empty step
    #[error("Malformed placeholder '{token}' in href template '{template}'")]
    MalformedPlaceholder { template: String, token: String },

    /// The status gate is not a valid HTTP status code
    #[error("Invalid status gate: {0}")]
    InvalidStatus(u16),
}

impl SpecError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SpecError::EmptyRel => "SPEC_EMPTY_REL",
            SpecError::EmptySegment { .. } => "SPEC_EMPTY_SEGMENT",
            SpecError::MalformedPlaceholder { .. } => "SPEC_MALFORMED_PLACEHOLDER",
            SpecError::InvalidStatus(_) => "SPEC_INVALID_STATUS",
        }
    }
}

impl From<SpecError> for HypermediaError {
    fn from(err: SpecError) -> Self {
        HypermediaError::Spec(err)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration loading and lookup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No endpoint with this name is configured
    #[error("No hypermedia endpoint named '{name}'")]
    UnknownEndpoint { name: String },
}

impl ConfigError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConfigError::UnknownEndpoint { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
            ConfigError::UnknownEndpoint { .. } => "CONFIG_UNKNOWN_ENDPOINT",
        }
    }
}

impl From<ConfigError> for HypermediaError {
    fn from(err: ConfigError) -> Self {
        HypermediaError::Config(err)
    }
}

impl From<serde_yaml::Error> for HypermediaError {
    fn from(err: serde_yaml::Error) -> Self {
        HypermediaError::Config(ConfigError::Parse(err))
    }
}

// =============================================================================
// Codec Errors
// =============================================================================

/// Errors raised by a [`JsonCodec`](crate::core::codec::JsonCodec)
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes are not a JSON document
    #[error("Failed to decode JSON document: {0}")]
    Decode(#[source] serde_json::Error),

    /// Document could not be serialized
    #[error("Failed to encode JSON document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CodecError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CodecError::Decode(_) => StatusCode::BAD_REQUEST,
            CodecError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CodecError::Decode(_) => "CODEC_DECODE_ERROR",
            CodecError::Encode(_) => "CODEC_ENCODE_ERROR",
        }
    }
}

impl From<CodecError> for HypermediaError {
    fn from(err: CodecError) -> Self {
        HypermediaError::Codec(err)
    }
}

/// Result alias used across the crate
pub type Result<T, E = HypermediaError> = std::result::Result<T, E>;
