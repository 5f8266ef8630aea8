//! Error types for the compression engine.
//!
//! Every failure the engine can produce is classified into one of four
//! [`ErrorKind`]s. Backend messages are kept as a secondary `detail` string
//! so callers can tell a malformed request apart from a codec failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Top-level failure classification surfaced to the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed request data (bad payload, quality out of range)
    InvalidInput,
    /// Format token absent from the alias table
    UnsupportedFormat,
    /// Input bytes are not a valid image in any supported container
    DecodeError,
    /// Codec failed while encoding, or produced an empty output
    EncodeError,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::DecodeError => "DECODE_ERROR",
            ErrorKind::EncodeError => "ENCODE_ERROR",
        }
    }

    /// Whether the caller is at fault (as opposed to the codec).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidInput | ErrorKind::UnsupportedFormat | ErrorKind::DecodeError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer classification of an [`ErrorKind::EncodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeFailure {
    /// A parameter handed to the encoder was out of range
    InvalidParameter,
    /// The encoder returned zero bytes
    DegenerateOutput,
    /// The codec backend itself reported an error
    Backend,
}

/// Engine error with classification and backend detail.
#[derive(Error, Debug)]
pub struct CompressionError {
    /// Failure classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Secondary diagnostic, usually the backend's own message
    pub detail: Option<String>,
    /// Set only for [`ErrorKind::EncodeError`]
    pub encode_failure: Option<EncodeFailure>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl CompressionError {
    /// Create a new error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            encode_failure: None,
            source: None,
        }
    }

    /// Attach a diagnostic detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the underlying error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            success: false,
            error_kind: self.kind,
            error: self.message.clone(),
            details: self.detail.clone(),
            encode_failure: self.encode_failure,
        }
    }

    // Convenience constructors

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn unsupported_format(token: &str) -> Self {
        Self::new(ErrorKind::UnsupportedFormat, "Unsupported output format")
            .with_detail(token.to_string())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecodeError, message)
    }

    pub fn encode(failure: EncodeFailure, message: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::EncodeError, message);
        err.encode_failure = Some(failure);
        err
    }

    /// Backend codec failure, keeping the backend's message as detail.
    pub fn backend(codec: &str, detail: impl Into<String>) -> Self {
        Self::encode(EncodeFailure::Backend, format!("{} encoder failed", codec))
            .with_detail(detail)
    }
}

/// Serializable error document for boundary responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub success: bool,
    pub error_kind: ErrorKind,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode_failure: Option<EncodeFailure>,
}
