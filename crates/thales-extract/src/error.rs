//! Extraction error types.
//!
//! An [`ExtractionError`] means the request could not even be turned into
//! raw input: the body was too large, malformed, or of a type the adapter
//! does not read. Field-level problems are reported by the engine instead.

use http::StatusCode;
use serde::Serialize;
use std::fmt;

/// Source of extraction (where data was being extracted from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path parameters (e.g., `/items/{item_id}`)
    Path,
    /// Query string parameters
    Query,
    /// Request body (JSON or form)
    Body,
    /// HTTP headers
    Header,
    /// Content-Type header specifically
    ContentType,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Header => write!(f, "header"),
            Self::ContentType => write!(f, "content-type"),
        }
    }
}

/// Error that occurs while collecting raw request input.
///
/// # Example
///
/// ```rust
/// use thales_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::deserialization_failed(ExtractionSource::Body, "EOF while parsing");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// assert!(err.to_string().contains("EOF"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Value has invalid encoding or format
    InvalidType,
    /// Deserialization failed
    DeserializationFailed,
    /// Body is too large
    PayloadTooLarge,
    /// Content-Type is unsupported
    UnsupportedMediaType,
}

/// Wire form of an extraction error.
#[derive(Debug, Serialize)]
pub struct ExtractionErrorBody<'a> {
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: &'a str,
    /// Offending field, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'a str>,
}

impl ExtractionError {
    /// Creates an error for a value with an invalid encoding or format.
    #[must_use]
    pub fn invalid_type(
        source: ExtractionSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidType,
            message: format!("invalid {source} parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for deserialization failure.
    #[must_use]
    pub fn deserialization_failed(source: ExtractionSource, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::DeserializationFailed,
            message: format!("failed to deserialize {source}: {error}"),
            field: None,
        }
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!(
                "payload too large: max {max_size} bytes, got {actual_size} bytes"
            ),
            field: None,
        }
    }

    /// Creates an error for unsupported content type.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual_str = actual.unwrap_or("none");
        Self {
            extraction_source: ExtractionSource::ContentType,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!(
                "unsupported content type: expected '{expected}', got '{actual_str}'"
            ),
            field: None,
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::InvalidType | ExtractionErrorKind::DeserializationFailed => {
                StatusCode::BAD_REQUEST
            }
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::InvalidType => "INVALID_PARAMETER",
            ExtractionErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }

    /// Returns the serializable envelope for this error.
    #[must_use]
    pub fn body(&self) -> ExtractionErrorBody<'_> {
        ExtractionErrorBody {
            code: self.error_code(),
            message: &self.message,
            field: self.field(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_error() {
        let err = ExtractionError::invalid_type(
            ExtractionSource::Header,
            "x-token",
            "header value is not valid UTF-8",
        );

        assert_eq!(err.extraction_source(), ExtractionSource::Header);
        assert_eq!(err.field(), Some("x-token"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("x-token"));
    }

    #[test]
    fn test_deserialization_failed_error() {
        let err = ExtractionError::deserialization_failed(
            ExtractionSource::Body,
            "unexpected token at position 5",
        );

        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.field(), None);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = ExtractionError::payload_too_large(1024, 2048);

        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_unsupported_media_type_error() {
        let err = ExtractionError::unsupported_media_type(
            "application/json",
            Some("text/plain"),
        );

        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_body_envelope() {
        let err = ExtractionError::payload_too_large(10, 20);
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
        assert!(json.get("field").is_none());
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Path.to_string(), "path");
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Header.to_string(), "header");
        assert_eq!(ExtractionSource::ContentType.to_string(), "content-type");
    }
}
