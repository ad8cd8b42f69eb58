//! Errors raised while buffering a request into an
//! [`ExtractionContext`](crate::ExtractionContext).
//!
//! These happen before any parameter is looked up, so they carry the request
//! location rather than a parameter name.

use http::StatusCode;
use paramgate_core::{ErrorDetail, ErrorEnvelope};
use std::fmt;
use thiserror::Error;

/// Part of the request an error relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path captures
    Path,
    /// Query string
    Query,
    /// Request body (JSON, form, multipart)
    Body,
    /// Headers
    Header,
    /// The `Content-Type` header
    ContentType,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
            Self::Header => "header",
            Self::ContentType => "content-type",
        })
    }
}

/// The request could not be buffered.
///
/// # Example
///
/// ```rust
/// use paramgate_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::malformed(ExtractionSource::Body, "expected value at line 1");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// ```
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// A named item (header, field) has an unusable name or value.
    #[error("invalid {location} '{name}': {details}")]
    InvalidValue {
        /// Where the item was found.
        location: ExtractionSource,
        /// Item name.
        name: String,
        /// What is wrong with it.
        details: String,
    },

    /// A query string or body cannot be decoded.
    #[error("cannot decode {location}: {details}")]
    Malformed {
        /// What was being decoded.
        location: ExtractionSource,
        /// Decoder message.
        details: String,
    },

    /// The body or one multipart part exceeds its limit.
    #[error("payload of {actual} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Limit in bytes.
        limit: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// A multipart body has too many parts.
    #[error("multipart body has more than {limit} parts")]
    TooManyParts {
        /// Maximum number of parts.
        limit: usize,
    },

    /// The content type is missing, malformed or not the expected one.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
}

impl ExtractionError {
    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    #[must_use]
    pub fn invalid_value(
        location: ExtractionSource,
        name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            location,
            name: name.into(),
            details: details.into(),
        }
    }

    /// Creates a [`Malformed`](Self::Malformed) error.
    #[must_use]
    pub fn malformed(location: ExtractionSource, details: impl fmt::Display) -> Self {
        Self::Malformed {
            location,
            details: details.to_string(),
        }
    }

    /// Creates a [`TooLarge`](Self::TooLarge) error.
    #[must_use]
    pub const fn too_large(limit: usize, actual: usize) -> Self {
        Self::TooLarge { limit, actual }
    }

    /// Reports a missing `Content-Type` header.
    #[must_use]
    pub fn missing_content_type(expected: &str) -> Self {
        Self::UnsupportedMediaType(format!("expected '{expected}', got none"))
    }

    /// Reports a `Content-Type` header that cannot be used.
    #[must_use]
    pub fn invalid_content_type(details: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(details.into())
    }

    /// Returns the part of the request the error relates to.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        match self {
            Self::InvalidValue { location, .. } | Self::Malformed { location, .. } => *location,
            Self::TooLarge { .. } | Self::TooManyParts { .. } => ExtractionSource::Body,
            Self::UnsupportedMediaType(_) => ExtractionSource::ContentType,
        }
    }

    /// Returns the offending item name, if there is one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the HTTP status the host should answer with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidValue { .. } | Self::Malformed { .. } => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyParts { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "INVALID_PARAMETER",
            Self::Malformed { .. } => "MALFORMED_REQUEST",
            Self::TooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::TooManyParts { .. } => "TOO_MANY_PARTS",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                field: self.field().map(ToString::to_string),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value() {
        let err = ExtractionError::invalid_value(ExtractionSource::Header, "x bad", "invalid header name");

        assert_eq!(err.extraction_source(), ExtractionSource::Header);
        assert_eq!(err.field(), Some("x bad"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid header 'x bad': invalid header name");
    }

    #[test]
    fn test_malformed() {
        let err = ExtractionError::malformed(ExtractionSource::Query, "invalid percent-encoding");

        assert_eq!(err.field(), None);
        assert_eq!(err.error_code(), "MALFORMED_REQUEST");
        assert!(err.to_string().starts_with("cannot decode query"));
    }

    #[test]
    fn test_size_errors() {
        let err = ExtractionError::too_large(1024, 2048);
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("2048"));

        let err = ExtractionError::TooManyParts { limit: 3 };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "TOO_MANY_PARTS");
    }

    #[test]
    fn test_content_type_errors() {
        let err = ExtractionError::missing_content_type("multipart/form-data");
        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("got none"));
    }

    #[test]
    fn test_envelope() {
        let envelope = ExtractionError::invalid_value(ExtractionSource::Header, "x", "bad")
            .to_envelope(Some("req-1"));
        assert_eq!(envelope.error.code, "INVALID_PARAMETER");
        assert_eq!(envelope.error.field.as_deref(), Some("x"));
        assert_eq!(envelope.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_extraction_source_display() {
        let names: Vec<String> = [
            ExtractionSource::Path,
            ExtractionSource::Query,
            ExtractionSource::Body,
            ExtractionSource::Header,
            ExtractionSource::ContentType,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["path", "query", "body", "header", "content-type"]);
    }
}
