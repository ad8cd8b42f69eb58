//! Error types for Paramgate.
//!
//! Three error kinds surface from the pipeline:
//!
//! | Error | Raised | Meaning |
//! |---|---|---|
//! | [`ConfigurationError`] | declaration time | a rule string or validator argument cannot be resolved |
//! | [`ConversionError`] | per request | a raw value cannot be converted to the declared type |
//! | [`ValidationError`] | per request | a validator rejected a value |
//!
//! Conversion errors never reach the caller as such: the parameter descriptor
//! folds them into a [`ValidationError`] before propagating.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Result type alias using [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Machine code reported when a conversion failure is folded into a
/// [`ValidationError`].
pub const TYPE_CONVERSION_FAILED: &str = "TYPE_CONVERSION_FAILED";

/// A request parameter failed validation.
///
/// Carries the interpolated message, the machine code of the validator that
/// failed and the HTTP status code the host should answer with.
///
/// # Example
///
/// ```
/// use paramgate_core::ValidationError;
/// use http::StatusCode;
///
/// let err = ValidationError::new("The name is required.", "REQUIRED").with_field("name");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.code(), "REQUIRED");
/// assert_eq!(err.field(), Some("name"));
/// assert_eq!(err.to_string(), "The name is required.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    code: Cow<'static, str>,
    status_code: StatusCode,
    field: Option<String>,
}

impl ValidationError {
    /// Creates a validation error with the default 400 status.
    #[must_use]
    pub fn new(message: impl Into<String>, code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            status_code: StatusCode::BAD_REQUEST,
            field: None,
        }
    }

    /// Creates the error reported for a failed type conversion.
    #[must_use]
    pub fn type_conversion(cause: impl std::fmt::Display) -> Self {
        Self::new(format!("type convert error: {cause}"), TYPE_CONVERSION_FAILED)
    }

    /// Overrides the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    /// Records the display name of the offending parameter.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the interpolated human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns the display name of the offending parameter, if known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message.clone(),
                field: self.field.clone(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Display name of the offending parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// A raw value could not be converted to the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The pre-conversion format check rejected the value.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// Conversion failed for any other reason.
    #[error("{0}")]
    Failed(String),
}

impl ConversionError {
    /// Creates a generic conversion failure.
    #[must_use]
    pub fn failed(cause: impl Into<String>) -> Self {
        Self::Failed(cause.into())
    }

    /// Folds this error into the [`ValidationError`] reported to the caller.
    ///
    /// Format-check rejections propagate unchanged. Any other failure becomes
    /// a `TYPE_CONVERSION_FAILED` error with the given status.
    #[must_use]
    pub fn into_validation_error(self, status_code: StatusCode) -> ValidationError {
        match self {
            Self::Rejected(err) => err,
            Self::Failed(cause) => ValidationError::type_conversion(cause).with_status(status_code),
        }
    }
}

impl From<ConversionError> for ValidationError {
    fn from(err: ConversionError) -> Self {
        err.into_validation_error(StatusCode::BAD_REQUEST)
    }
}

/// A parameter declaration could not be resolved.
///
/// Raised while building descriptors, never while serving a request.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A rule names a validator that is not registered.
    #[error("can not resolve validator: '{name}'")]
    UnknownValidator {
        /// The unresolved rule name.
        name: String,
    },

    /// A rule string contains an empty rule.
    #[error("empty rule in rule string '{rules}'")]
    EmptyRule {
        /// The complete rule string.
        rules: String,
    },

    /// A validator received the wrong number of arguments.
    #[error("validator '{name}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// The validator name.
        name: String,
        /// Human-readable expected count (e.g. "1", "at least 1").
        expected: String,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// A validator argument has an invalid value.
    #[error("invalid argument '{argument}' for validator '{name}': {reason}")]
    InvalidArgument {
        /// The validator name.
        name: String,
        /// The offending argument.
        argument: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A regular expression failed to compile.
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },
}

impl ConfigurationError {
    /// Creates an unknown-validator error.
    #[must_use]
    pub fn unknown_validator(name: impl Into<String>) -> Self {
        Self::UnknownValidator { name: name.into() }
    }

    /// Creates an argument-count error.
    #[must_use]
    pub fn argument_count(name: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::ArgumentCount {
            name: name.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(
        name: impl Into<String>,
        argument: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}
