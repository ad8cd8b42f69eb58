//! # Paramgate
//!
//! **Declarative request parameter conversion and validation**
//!
//! Handlers declare their parameters once: where each value comes from, what
//! type it converts to, and the rules it must satisfy. Paramgate extracts and
//! converts every parameter, then validates all of them against the complete
//! argument set, and only calls the handler when everything passed.
//!
//! ## Quick Start
//!
//! ```rust
//! use paramgate::prelude::*;
//! use http::Uri;
//!
//! let list = ParamHandler::builder()
//!     .name("list_articles")
//!     .param(Param::get("offset").kind("int").default(0).rules("min:0").build()?)
//!     .param(Param::get("limit").kind("int").default(10).rules("between:1,100").build()?)
//!     .build(|_request, args: ParamMap| {
//!         (args.get_as::<i64>("offset"), args.get_as::<i64>("limit"))
//!     });
//!
//! let request = ExtractionContext::builder()
//!     .uri(Uri::from_static("/articles?limit=500"))
//!     .build()?;
//!
//! let err = list.handle_request(&request).unwrap_err();
//! assert_eq!(err.message(), "The limit must be between 1 and 100.");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Rule strings
//!
//! Rules are separated by `|`; arguments follow a `:` and are separated by
//! `,`. A literal `|` or `,` inside an argument is written `\|` or `\,`.
//!
//! ```text
//! required | between:5,10 | regex:^\w+$ | in:red,green,blue
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |---|---|
//! | [`core`] | Values, converters, validators, rule parser |
//! | [`extract`] | Request context, sources, parameters, handler wrapper |
//! | [`config`] | Layered configuration |
//! | [`telemetry`] | Logging and metrics setup |

#![doc(html_root_url = "https://docs.rs/paramgate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use paramgate_core as core;

// Re-export extraction types
pub use paramgate_extract as extract;

// Re-export configuration types
pub use paramgate_config as config;

// Re-export telemetry types
pub use paramgate_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use paramgate::prelude::*;
///
/// let param = Param::get("q").rules("required").build().unwrap();
/// assert_eq!(param.validators().len(), 1);
/// ```
pub mod prelude {
    pub use paramgate_core::{
        get_converter, get_validators, register_converter, register_validator,
        ConfigurationError, Converter, ConverterRegistry, FromValue, NamedConverter, ParamMap,
        RuleValidator, UploadedFile, ValidationError, ValidationResult, Validator, ValidatorExt,
        ValidatorRegistry, Value, Verdict,
    };

    // Re-export request extraction and the handler wrapper
    pub use paramgate_extract::{
        ExtractionContext, ExtractionError, MultipartForm, Param, ParamHandler, RequestValues,
        Source,
    };

    // Re-export configuration
    pub use paramgate_config::{ConfigLoader, ParamgateConfig};
}
