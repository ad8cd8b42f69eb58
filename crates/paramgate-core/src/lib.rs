//! # Paramgate Core
//!
//! Value model, type converters, validators and the rule mini-language used
//! by Paramgate parameter declarations.
//!
//! - [`Value`] / [`ParamMap`] - Dynamically typed parameter values and the ordered argument map
//! - [`Converter`] / [`ConverterRegistry`] - Raw value to declared type
//! - [`Validator`] / [`ValidatorRegistry`] - Per-parameter checks built from rule strings
//! - [`ValidationError`] / [`ConfigurationError`] - Request-time and declaration-time errors
//!
//! ## Rule strings
//!
//! ```rust
//! use paramgate_core::{get_validators, ParamMap};
//!
//! let validators = get_validators("required | between:5,10").unwrap();
//! let params: ParamMap = [("limit", 20)].into_iter().collect();
//!
//! let err = validators
//!     .iter()
//!     .try_for_each(|v| v.evaluate("limit", &params, None))
//!     .unwrap_err();
//! assert_eq!(err.message(), "The limit must be between 5 and 10.");
//! ```

#![doc(html_root_url = "https://docs.rs/paramgate-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod converter;
mod error;
mod names;
pub mod validator;
mod value;

pub use converter::{
    get_converter, register_converter, Converter, ConverterRegistry, NamedConverter,
    SharedConverter,
};
pub use error::{
    ConfigurationError, ConversionError, ErrorDetail, ErrorEnvelope, ValidationError,
    ValidationResult, TYPE_CONVERSION_FAILED,
};
pub use names::RegistryNames;
pub use validator::{
    get_validators, parse_rules, register_validator, render_message, Customized, Rule,
    RuleValidator, SharedValidator, Validator, ValidatorExt, ValidatorFactory,
    ValidatorRegistry, Verdict,
};
pub use value::{extension_of, FromValue, ParamMap, UploadedFile, Value};
