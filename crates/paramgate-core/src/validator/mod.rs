//! Validators and the rule mini-language.
//!
//! A [`Validator`] inspects one named parameter inside the full argument map
//! and either accepts it or produces a [`ValidationError`]. Validators are
//! usually built from rule strings such as `"required | between:5,10"` through
//! the [`ValidatorRegistry`], but any type implementing the trait can be
//! attached to a parameter directly.
//!
//! # Evaluation
//!
//! [`Validator::evaluate`] is the single entry point:
//!
//! 1. The value is looked up by key; a missing key reads as [`Value::Null`].
//! 2. A null value passes immediately when the validator is
//!    [`nullable`](Validator::nullable).
//! 3. The value is normalised by [`clean`](Validator::clean).
//! 4. [`check`](Validator::check) decides; a failure renders the message
//!    template with `{key}`, `{value}` and `{show_value}`.
//!
//! Evaluation never mutates the validator, so a single instance may be shared
//! across threads and invocations.

mod choice;
mod pattern;
mod registry;
mod required;
mod rule;
mod size;

pub use choice::{ExtInValidator, ExtNotInValidator, InValidator, NotInValidator};
pub use pattern::{IntegerValidator, NumericValidator, RegexValidator};
pub use registry::{get_validators, register_validator, ValidatorFactory, ValidatorRegistry};
pub use required::{
    RequiredIfValidator, RequiredValidator, RequiredWithValidator, RequiredWithoutValidator,
};
pub use rule::{parse_rules, Rule};
pub use size::{BetweenValidator, MaxValidator, MinValidator};

use crate::error::{ConfigurationError, ValidationError, ValidationResult};
use crate::value::{ParamMap, Value};
use http::StatusCode;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Outcome of a single [`Validator::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value is accepted.
    Valid,
    /// The value is rejected with the validator's default message.
    Invalid,
    /// The value is rejected with a branch-specific message template.
    InvalidWith(String),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

/// A check applied to one named parameter.
///
/// Implementors provide [`code`](Self::code), [`message`](Self::message) and
/// [`check`](Self::check); everything else has a default.
///
/// # Example
///
/// ```
/// use paramgate_core::{ParamMap, Validator, Value, Verdict};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Validator for Even {
///     fn code(&self) -> &str {
///         "EVEN"
///     }
///     fn message(&self) -> &str {
///         "The {key} must be even."
///     }
///     fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
///         value.as_i64().is_some_and(|n| n % 2 == 0).into()
///     }
/// }
///
/// let params: ParamMap = [("n", 3)].into_iter().collect();
/// let err = Even.evaluate("n", &params, None).unwrap_err();
/// assert_eq!(err.message(), "The n must be even.");
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Machine-readable error code, upper snake case.
    fn code(&self) -> &str;

    /// Default message template.
    fn message(&self) -> &str;

    /// Whether a null value bypasses the check.
    fn nullable(&self) -> bool {
        true
    }

    /// HTTP status reported on failure.
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Normalises the raw value before [`check`](Self::check).
    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        Cow::Borrowed(value)
    }

    /// Decides whether the cleaned value is acceptable.
    ///
    /// `params` is the full argument map, for cross-parameter rules.
    fn check(&self, value: &Value, params: &ParamMap) -> Verdict;

    /// Validates an already looked-up value.
    ///
    /// `verbose_key` is the name substituted for `{key}` in messages.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the value is rejected.
    fn validate_value(
        &self,
        value: &Value,
        params: &ParamMap,
        verbose_key: &str,
    ) -> ValidationResult<()> {
        if value.is_null() && self.nullable() {
            return Ok(());
        }

        let cleaned = self.clean(value);
        let template = match self.check(&cleaned, params) {
            Verdict::Valid => return Ok(()),
            Verdict::Invalid => Cow::Borrowed(self.message()),
            Verdict::InvalidWith(message) => Cow::Owned(message),
        };

        let raw = value.to_string();
        let shown = cleaned.to_string();
        let message = render_message(
            &template,
            &[("key", verbose_key), ("value", &raw), ("show_value", &shown)],
        );

        Err(ValidationError::new(message, self.code().to_string())
            .with_status(self.status_code())
            .with_field(verbose_key))
    }

    /// Validates the parameter `key` of `params`.
    ///
    /// Messages name the parameter by `verbose_key` when given, else by `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the value is rejected.
    fn evaluate(&self, key: &str, params: &ParamMap, verbose_key: Option<&str>) -> ValidationResult<()> {
        self.validate_value(params.value(key), params, verbose_key.unwrap_or(key))
    }
}

/// A validator that can be built from rule arguments.
///
/// Register with [`ValidatorRegistry::register_rule`].
pub trait RuleValidator: Validator + Sized + 'static {
    /// Rule names this validator answers to.
    const NAMES: &'static [&'static str];

    /// Builds the validator from the arguments after the `:`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a wrong argument count or value.
    fn from_args(args: &[String]) -> Result<Self, ConfigurationError>;
}

/// Shared handle to a validator.
pub type SharedValidator = Arc<dyn Validator>;

/// Overrides the message or status of an existing validator.
#[derive(Debug)]
pub struct Customized<V> {
    inner: V,
    message: Option<String>,
    status_code: Option<StatusCode>,
}

impl<V> Customized<V> {
    /// Replaces the message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Replaces the failure status.
    #[must_use]
    pub const fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Returns the wrapped validator.
    #[must_use]
    pub const fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: Validator> Validator for Customized<V> {
    fn code(&self) -> &str {
        self.inner.code()
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_else(|| self.inner.message())
    }

    fn nullable(&self) -> bool {
        self.inner.nullable()
    }

    fn status_code(&self) -> StatusCode {
        self.status_code.unwrap_or_else(|| self.inner.status_code())
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        self.inner.clean(value)
    }

    fn check(&self, value: &Value, params: &ParamMap) -> Verdict {
        match self.inner.check(value, params) {
            // A custom message wins over branch messages.
            Verdict::InvalidWith(_) if self.message.is_some() => Verdict::Invalid,
            verdict => verdict,
        }
    }
}

/// Builder-style customisation for any validator.
pub trait ValidatorExt: Validator + Sized {
    /// Wraps the validator with a custom message template.
    #[must_use]
    fn with_message(self, message: impl Into<String>) -> Customized<Self> {
        Customized {
            inner: self,
            message: Some(message.into()),
            status_code: None,
        }
    }

    /// Wraps the validator with a custom failure status.
    #[must_use]
    fn with_status(self, status_code: StatusCode) -> Customized<Self> {
        Customized {
            inner: self,
            message: None,
            status_code: Some(status_code),
        }
    }
}

impl<V: Validator> ValidatorExt for V {}

/// Substitutes `{name}` placeholders in a message template.
///
/// `{{` and `}}` produce literal braces. Unknown placeholders are kept as-is.
#[must_use]
pub fn render_message(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{') {
            if let Some(end) = tail.find('}') {
                let name = &tail[1..end];
                if let Some((_, value)) = args.iter().find(|(arg, _)| *arg == name) {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                    continue;
                }
            }
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}

/// Fails unless exactly `expected` arguments were given.
pub(crate) fn expect_args(
    name: &str,
    args: &[String],
    expected: usize,
) -> Result<(), ConfigurationError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ConfigurationError::argument_count(
            name,
            expected.to_string(),
            args.len(),
        ))
    }
}

/// Fails unless at least `minimum` arguments were given.
pub(crate) fn expect_at_least(
    name: &str,
    args: &[String],
    minimum: usize,
) -> Result<(), ConfigurationError> {
    if args.len() >= minimum {
        Ok(())
    } else {
        Err(ConfigurationError::argument_count(
            name,
            format!("at least {minimum}"),
            args.len(),
        ))
    }
}

/// Parses an integer rule argument.
pub(crate) fn int_arg(name: &str, arg: &str) -> Result<i64, ConfigurationError> {
    arg.trim()
        .parse()
        .map_err(|_| ConfigurationError::invalid_argument(name, arg, "expected an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NonEmpty;

    impl Validator for NonEmpty {
        fn code(&self) -> &str {
            "NON_EMPTY"
        }

        fn message(&self) -> &str {
            "The {key} may not be empty (got '{value}')."
        }

        fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
            (!value.to_string().is_empty()).into()
        }
    }

    #[test]
    fn test_render_message() {
        let rendered = render_message("The {key} is {value}.", &[("key", "a"), ("value", "1")]);
        assert_eq!(rendered, "The a is 1.");
    }

    #[test]
    fn test_render_message_escapes_and_unknown() {
        let rendered = render_message("{{literal}} {other} {key}", &[("key", "a")]);
        assert_eq!(rendered, "{literal} {other} a");
    }

    #[test]
    fn test_nullable_skips_null() {
        let params = ParamMap::new();
        assert!(NonEmpty.evaluate("missing", &params, None).is_ok());
    }

    #[test]
    fn test_failure_uses_verbose_key() {
        let params: ParamMap = [("a", "")].into_iter().collect();
        let err = NonEmpty
            .evaluate("a", &params, Some("Alpha"))
            .expect_err("empty string should fail");

        assert_eq!(err.message(), "The Alpha may not be empty (got '').");
        assert_eq!(err.code(), "NON_EMPTY");
        assert_eq!(err.field(), Some("Alpha"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_customized_message_and_status() {
        let validator = NonEmpty
            .with_message("{key} needs a value")
            .with_status(StatusCode::UNPROCESSABLE_ENTITY);
        let params: ParamMap = [("a", "")].into_iter().collect();

        let err = validator.evaluate("a", &params, None).expect_err("should fail");
        assert_eq!(err.message(), "a needs a value");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "NON_EMPTY");
    }

    #[test]
    fn test_evaluation_leaves_validator_reusable() {
        let validator = NonEmpty;
        let bad: ParamMap = [("a", "")].into_iter().collect();
        let good: ParamMap = [("a", "x")].into_iter().collect();

        assert!(validator.evaluate("a", &bad, None).is_err());
        assert!(validator.evaluate("a", &good, None).is_ok());
        assert!(validator.evaluate("a", &bad, None).is_err());
    }

    #[test]
    fn test_argument_helpers() {
        let args = vec!["1".to_string()];
        assert!(expect_args("min", &args, 1).is_ok());
        assert!(expect_args("between", &args, 2).is_err());
        assert!(expect_at_least("in", &[], 1).is_err());
        assert_eq!(int_arg("min", " 5 ").ok(), Some(5));
        assert!(int_arg("min", "five").is_err());
    }
}
