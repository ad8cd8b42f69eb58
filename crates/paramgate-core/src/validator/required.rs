//! Presence validators.
//!
//! These are the only built-ins that run on a null value.

use super::{expect_args, RuleValidator, Validator, Verdict};
use crate::error::ConfigurationError;
use crate::value::{ParamMap, Value};

/// Returns `true` unless the value is null or blank text.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Str(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Fails when the value is null or blank text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn code(&self) -> &str {
        "REQUIRED"
    }

    fn message(&self) -> &str {
        "The {key} is required."
    }

    fn nullable(&self) -> bool {
        false
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        is_present(value).into()
    }
}

impl RuleValidator for RequiredValidator {
    const NAMES: &'static [&'static str] = &["required"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 0)?;
        Ok(Self)
    }
}

/// Required only when another parameter is present.
#[derive(Debug, Clone)]
pub struct RequiredWithValidator {
    other: String,
    message: String,
}

impl RequiredWithValidator {
    /// Requires the value whenever `other` is non-null.
    #[must_use]
    pub fn new(other: impl Into<String>) -> Self {
        let other = other.into();
        let message = format!("The {{key}} is required with {other}");
        Self { other, message }
    }
}

impl Validator for RequiredWithValidator {
    fn code(&self) -> &str {
        "REQUIRED_WITH"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn nullable(&self) -> bool {
        false
    }

    fn check(&self, value: &Value, params: &ParamMap) -> Verdict {
        if params.value(&self.other).is_null() {
            Verdict::Valid
        } else {
            is_present(value).into()
        }
    }
}

impl RuleValidator for RequiredWithValidator {
    const NAMES: &'static [&'static str] = &["required_with"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args[0].as_str()))
    }
}

/// Required only when another parameter is absent.
#[derive(Debug, Clone)]
pub struct RequiredWithoutValidator {
    other: String,
    message: String,
}

impl RequiredWithoutValidator {
    /// Requires the value whenever `other` is null.
    #[must_use]
    pub fn new(other: impl Into<String>) -> Self {
        let other = other.into();
        let message = format!("The {{key}} is required without {other}");
        Self { other, message }
    }
}

impl Validator for RequiredWithoutValidator {
    fn code(&self) -> &str {
        "REQUIRED_WITHOUT"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn nullable(&self) -> bool {
        false
    }

    fn check(&self, value: &Value, params: &ParamMap) -> Verdict {
        if params.value(&self.other).is_null() {
            is_present(value).into()
        } else {
            Verdict::Valid
        }
    }
}

impl RuleValidator for RequiredWithoutValidator {
    const NAMES: &'static [&'static str] = &["required_without"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args[0].as_str()))
    }
}

/// Required only when another parameter's display form equals a value.
///
/// Booleans display as `true`/`false`, so `required_if:flag,true` matches a
/// converted boolean parameter.
#[derive(Debug, Clone)]
pub struct RequiredIfValidator {
    other: String,
    other_value: String,
    message: String,
}

impl RequiredIfValidator {
    /// Requires the value whenever `other` displays as `other_value`.
    #[must_use]
    pub fn new(other: impl Into<String>, other_value: impl Into<String>) -> Self {
        let other = other.into();
        let other_value = other_value.into();
        let message = format!("The {{key}} is required when {other} is {other_value}");
        Self {
            other,
            other_value,
            message,
        }
    }
}

impl Validator for RequiredIfValidator {
    fn code(&self) -> &str {
        "REQUIRED_IF"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn nullable(&self) -> bool {
        false
    }

    fn check(&self, value: &Value, params: &ParamMap) -> Verdict {
        let other = params.value(&self.other);
        if !other.is_null() && other.to_string() == self.other_value {
            is_present(value).into()
        } else {
            Verdict::Valid
        }
    }
}

impl RuleValidator for RequiredIfValidator {
    const NAMES: &'static [&'static str] = &["required_if"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 2)?;
        Ok(Self::new(args[0].as_str(), args[1].as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_required() {
        let cases = [
            (Value::Null, false),
            (Value::from(""), false),
            (Value::from("   "), false),
            (Value::from("a"), true),
            (Value::from(0), true),
            (Value::from(false), true),
            (Value::List(vec![]), true),
        ];

        for (value, valid) in cases {
            let map = params(&[("a", value.clone())]);
            assert_eq!(
                RequiredValidator.evaluate("a", &map, None).is_ok(),
                valid,
                "value {value:?}"
            );
        }
    }

    #[test]
    fn test_required_message() {
        let err = RequiredValidator
            .evaluate("name", &ParamMap::new(), None)
            .expect_err("missing value should fail");
        assert_eq!(err.message(), "The name is required.");
        assert_eq!(err.code(), "REQUIRED");
    }

    #[test]
    fn test_required_with() {
        let validator = RequiredWithValidator::new("b");

        assert!(validator.evaluate("a", &params(&[]), None).is_ok());
        assert!(validator
            .evaluate("a", &params(&[("b", Value::from(1))]), None)
            .is_err());
        assert!(validator
            .evaluate("a", &params(&[("a", "x".into()), ("b", 1.into())]), None)
            .is_ok());

        let err = validator
            .evaluate("a", &params(&[("b", 1.into())]), None)
            .expect_err("b present");
        assert_eq!(err.message(), "The a is required with b");
    }

    #[test]
    fn test_required_without() {
        let validator = RequiredWithoutValidator::new("b");

        let err = validator
            .evaluate("a", &params(&[]), None)
            .expect_err("both absent");
        assert_eq!(err.message(), "The a is required without b");
        assert!(validator
            .evaluate("a", &params(&[("b", 1.into())]), None)
            .is_ok());
        assert!(validator
            .evaluate("a", &params(&[("a", 1.into())]), None)
            .is_ok());
    }

    #[test]
    fn test_required_if() {
        let validator = RequiredIfValidator::new("b", "1");

        assert!(validator.evaluate("a", &params(&[]), None).is_ok());
        assert!(validator
            .evaluate("a", &params(&[("b", 2.into())]), None)
            .is_ok());

        let err = validator
            .evaluate("a", &params(&[("b", 1.into())]), None)
            .expect_err("b is 1");
        assert_eq!(err.message(), "The a is required when b is 1");

        assert!(validator
            .evaluate("a", &params(&[("a", 1.into()), ("b", 1.into())]), None)
            .is_ok());
    }

    #[test]
    fn test_required_if_matches_boolean_display() {
        let validator = RequiredIfValidator::new("flag", "true");
        assert!(validator
            .evaluate("a", &params(&[("flag", true.into())]), None)
            .is_err());
        assert!(validator
            .evaluate("a", &params(&[("flag", false.into())]), None)
            .is_ok());
    }

    #[test]
    fn test_from_args_counts() {
        assert!(RequiredValidator::from_args(&[]).is_ok());
        assert!(RequiredWithValidator::from_args(&[]).is_err());
        assert!(RequiredIfValidator::from_args(&["b".into()]).is_err());
        assert!(RequiredIfValidator::from_args(&["b".into(), "1".into()]).is_ok());
    }
}
