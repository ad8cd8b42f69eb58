//! Regular-expression validators.

use super::{expect_args, RuleValidator, Validator, Verdict};
use crate::error::ConfigurationError;
use crate::value::{ParamMap, Value};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

const INTEGER_PATTERN: &str = r"^-?[0-9]+$";
const NUMERIC_PATTERN: &str = r"^-?[0-9]*(\.[0-9]+)?(e-?[0-9]+)?$";

/// Compiled pattern that matches from the start of the input.
#[derive(Debug, Clone)]
struct Anchored {
    source: String,
    regex: Regex,
}

impl Anchored {
    fn compile(source: &str) -> Result<Self, ConfigurationError> {
        let regex = Regex::new(&format!(r"\A(?:{source})")).map_err(|source_err| {
            ConfigurationError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Compiles a built-in pattern once. A pattern that fails to compile
    /// is logged and matches nothing.
    fn builtin(cell: &'static OnceLock<Option<Self>>, source: &'static str) -> Option<Self> {
        cell.get_or_init(|| {
            Self::compile(source)
                .map_err(|err| tracing::error!(%err, "built-in pattern rejected"))
                .ok()
        })
        .clone()
    }

    fn matches_builtin(pattern: Option<&Self>, value: &Value) -> Verdict {
        pattern.map_or_else(|| false.into(), |p| p.matches(value))
    }

    fn matches(&self, value: &Value) -> Verdict {
        value.as_str().is_some_and(|s| self.regex.is_match(s)).into()
    }
}

/// Stringifies the value for matching; null becomes empty text.
fn clean_text(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Str(_) => Cow::Borrowed(value),
        Value::Null => Cow::Owned(Value::Str(String::new())),
        other => Cow::Owned(Value::Str(other.to_string())),
    }
}

/// Fails unless the value's text matches a pattern from its start.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Anchored,
}

impl RegexValidator {
    /// Compiles the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] if it does not compile.
    pub fn new(pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            pattern: Anchored::compile(pattern)?,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern.source
    }
}

impl Validator for RegexValidator {
    fn code(&self) -> &str {
        "REGEX"
    }

    fn message(&self) -> &str {
        "The {key} format is invalid."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_text(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        self.pattern.matches(value)
    }
}

impl RuleValidator for RegexValidator {
    const NAMES: &'static [&'static str] = &["regex"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 1)?;
        Self::new(&args[0])
    }
}

/// Fails unless the value's text is an optionally negative integer.
#[derive(Debug, Clone)]
pub struct IntegerValidator {
    pattern: Option<Anchored>,
}

impl IntegerValidator {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        static PATTERN: OnceLock<Option<Anchored>> = OnceLock::new();
        Self {
            pattern: Anchored::builtin(&PATTERN, INTEGER_PATTERN),
        }
    }
}

impl Default for IntegerValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for IntegerValidator {
    fn code(&self) -> &str {
        "INTEGER"
    }

    fn message(&self) -> &str {
        "The {key} must be an integer."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_text(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        Anchored::matches_builtin(self.pattern.as_ref(), value)
    }
}

impl RuleValidator for IntegerValidator {
    const NAMES: &'static [&'static str] = &["integer", "int"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 0)?;
        Ok(Self::new())
    }
}

/// Fails unless the value's text is a decimal number.
///
/// Accepts an optional sign, fraction and exponent. The empty string matches.
#[derive(Debug, Clone)]
pub struct NumericValidator {
    pattern: Option<Anchored>,
}

impl NumericValidator {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        static PATTERN: OnceLock<Option<Anchored>> = OnceLock::new();
        Self {
            pattern: Anchored::builtin(&PATTERN, NUMERIC_PATTERN),
        }
    }
}

impl Default for NumericValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for NumericValidator {
    fn code(&self) -> &str {
        "NUMERIC"
    }

    fn message(&self) -> &str {
        "The {key} must be a number."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_text(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        Anchored::matches_builtin(self.pattern.as_ref(), value)
    }
}

impl RuleValidator for NumericValidator {
    const NAMES: &'static [&'static str] = &["numeric"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_args(Self::NAMES[0], args, 0)?;
        Ok(Self::new())
    }
}
