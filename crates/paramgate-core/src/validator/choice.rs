//! Choice validators: `in`, `not_in`, `ext_in` and `ext_not_in`.
//!
//! Choices are lower-cased when the validator is built; values are
//! lower-cased when cleaned.

use super::{expect_at_least, RuleValidator, Validator, Verdict};
use crate::error::ConfigurationError;
use crate::value::{extension_of, ParamMap, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;

fn lowered<I, S>(choices: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    choices
        .into_iter()
        .map(|choice| choice.as_ref().to_lowercase())
        .collect()
}

fn dotted<I, S>(choices: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lowered(choices)
        .into_iter()
        .map(|choice| {
            if choice.starts_with('.') {
                choice
            } else {
                format!(".{choice}")
            }
        })
        .collect()
}

fn clean_lowered(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Null => Cow::Owned(Value::Str(String::new())),
        other => Cow::Owned(Value::Str(other.to_string().to_lowercase())),
    }
}

fn clean_extension(value: &Value) -> Cow<'_, Value> {
    let ext = match value {
        Value::File(file) => file.extension(),
        Value::Str(name) => extension_of(name),
        _ => String::new(),
    };
    Cow::Owned(Value::Str(ext))
}

fn contains(choices: &BTreeSet<String>, value: &Value) -> bool {
    value.as_str().is_some_and(|s| choices.contains(s))
}

/// Fails unless the value is one of a fixed set of choices, ignoring case.
#[derive(Debug, Clone)]
pub struct InValidator {
    choices: BTreeSet<String>,
}

impl InValidator {
    /// Creates the validator from its choices.
    #[must_use]
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            choices: lowered(choices),
        }
    }
}

impl Validator for InValidator {
    fn code(&self) -> &str {
        "IN"
    }

    fn message(&self) -> &str {
        "The selected {key} is invalid."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_lowered(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        contains(&self.choices, value).into()
    }
}

impl RuleValidator for InValidator {
    const NAMES: &'static [&'static str] = &["in"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_at_least(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args))
    }
}

/// Fails when the value is one of a fixed set of choices, ignoring case.
#[derive(Debug, Clone)]
pub struct NotInValidator {
    choices: BTreeSet<String>,
}

impl NotInValidator {
    /// Creates the validator from the rejected choices.
    #[must_use]
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            choices: lowered(choices),
        }
    }
}

impl Validator for NotInValidator {
    fn code(&self) -> &str {
        "NOT_IN"
    }

    fn message(&self) -> &str {
        "The selected {key} is invalid."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_lowered(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        (!contains(&self.choices, value)).into()
    }
}

impl RuleValidator for NotInValidator {
    const NAMES: &'static [&'static str] = &["not_in"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_at_least(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args))
    }
}

/// Fails unless a file's extension is one of a fixed set.
///
/// Text values are treated as file names.
#[derive(Debug, Clone)]
pub struct ExtInValidator {
    choices: BTreeSet<String>,
}

impl ExtInValidator {
    /// Creates the validator; a leading dot is optional on each extension.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            choices: dotted(extensions),
        }
    }
}

impl Validator for ExtInValidator {
    fn code(&self) -> &str {
        "EXT_IN"
    }

    fn message(&self) -> &str {
        "The extension type of {key} is invalid."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_extension(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        contains(&self.choices, value).into()
    }
}

impl RuleValidator for ExtInValidator {
    const NAMES: &'static [&'static str] = &["ext_in"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_at_least(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args))
    }
}

/// Fails when a file's extension is one of a fixed set.
#[derive(Debug, Clone)]
pub struct ExtNotInValidator {
    choices: BTreeSet<String>,
}

impl ExtNotInValidator {
    /// Creates the validator; a leading dot is optional on each extension.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            choices: dotted(extensions),
        }
    }
}

impl Validator for ExtNotInValidator {
    fn code(&self) -> &str {
        "EXT_NOT_IN"
    }

    fn message(&self) -> &str {
        "The extension type of {key} is invalid."
    }

    fn clean<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        clean_extension(value)
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        (!contains(&self.choices, value)).into()
    }
}

impl RuleValidator for ExtNotInValidator {
    const NAMES: &'static [&'static str] = &["ext_not_in"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        expect_at_least(Self::NAMES[0], args, 1)?;
        Ok(Self::new(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::UploadedFile;

    fn passes(validator: &dyn Validator, value: impl Into<Value>) -> bool {
        let params: ParamMap = [("a", value.into())].into_iter().collect();
        validator.evaluate("a", &params, None).is_ok()
    }

    #[test]
    fn test_in_is_case_insensitive() {
        let validator = InValidator::new(["Red", "green"]);
        assert!(passes(&validator, "red"));
        assert!(passes(&validator, "GREEN"));
        assert!(!passes(&validator, "blue"));
        assert!(passes(&validator, Value::Null));
    }

    #[test]
    fn test_in_compares_display_form() {
        let validator = InValidator::new(["1", "2"]);
        assert!(passes(&validator, 1));
        assert!(!passes(&validator, 3));
    }

    #[test]
    fn test_in_message() {
        let params: ParamMap = [("color", "blue")].into_iter().collect();
        let err = InValidator::new(["red"])
            .evaluate("color", &params, None)
            .expect_err("blue is not allowed");
        assert_eq!(err.message(), "The selected color is invalid.");
        assert_eq!(err.code(), "IN");
    }

    #[test]
    fn test_not_in() {
        let validator = NotInValidator::new(["admin", "root"]);
        assert!(!passes(&validator, "Admin"));
        assert!(passes(&validator, "guest"));
        assert_eq!(validator.code(), "NOT_IN");
    }

    #[test]
    fn test_ext_in() {
        let validator = ExtInValidator::new(["png", ".JPG"]);
        assert!(passes(&validator, UploadedFile::new("a.PNG", "x")));
        assert!(passes(&validator, UploadedFile::new("photo.jpg", "x")));
        assert!(!passes(&validator, UploadedFile::new("a.gif", "x")));
        assert!(!passes(&validator, UploadedFile::new("noext", "x")));
        assert!(passes(&validator, "named.png"));
    }

    #[test]
    fn test_ext_not_in() {
        let validator = ExtNotInValidator::new(["exe"]);
        let params: ParamMap = [("upload", UploadedFile::new("virus.exe", "x"))]
            .into_iter()
            .collect();
        let err = validator
            .evaluate("upload", &params, None)
            .expect_err("exe is rejected");
        assert_eq!(err.message(), "The extension type of upload is invalid.");
        assert!(passes(&validator, UploadedFile::new("notes.txt", "x")));
    }

    #[test]
    fn test_choices_required() {
        assert!(InValidator::from_args(&[]).is_err());
        assert!(ExtInValidator::from_args(&["png".into()]).is_ok());
    }
}
