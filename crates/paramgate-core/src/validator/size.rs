//! Size validators: `min`, `max` and `between`.
//!
//! The measured quantity depends on the value: characters for text, bytes for
//! files, items for lists, magnitude for numbers. Each kind has its own
//! message, selected when the check fails and returned with the verdict.

use super::{expect_args, int_arg, RuleValidator, Validator, Verdict};
use crate::error::ConfigurationError;
use crate::value::{ParamMap, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Characters,
    Bytes,
    Items,
    Plain,
}

#[derive(Debug, Clone, Copy)]
enum Magnitude {
    Exact(i128),
    Approx(f64),
}

#[derive(Debug, Clone, Copy)]
struct Measure {
    unit: Unit,
    magnitude: Magnitude,
}

impl Measure {
    fn of(value: &Value) -> Option<Self> {
        let (unit, magnitude) = match value {
            Value::Null => return None,
            Value::Str(s) => (Unit::Characters, Magnitude::Exact(s.chars().count() as i128)),
            Value::File(file) => (Unit::Bytes, Magnitude::Exact(i128::from(file.size()))),
            Value::List(items) => (Unit::Items, Magnitude::Exact(items.len() as i128)),
            Value::Int(n) => (Unit::Plain, Magnitude::Exact(i128::from(*n))),
            Value::Bool(b) => (Unit::Plain, Magnitude::Exact(i128::from(*b))),
            Value::Float(x) => (Unit::Plain, Magnitude::Approx(*x)),
        };
        Some(Self { unit, magnitude })
    }

    fn at_least(self, bound: i64) -> bool {
        match self.magnitude {
            Magnitude::Exact(n) => n >= i128::from(bound),
            Magnitude::Approx(x) => x >= bound as f64,
        }
    }

    fn at_most(self, bound: i64) -> bool {
        match self.magnitude {
            Magnitude::Exact(n) => n <= i128::from(bound),
            Magnitude::Approx(x) => x <= bound as f64,
        }
    }
}

/// Fails when the value measures less than a lower bound.
#[derive(Debug, Clone, Copy)]
pub struct MinValidator {
    min: i64,
}

impl MinValidator {
    /// Creates the validator with an inclusive lower bound.
    #[must_use]
    pub const fn new(min: i64) -> Self {
        Self { min }
    }

    fn branch_message(&self, unit: Unit) -> String {
        let min = self.min;
        match unit {
            Unit::Characters => format!("The {{key}} must be at least {min} characters."),
            Unit::Bytes => format!("The {{key}} must be at least {min} bytes."),
            Unit::Items => format!("The {{key}} must have at least {min} items."),
            Unit::Plain => format!("The {{key}} must be at least {min}."),
        }
    }
}

impl Validator for MinValidator {
    fn code(&self) -> &str {
        "MIN"
    }

    fn message(&self) -> &str {
        "The {key} is too small."
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        match Measure::of(value) {
            Some(measure) if measure.at_least(self.min) => Verdict::Valid,
            Some(measure) => Verdict::InvalidWith(self.branch_message(measure.unit)),
            None => Verdict::Invalid,
        }
    }
}

impl RuleValidator for MinValidator {
    const NAMES: &'static [&'static str] = &["min"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        let name = Self::NAMES[0];
        expect_args(name, args, 1)?;
        Ok(Self::new(int_arg(name, &args[0])?))
    }
}

/// Fails when the value measures more than an upper bound.
#[derive(Debug, Clone, Copy)]
pub struct MaxValidator {
    max: i64,
}

impl MaxValidator {
    /// Creates the validator with an inclusive upper bound.
    #[must_use]
    pub const fn new(max: i64) -> Self {
        Self { max }
    }

    fn branch_message(&self, unit: Unit) -> String {
        let max = self.max;
        match unit {
            Unit::Characters => format!("The {{key}} may not be greater than {max} characters."),
            Unit::Bytes => format!("The {{key}} must not be at greater {max} bytes."),
            Unit::Items => format!("The {{key}} may not have more than {max} items."),
            Unit::Plain => format!("The {{key}} may not be greater than {max}."),
        }
    }
}

impl Validator for MaxValidator {
    fn code(&self) -> &str {
        "MAX"
    }

    fn message(&self) -> &str {
        "The {key} is too large."
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        match Measure::of(value) {
            Some(measure) if measure.at_most(self.max) => Verdict::Valid,
            Some(measure) => Verdict::InvalidWith(self.branch_message(measure.unit)),
            None => Verdict::Invalid,
        }
    }
}

impl RuleValidator for MaxValidator {
    const NAMES: &'static [&'static str] = &["max"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        let name = Self::NAMES[0];
        expect_args(name, args, 1)?;
        Ok(Self::new(int_arg(name, &args[0])?))
    }
}

/// Fails when the value measures outside an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct BetweenValidator {
    min: i64,
    max: i64,
}

impl BetweenValidator {
    /// Creates the validator with inclusive bounds.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns the `(min, max)` bounds.
    #[must_use]
    pub const fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    fn branch_message(&self, unit: Unit) -> String {
        let (min, max) = (self.min, self.max);
        let suffix = match unit {
            Unit::Characters => " characters",
            Unit::Bytes => " bytes",
            Unit::Items => " items",
            Unit::Plain => "",
        };
        format!("The {{key}} must be between {min} and {max}{suffix}.")
    }
}

impl Validator for BetweenValidator {
    fn code(&self) -> &str {
        "BETWEEN"
    }

    fn message(&self) -> &str {
        "The {key} is out of range."
    }

    fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
        match Measure::of(value) {
            Some(measure) if measure.at_least(self.min) && measure.at_most(self.max) => {
                Verdict::Valid
            }
            Some(measure) => Verdict::InvalidWith(self.branch_message(measure.unit)),
            None => Verdict::Invalid,
        }
    }
}

impl RuleValidator for BetweenValidator {
    const NAMES: &'static [&'static str] = &["between"];

    fn from_args(args: &[String]) -> Result<Self, ConfigurationError> {
        let name = Self::NAMES[0];
        expect_args(name, args, 2)?;
        Ok(Self::new(int_arg(name, &args[0])?, int_arg(name, &args[1])?))
    }
}
