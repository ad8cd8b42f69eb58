//! Type converters.
//!
//! A [`Converter`] turns a raw extracted value into the declared type. The
//! [`ConverterRegistry`] resolves type names (`"int"`, `"bool"`, ...) to
//! converters; unknown names fall back to the string converter.
//!
//! | Names | Result |
//! |---|---|
//! | `string`, `str` | text; null stays null |
//! | `integer`, `int` | `i64`, after an integer format check |
//! | `float` | `f64`, after a numeric format check |
//! | `boolean`, `bool` | `false` for the falsy set, `true` otherwise |
//! | `file` | unchanged |

use crate::error::ConversionError;
use crate::names::RegistryNames;
use crate::validator::{IntegerValidator, NumericValidator, Validator};
use crate::value::{ParamMap, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Converts a raw value to a declared type.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Converts `raw`. `key` names the parameter in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Rejected`] when a format check fails and
    /// [`ConversionError::Failed`] for any other conversion failure.
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError>;
}

/// A converter that knows the names it registers under.
pub trait NamedConverter: Converter + Default + 'static {
    /// Type names this converter answers to.
    const NAMES: &'static [&'static str];
}

/// Shared handle to a converter.
pub type SharedConverter = Arc<dyn Converter>;

/// Passes the raw value through untouched.
///
/// Fallback for parameters without a declared type, so JSON numbers and
/// booleans keep their shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(raw)
    }
}

impl NamedConverter for StringConverter {
    const NAMES: &'static [&'static str] = &["string", "str"];
}

/// Parses a signed 64-bit integer.
#[derive(Debug, Clone, Default)]
pub struct IntegerConverter {
    format: IntegerValidator,
}

impl Converter for IntegerConverter {
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null | Value::Int(_) => Ok(raw),
            other => {
                self.format.validate_value(&other, &ParamMap::new(), key)?;
                other
                    .to_string()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|err| ConversionError::failed(err.to_string()))
            }
        }
    }
}

impl NamedConverter for IntegerConverter {
    const NAMES: &'static [&'static str] = &["integer", "int"];
}

/// Parses a 64-bit float.
#[derive(Debug, Clone, Default)]
pub struct FloatConverter {
    format: NumericValidator,
}

impl Converter for FloatConverter {
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null | Value::Float(_) => Ok(raw),
            Value::Int(n) => Ok(Value::Float(n as f64)),
            other => {
                self.format.validate_value(&other, &ParamMap::new(), key)?;
                other
                    .to_string()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|err| ConversionError::failed(err.to_string()))
            }
        }
    }
}

impl NamedConverter for FloatConverter {
    const NAMES: &'static [&'static str] = &["float"];
}

/// Maps the falsy set to `false` and everything else to `true`.
///
/// Falsy: null, `false`, the strings `"false"`, `"False"` and `"0"`, integer
/// zero and float zero. The empty string and `"0.0"` are truthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl BooleanConverter {
    /// Returns `true` if `value` is in the falsy set.
    #[must_use]
    pub fn is_falsy(value: &Value) -> bool {
        match value {
            Value::Null | Value::Bool(false) | Value::Int(0) => true,
            Value::Float(x) => *x == 0.0,
            Value::Str(s) => matches!(s.as_str(), "false" | "False" | "0"),
            _ => false,
        }
    }
}

impl Converter for BooleanConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(Value::Bool(!Self::is_falsy(&raw)))
    }
}

impl NamedConverter for BooleanConverter {
    const NAMES: &'static [&'static str] = &["boolean", "bool"];
}

/// Passes uploaded files through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConverter;

impl Converter for FileConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(raw)
    }
}

impl NamedConverter for FileConverter {
    const NAMES: &'static [&'static str] = &["file"];
}

/// Type name to converter table.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, SharedConverter>,
    fallback: SharedConverter,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// Creates a registry with no names; every lookup yields the fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            fallback: Arc::new(StringConverter),
        }
    }

    /// Creates a registry holding the built-in converters.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let fallback = Arc::clone(&registry.fallback);
        registry.register_shared(StringConverter::NAMES, fallback);
        registry.register_type::<IntegerConverter>();
        registry.register_type::<FloatConverter>();
        registry.register_type::<BooleanConverter>();
        registry.register_type::<FileConverter>();
        registry
    }

    /// Returns the process-wide registry.
    ///
    /// The built-in converters are registered on first access.
    pub fn global() -> &'static RwLock<Self> {
        static GLOBAL: OnceLock<RwLock<ConverterRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(Self::with_builtins()))
    }

    /// Registers a converter under one or more names.
    pub fn register(&mut self, names: impl RegistryNames, converter: impl Converter + 'static) {
        self.register_shared(names, Arc::new(converter));
    }

    /// Registers an already shared converter under one or more names.
    pub fn register_shared(&mut self, names: impl RegistryNames, converter: SharedConverter) {
        for name in names.into_names() {
            tracing::debug!(type_name = %name, ?converter, "registered converter");
            self.converters.insert(name, Arc::clone(&converter));
        }
    }

    /// Registers a [`NamedConverter`] under its own names.
    pub fn register_type<C: NamedConverter>(&mut self) {
        self.register(C::NAMES, C::default());
    }

    /// Resolves a type name.
    ///
    /// An absent or unknown name yields the string converter.
    #[must_use]
    pub fn get(&self, name: Option<&str>) -> SharedConverter {
        name.and_then(|name| self.converters.get(name))
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Returns all registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Registers a converter in the process-wide registry.
pub fn register_converter(names: impl RegistryNames, converter: impl Converter + 'static) {
    ConverterRegistry::global().write().register(names, converter);
}

/// Resolves a type name using the process-wide registry.
#[must_use]
pub fn get_converter(name: Option<&str>) -> SharedConverter {
    ConverterRegistry::global().read().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TYPE_CONVERSION_FAILED;
    use crate::value::UploadedFile;
    use http::StatusCode;
    use proptest::prelude::*;

    fn convert(name: &str, raw: impl Into<Value>) -> Result<Value, ConversionError> {
        ConverterRegistry::with_builtins()
            .get(Some(name))
            .convert("a", raw.into())
    }

    #[test]
    fn test_unknown_name_falls_back_to_string() {
        let registry = ConverterRegistry::with_builtins();
        let unknown = registry.get(Some("uuid"));
        let absent = registry.get(None);
        let string = registry.get(Some("string"));

        assert!(Arc::ptr_eq(&unknown, &absent));
        assert!(Arc::ptr_eq(&unknown, &string));
    }

    #[test]
    fn test_string() {
        assert_eq!(convert("str", "12").unwrap(), Value::from("12"));
        assert_eq!(convert("str", 12).unwrap(), Value::Int(12));
        assert_eq!(convert("string", Value::Null).unwrap(), Value::Null);
        assert_eq!(convert("string", true).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_integer() {
        assert_eq!(convert("int", "42").unwrap(), Value::Int(42));
        assert_eq!(convert("integer", "-7").unwrap(), Value::Int(-7));
        assert_eq!(convert("int", 5).unwrap(), Value::Int(5));
        assert_eq!(convert("int", Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_integer_format_rejection_propagates() {
        let err = convert("int", "abc").unwrap_err();
        match err {
            ConversionError::Rejected(err) => {
                assert_eq!(err.message(), "The a must be an integer.");
                assert_eq!(err.code(), "INTEGER");
            }
            ConversionError::Failed(cause) => panic!("expected rejection, got {cause}"),
        }
    }

    #[test]
    fn test_non_ascii_digits_fail_format_check() {
        let err = convert("int", "\u{663}").unwrap_err();
        assert!(matches!(err, ConversionError::Rejected(ref e) if e.code() == "INTEGER"));
    }

    #[test]
    fn test_integer_overflow_is_wrapped() {
        let err = convert("int", "99999999999999999999")
            .unwrap_err()
            .into_validation_error(StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), TYPE_CONVERSION_FAILED);
        assert!(err.message().starts_with("type convert error: "));
    }

    #[test]
    fn test_float() {
        assert_eq!(convert("float", "1.5").unwrap(), Value::Float(1.5));
        assert_eq!(convert("float", "2e3").unwrap(), Value::Float(2000.0));
        assert_eq!(convert("float", 2).unwrap(), Value::Float(2.0));
        assert!(matches!(convert("float", "x"), Err(ConversionError::Rejected(_))));
        assert!(matches!(convert("float", ""), Err(ConversionError::Failed(_))));
    }

    #[test]
    fn test_boolean_falsy_set() {
        for raw in [
            Value::Null,
            Value::Bool(false),
            Value::from("false"),
            Value::from("False"),
            Value::from("0"),
            Value::Int(0),
            Value::Float(0.0),
        ] {
            assert_eq!(convert("bool", raw.clone()).unwrap(), Value::Bool(false), "{raw:?}");
        }
    }

    #[test]
    fn test_boolean_truthy() {
        for raw in [
            Value::from(""),
            Value::from("true"),
            Value::from("no"),
            Value::from("0.0"),
            Value::Int(2),
            Value::Bool(true),
        ] {
            assert_eq!(convert("boolean", raw.clone()).unwrap(), Value::Bool(true), "{raw:?}");
        }
    }

    #[test]
    fn test_file_is_identity() {
        let file = UploadedFile::new("a.txt", "hello");
        assert_eq!(convert("file", file.clone()).unwrap(), Value::File(file));
    }

    #[test]
    fn test_register_custom_converter() {
        #[derive(Debug)]
        struct Upper;

        impl Converter for Upper {
            fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
                Ok(Value::Str(raw.to_string().to_uppercase()))
            }
        }

        let mut registry = ConverterRegistry::with_builtins();
        registry.register("upper", Upper);
        assert_eq!(
            registry.get(Some("upper")).convert("a", "abc".into()).unwrap(),
            Value::from("ABC")
        );
        assert!(registry.names().contains(&"upper"));
    }

    proptest! {
        #[test]
        fn prop_integer_round_trip(n in any::<i64>()) {
            prop_assert_eq!(convert("int", n.to_string()).unwrap(), Value::Int(n));
        }

        #[test]
        fn prop_non_falsy_strings_are_true(s in "[a-zA-Z1-9 ]{1,12}") {
            prop_assume!(s != "false" && s != "False");
            prop_assert_eq!(convert("bool", s).unwrap(), Value::Bool(true));
        }
    }
}
