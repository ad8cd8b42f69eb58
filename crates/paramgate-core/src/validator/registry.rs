//! Validator registry.
//!
//! Maps rule names to factories that build a validator from rule arguments.
//! A process-wide instance preloaded with the built-in rules is available
//! through [`ValidatorRegistry::global`].

use super::{
    parse_rules, BetweenValidator, ExtInValidator, ExtNotInValidator, IntegerValidator,
    InValidator, MaxValidator, MinValidator, NotInValidator, NumericValidator, RegexValidator,
    RequiredIfValidator, RequiredValidator, RequiredWithValidator, RequiredWithoutValidator,
    RuleValidator, SharedValidator,
};
use crate::error::ConfigurationError;
use crate::names::RegistryNames;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Builds a validator from rule arguments.
pub type ValidatorFactory =
    Arc<dyn Fn(&[String]) -> Result<SharedValidator, ConfigurationError> + Send + Sync>;

/// Name to validator-factory table.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    factories: HashMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in rule.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_rule::<RequiredValidator>();
        registry.register_rule::<RequiredWithValidator>();
        registry.register_rule::<RequiredWithoutValidator>();
        registry.register_rule::<RequiredIfValidator>();
        registry.register_rule::<MinValidator>();
        registry.register_rule::<MaxValidator>();
        registry.register_rule::<BetweenValidator>();
        registry.register_rule::<RegexValidator>();
        registry.register_rule::<IntegerValidator>();
        registry.register_rule::<NumericValidator>();
        registry.register_rule::<InValidator>();
        registry.register_rule::<NotInValidator>();
        registry.register_rule::<ExtInValidator>();
        registry.register_rule::<ExtNotInValidator>();
        registry
    }

    /// Returns the process-wide registry.
    ///
    /// The built-in rules are registered on first access.
    pub fn global() -> &'static RwLock<Self> {
        static GLOBAL: OnceLock<RwLock<ValidatorRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(Self::with_builtins()))
    }

    /// Registers a factory under one or more names.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, names: impl RegistryNames, factory: F)
    where
        F: Fn(&[String]) -> Result<SharedValidator, ConfigurationError> + Send + Sync + 'static,
    {
        let factory: ValidatorFactory = Arc::new(factory);
        for name in names.into_names() {
            tracing::debug!(rule = %name, "registered validator");
            self.factories.insert(name, Arc::clone(&factory));
        }
    }

    /// Registers a [`RuleValidator`] under its own names.
    pub fn register_rule<V: RuleValidator>(&mut self) {
        self.register(V::NAMES, |args: &[String]| {
            let validator: SharedValidator = Arc::new(V::from_args(args)?);
            Ok(validator)
        });
    }

    /// Returns the factory registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ValidatorFactory> {
        self.factories.get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns all registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds the validator registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownValidator`] for an unregistered
    /// name, or the factory's own error for bad arguments.
    pub fn build(&self, name: &str, args: &[String]) -> Result<SharedValidator, ConfigurationError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigurationError::unknown_validator(name))?;
        factory(args)
    }

    /// Turns a rule string into validators, in rule order.
    ///
    /// # Errors
    ///
    /// Fails on the first rule that is blank, unknown or has bad arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use paramgate_core::ValidatorRegistry;
    ///
    /// let registry = ValidatorRegistry::with_builtins();
    /// let validators = registry.get_validators("required | between:5,10").unwrap();
    /// assert_eq!(validators.len(), 2);
    /// assert_eq!(validators[0].code(), "REQUIRED");
    /// assert_eq!(validators[1].code(), "BETWEEN");
    ///
    /// assert!(registry.get_validators("bogus_rule").is_err());
    /// ```
    pub fn get_validators(&self, rules: &str) -> Result<Vec<SharedValidator>, ConfigurationError> {
        parse_rules(rules)?
            .iter()
            .map(|rule| self.build(&rule.name, &rule.args))
            .collect()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Registers a factory in the process-wide registry.
pub fn register_validator<F>(names: impl RegistryNames, factory: F)
where
    F: Fn(&[String]) -> Result<SharedValidator, ConfigurationError> + Send + Sync + 'static,
{
    ValidatorRegistry::global().write().register(names, factory);
}

/// Turns a rule string into validators using the process-wide registry.
///
/// # Errors
///
/// See [`ValidatorRegistry::get_validators`].
pub fn get_validators(rules: &str) -> Result<Vec<SharedValidator>, ConfigurationError> {
    ValidatorRegistry::global().read().get_validators(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{Validator, Verdict};
    use crate::value::{ParamMap, Value};

    #[test]
    fn test_builtins_are_registered() {
        let registry = ValidatorRegistry::with_builtins();
        for name in [
            "required",
            "required_with",
            "required_without",
            "required_if",
            "min",
            "max",
            "between",
            "regex",
            "integer",
            "int",
            "numeric",
            "in",
            "not_in",
            "ext_in",
            "ext_not_in",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_get_validators_in_order() {
        let registry = ValidatorRegistry::with_builtins();
        let validators = registry
            .get_validators("required | between:5,10 | regex:^\\w+$")
            .unwrap();

        let codes: Vec<&str> = validators.iter().map(|v| v.code()).collect();
        assert_eq!(codes, vec!["REQUIRED", "BETWEEN", "REGEX"]);
    }

    #[test]
    fn test_between_bounds_from_rule() {
        let registry = ValidatorRegistry::with_builtins();
        let validators = registry.get_validators("between:5,10").unwrap();
        let params: ParamMap = [("a", 11)].into_iter().collect();

        let err = validators[0].evaluate("a", &params, None).unwrap_err();
        assert_eq!(err.message(), "The a must be between 5 and 10.");
    }

    #[test]
    fn test_empty_and_unknown() {
        let registry = ValidatorRegistry::with_builtins();
        assert!(registry.get_validators("").unwrap().is_empty());
        assert!(matches!(
            registry.get_validators("bogus_rule"),
            Err(ConfigurationError::UnknownValidator { name }) if name == "bogus_rule"
        ));
        assert!(matches!(
            registry.get_validators("required | min"),
            Err(ConfigurationError::ArgumentCount { .. })
        ));
    }

    #[test]
    fn test_register_custom_factory() {
        #[derive(Debug)]
        struct Prefix(String);

        impl Validator for Prefix {
            fn code(&self) -> &str {
                "PREFIX"
            }
            fn message(&self) -> &str {
                "The {key} has the wrong prefix."
            }
            fn check(&self, value: &Value, _params: &ParamMap) -> Verdict {
                value.as_str().is_some_and(|s| s.starts_with(&self.0)).into()
            }
        }

        let mut registry = ValidatorRegistry::new();
        registry.register(["prefix", "starts_with"], |args: &[String]| {
            let prefix = args.first().cloned().unwrap_or_default();
            let validator: SharedValidator = Arc::new(Prefix(prefix));
            Ok(validator)
        });

        let validators = registry.get_validators("starts_with:ab").unwrap();
        let params: ParamMap = [("a", "abc")].into_iter().collect();
        assert!(validators[0].evaluate("a", &params, None).is_ok());
        assert_eq!(registry.names(), vec!["prefix", "starts_with"]);
    }

    #[test]
    fn test_global_registry_has_builtins() {
        assert!(ValidatorRegistry::global().read().contains("required"));
        assert_eq!(get_validators("required").unwrap().len(), 1);
    }
}
