//! Parameter descriptors.
//!
//! A [`Param`] declares one handler argument: where its raw value comes
//! from, what type it converts to, and which validators it must pass.
//! Descriptors are built once and shared by every invocation.

use http::StatusCode;
use paramgate_config::ValidationConfig;
use paramgate_core::{
    get_converter, get_validators, ConfigurationError, ParamMap, SharedConverter,
    SharedValidator, ValidationError, ValidationResult, Validator, Value,
};
use std::sync::Arc;

use crate::source::{self, Source};
use crate::RequestValues;

/// Handler-wide settings applied to parameters that leave them unset.
#[derive(Debug, Clone)]
pub struct ParamDefaults {
    /// Converter for parameters without an explicit type.
    pub converter: SharedConverter,
    /// Separator for `many` parameters without their own.
    pub separator: String,
    /// Status of wrapped conversion failures.
    pub conversion_status: StatusCode,
}

impl ParamDefaults {
    /// Resolves the defaults from configuration.
    ///
    /// An out-of-range status falls back to 400.
    #[must_use]
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            converter: get_converter(Some(&config.default_type)),
            separator: config.separator.clone(),
            conversion_status: StatusCode::from_u16(config.conversion_status)
                .unwrap_or(StatusCode::BAD_REQUEST),
        }
    }
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

/// One declared handler parameter.
///
/// # Example
///
/// ```rust
/// use paramgate_extract::{ExtractionContext, Param, ParamDefaults};
/// use paramgate_core::{ParamMap, Value};
/// use http::Uri;
///
/// let limit = Param::get("limit").kind("int").default(10).rules("between:1,100").build().unwrap();
///
/// let request = ExtractionContext::builder()
///     .uri(Uri::from_static("/?limit=25"))
///     .build()
///     .unwrap();
/// let value = limit.extract(&request, &ParamMap::new(), &ParamDefaults::default()).unwrap();
/// assert_eq!(value, Value::Int(25));
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    related_name: String,
    verbose_name: String,
    default: Value,
    kind: Option<String>,
    converter: Option<SharedConverter>,
    source: Arc<dyn Source>,
    many: bool,
    separator: Option<String>,
    validators: Vec<SharedValidator>,
}

impl Param {
    /// Declares a query-string parameter.
    #[must_use]
    pub fn get(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::Query))
    }

    /// Declares a body parameter.
    #[must_use]
    pub fn post(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::Body))
    }

    /// Declares an uploaded-file parameter. Its type defaults to `file`.
    #[must_use]
    pub fn file(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::Files)).kind("file")
    }

    /// Declares a parameter read from the body, else the query string.
    #[must_use]
    pub fn post_or_get(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::BodyOrQuery))
    }

    /// Declares a header parameter.
    #[must_use]
    pub fn header(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::Header))
    }

    /// Declares a parameter read from the handler arguments or path captures.
    #[must_use]
    pub fn uri(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source::Uri))
    }

    /// Declares a parameter read through a custom source.
    #[must_use]
    pub fn with_source(name: impl Into<String>, source: impl Source + 'static) -> ParamBuilder {
        ParamBuilder::new(name, Arc::new(source))
    }

    /// Lookup name in the source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the converted value is stored under.
    #[must_use]
    pub fn related_name(&self) -> &str {
        &self.related_name
    }

    /// Name used in error messages.
    #[must_use]
    pub fn verbose_name(&self) -> &str {
        &self.verbose_name
    }

    /// Declared type name, if any.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Whether the value is a delimited list.
    #[must_use]
    pub fn is_many(&self) -> bool {
        self.many
    }

    /// Resolved validators, rule-string ones first.
    #[must_use]
    pub fn validators(&self) -> &[SharedValidator] {
        &self.validators
    }

    /// Looks up and converts this parameter's value.
    ///
    /// `kwargs` are the handler arguments gathered so far.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure as a [`ValidationError`] naming this
    /// parameter.
    pub fn extract(
        &self,
        request: &dyn RequestValues,
        kwargs: &ParamMap,
        defaults: &ParamDefaults,
    ) -> ValidationResult<Value> {
        let raw = self.source.lookup(request, &self.name, &self.default, kwargs);
        let converter = self.converter.as_ref().unwrap_or(&defaults.converter);

        let convert = |raw: Value| {
            converter.convert(&self.verbose_name, raw).map_err(|err| {
                err.into_validation_error(defaults.conversion_status)
                    .with_field(self.verbose_name.clone())
            })
        };

        if !self.many {
            return convert(raw);
        }

        let separator = self.separator.as_deref().unwrap_or(&defaults.separator);
        let items = match raw {
            Value::Str(s) => s.split(separator).map(Value::from).collect(),
            Value::Null => Vec::new(),
            Value::List(items) => items,
            other => vec![other],
        };
        items
            .into_iter()
            .map(convert)
            .collect::<Result<Vec<_>, ValidationError>>()
            .map(Value::List)
    }

    /// Runs every validator against the complete argument map, stopping at
    /// the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`].
    pub fn validate(&self, args: &ParamMap) -> ValidationResult<()> {
        self.validators
            .iter()
            .try_for_each(|v| v.evaluate(&self.related_name, args, Some(&self.verbose_name)))
    }
}

/// Builder for [`Param`].
#[derive(Debug)]
#[must_use]
pub struct ParamBuilder {
    name: String,
    related_name: Option<String>,
    verbose_name: Option<String>,
    default: Value,
    kind: Option<String>,
    source: Arc<dyn Source>,
    many: bool,
    separator: Option<String>,
    rules: Option<String>,
    validators: Vec<SharedValidator>,
}

impl ParamBuilder {
    fn new(name: impl Into<String>, source: Arc<dyn Source>) -> Self {
        Self {
            name: name.into(),
            related_name: None,
            verbose_name: None,
            default: Value::Null,
            kind: None,
            source,
            many: false,
            separator: None,
            rules: None,
            validators: Vec::new(),
        }
    }

    /// Stores the value under a different argument name.
    pub fn related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }

    /// Names the parameter differently in error messages.
    pub fn verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    /// Value used when the source has none.
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Declares the type, resolved through the converter registry.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Treats the value as a delimited list.
    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Sets the list separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets the rule string, e.g. `"required | between:5,10"`.
    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Appends a validator after those from the rule string.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends several shared validators.
    pub fn validators(mut self, validators: impl IntoIterator<Item = SharedValidator>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Resolves the rule string and type.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a rule cannot be resolved or the
    /// separator is empty.
    pub fn build(self) -> Result<Param, ConfigurationError> {
        if self.separator.as_deref() == Some("") {
            return Err(ConfigurationError::invalid_argument(
                self.name,
                "",
                "separator must not be empty",
            ));
        }

        let mut validators = match self.rules.as_deref() {
            Some(rules) => get_validators(rules)?,
            None => Vec::new(),
        };
        validators.extend(self.validators);

        Ok(Param {
            related_name: self.related_name.unwrap_or_else(|| self.name.clone()),
            verbose_name: self.verbose_name.unwrap_or_else(|| self.name.clone()),
            converter: self.kind.as_deref().map(|kind| get_converter(Some(kind))),
            name: self.name,
            default: self.default,
            kind: self.kind,
            source: self.source,
            many: self.many,
            separator: self.separator,
            validators,
        })
    }
}
