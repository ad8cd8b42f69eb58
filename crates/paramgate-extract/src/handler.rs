//! The validating handler wrapper.
//!
//! [`ParamHandler`] owns an ordered list of [`Param`]s and a handler
//! function. Each invocation runs in two passes: every parameter is
//! extracted and converted first, then every parameter's validators run
//! against the complete argument map. The first failure is returned and the
//! handler is not called.

use paramgate_config::ValidationConfig;
use paramgate_core::{ParamMap, ValidationResult};
use paramgate_telemetry::metrics::{record_invocation, record_validation_failure, Outcome};
use std::fmt;

use crate::{Param, ParamDefaults, RequestValues};

const DEFAULT_HANDLER_NAME: &str = "handler";

/// A handler wrapped with parameter declarations.
///
/// # Example
///
/// ```rust
/// use paramgate_extract::{ExtractionContext, Param, ParamHandler};
/// use paramgate_core::ParamMap;
/// use http::Uri;
///
/// let list = ParamHandler::builder()
///     .name("list_articles")
///     .param(Param::get("offset").kind("int").default(0).build().unwrap())
///     .param(Param::get("limit").kind("int").default(10).build().unwrap())
///     .build(|_request, args: ParamMap| {
///         (args.get_as::<i64>("offset"), args.get_as::<i64>("limit"))
///     });
///
/// let request = ExtractionContext::builder()
///     .uri(Uri::from_static("/articles?offset=10"))
///     .build()
///     .unwrap();
/// assert_eq!(list.handle_request(&request).unwrap(), (Some(10), Some(10)));
/// ```
pub struct ParamHandler<F> {
    name: String,
    params: Vec<Param>,
    defaults: ParamDefaults,
    log_failures: bool,
    handler: F,
}

impl ParamHandler<()> {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ParamHandlerBuilder {
        ParamHandlerBuilder::default()
    }
}

impl<F> ParamHandler<F> {
    /// Appends a parameter to this wrapper.
    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Handler name used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters in evaluation order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Extracts, converts and validates every parameter.
    ///
    /// Returns `kwargs` extended with the converted values. Converted values
    /// replace caller-supplied ones of the same name.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or validation failure.
    pub fn resolve(&self, request: &dyn RequestValues, kwargs: ParamMap) -> ValidationResult<ParamMap> {
        let mut args = kwargs;

        for param in &self.params {
            let value = param.extract(request, &args, &self.defaults)?;
            args.insert(param.related_name(), value);
        }

        for param in &self.params {
            param.validate(&args)?;
        }

        Ok(args)
    }
}

impl<F, T> ParamHandler<F>
where
    F: Fn(Option<&dyn RequestValues>, ParamMap) -> T,
{
    /// Runs the pipeline and calls the handler.
    ///
    /// Without a request the handler is called with `kwargs` unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or validation failure.
    pub fn handle(&self, request: Option<&dyn RequestValues>, kwargs: ParamMap) -> ValidationResult<T> {
        let Some(request) = request else {
            tracing::trace!(handler = %self.name, "no request, passing through");
            record_invocation(&self.name, Outcome::PassThrough);
            return Ok((self.handler)(None, kwargs));
        };

        let span = tracing::debug_span!("param_handler", handler = %self.name);
        let _guard = span.enter();

        match self.resolve(request, kwargs) {
            Ok(args) => {
                record_invocation(&self.name, Outcome::Accepted);
                Ok((self.handler)(Some(request), args))
            }
            Err(err) => {
                if self.log_failures {
                    tracing::debug!(
                        field = err.field().unwrap_or_default(),
                        code = err.code(),
                        status = err.status_code().as_u16(),
                        "parameter rejected: {err}"
                    );
                }
                record_validation_failure(&self.name, err.code());
                record_invocation(&self.name, Outcome::Rejected);
                Err(err)
            }
        }
    }

    /// Runs the pipeline for `request` with no caller arguments.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or validation failure.
    pub fn handle_request(&self, request: &dyn RequestValues) -> ValidationResult<T> {
        self.handle(Some(request), ParamMap::new())
    }
}

impl<F> fmt::Debug for ParamHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamHandler")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ParamHandler`].
#[derive(Debug)]
#[must_use]
pub struct ParamHandlerBuilder {
    name: String,
    params: Vec<Param>,
    defaults: ParamDefaults,
    log_failures: bool,
}

impl Default for ParamHandlerBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_HANDLER_NAME.to_string(),
            params: Vec::new(),
            defaults: ParamDefaults::default(),
            log_failures: true,
        }
    }
}

impl ParamHandlerBuilder {
    /// Sets the handler name used in logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Applies handler-wide defaults from configuration.
    pub fn config(mut self, config: &ValidationConfig) -> Self {
        self.defaults = ParamDefaults::from_config(config);
        self.log_failures = config.log_failures;
        self
    }

    /// Appends a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Wraps the handler function.
    pub fn build<F, T>(self, handler: F) -> ParamHandler<F>
    where
        F: Fn(Option<&dyn RequestValues>, ParamMap) -> T,
    {
        ParamHandler {
            name: self.name,
            params: self.params,
            defaults: self.defaults,
            log_failures: self.log_failures,
            handler,
        }
    }
}
