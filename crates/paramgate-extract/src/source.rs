//! Where a parameter's raw value comes from.
//!
//! Six built-in sources cover the common request locations. Anything else
//! can be expressed as a closure:
//!
//! ```rust
//! use paramgate_extract::{RequestValues, Source};
//! use paramgate_core::{ParamMap, Value};
//!
//! let cookie = |request: &dyn RequestValues, _name: &str, default: &Value, _kwargs: &ParamMap| {
//!     request.header("cookie").unwrap_or_else(|| default.clone())
//! };
//! fn assert_source<S: Source>(_: &S) {}
//! assert_source(&cookie);
//! ```

use paramgate_core::{ParamMap, Value};
use std::fmt;

use crate::RequestValues;

/// Resolves the raw value of one parameter.
pub trait Source: Send + Sync {
    /// Returns the raw value named `name`, or `default` when it is absent.
    ///
    /// `kwargs` holds the arguments the handler was invoked with.
    fn lookup(&self, request: &dyn RequestValues, name: &str, default: &Value, kwargs: &ParamMap) -> Value;

    /// Short label used in logs.
    fn kind(&self) -> &'static str {
        "custom"
    }
}

impl<F> Source for F
where
    F: Fn(&dyn RequestValues, &str, &Value, &ParamMap) -> Value + Send + Sync,
{
    fn lookup(&self, request: &dyn RequestValues, name: &str, default: &Value, kwargs: &ParamMap) -> Value {
        self(request, name, default, kwargs)
    }
}

impl fmt::Debug for dyn Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.kind())
    }
}

macro_rules! simple_source {
    ($(#[$doc:meta])* $ty:ident, $method:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Source for $ty {
            fn lookup(&self, request: &dyn RequestValues, name: &str, default: &Value, _kwargs: &ParamMap) -> Value {
                request.$method(name).unwrap_or_else(|| default.clone())
            }

            fn kind(&self) -> &'static str {
                $kind
            }
        }
    };
}

simple_source!(
    /// The query string.
    Query, query, "query"
);
simple_source!(
    /// Body fields.
    Body, body, "body"
);
simple_source!(
    /// Uploaded files.
    Files, file, "files"
);
simple_source!(
    /// Request headers, by plain or `HTTP_`-prefixed name.
    Header, header, "header"
);

/// Body fields, falling back to the query string.
///
/// A body field that is present but null counts as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyOrQuery;

impl Source for BodyOrQuery {
    fn lookup(&self, request: &dyn RequestValues, name: &str, default: &Value, _kwargs: &ParamMap) -> Value {
        request
            .body(name)
            .filter(|v| !v.is_null())
            .or_else(|| request.query(name))
            .unwrap_or_else(|| default.clone())
    }

    fn kind(&self) -> &'static str {
        "body_or_query"
    }
}

/// Handler arguments, then host-supplied extras such as path captures.
///
/// An argument that is present wins even when it is null.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uri;

impl Source for Uri {
    fn lookup(&self, request: &dyn RequestValues, name: &str, default: &Value, kwargs: &ParamMap) -> Value {
        if let Some(value) = kwargs.get(name) {
            return value.clone();
        }
        request.extra(name).unwrap_or_else(|| default.clone())
    }

    fn kind(&self) -> &'static str {
        "uri"
    }
}
