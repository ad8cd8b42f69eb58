//! # Paramgate Extract
//!
//! Declarative request parameters: where values come from, how they are
//! converted, and the handler wrapper that validates them before a handler
//! runs.
//!
//! - [`RequestValues`] / [`ExtractionContext`] - The request as seen by sources
//! - [`Source`] - Query, body, files, headers, URI or anything else
//! - [`Param`] - One declared parameter
//! - [`ParamHandler`] - Two-pass extract-then-validate wrapper
//!
//! ## Example
//!
//! ```rust
//! use paramgate_extract::{ExtractionContext, Param, ParamHandler};
//! use paramgate_core::{validator::RegexValidator, ParamMap};
//! use http::Method;
//!
//! let login = ParamHandler::builder()
//!     .name("login")
//!     .param(Param::post("name").rules("required").build().unwrap())
//!     .param(
//!         Param::post("password")
//!             .validator(RegexValidator::new("^(password|pwd)$").unwrap())
//!             .build()
//!             .unwrap(),
//!     )
//!     .build(|_request, args: ParamMap| args.get_as::<String>("name"));
//!
//! let request = ExtractionContext::builder()
//!     .method(Method::POST)
//!     .form_field("password", "password")
//!     .build()
//!     .unwrap();
//!
//! let err = login.handle_request(&request).unwrap_err();
//! assert_eq!(err.message(), "The name is required.");
//! ```

#![doc(html_root_url = "https://docs.rs/paramgate-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
pub mod multipart;
mod param;
mod params;
pub mod source;

pub use context::{ExtractionContext, ExtractionContextBuilder, RequestValues, DEFAULT_MAX_FORM_SIZE};
pub use error::{ExtractionError, ExtractionSource};
pub use handler::{ParamHandler, ParamHandlerBuilder};
pub use multipart::{MultipartConfig, MultipartForm};
pub use param::{Param, ParamBuilder, ParamDefaults};
pub use params::PathParams;
pub use source::Source;
