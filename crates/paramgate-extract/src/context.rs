//! Request data as seen by parameter sources.
//!
//! [`RequestValues`] is the narrow view a [`Source`](crate::Source) reads
//! from. Hosts either implement it for their own request type or build an
//! [`ExtractionContext`] from raw request parts.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use indexmap::IndexMap;
use paramgate_core::{ParamMap, UploadedFile, Value};

use crate::multipart::MultipartForm;
use crate::{ExtractionError, ExtractionSource, PathParams};

/// Default limit for buffered JSON and form bodies (2 MB).
pub const DEFAULT_MAX_FORM_SIZE: usize = 2 * 1024 * 1024;

/// Read access to the values of one request.
///
/// Every method returns `None` when the request has no value under `name`.
pub trait RequestValues {
    /// Looks up a query-string value.
    fn query(&self, name: &str) -> Option<Value>;

    /// Looks up a body field.
    fn body(&self, name: &str) -> Option<Value>;

    /// Looks up an uploaded file.
    fn file(&self, name: &str) -> Option<Value>;

    /// Looks up a header.
    ///
    /// Accepts both plain header names (`x-token`) and CGI-style names
    /// (`HTTP_X_TOKEN`).
    fn header(&self, name: &str) -> Option<Value>;

    /// Looks up a host-supplied extra value, such as a path capture.
    fn extra(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Maps `HTTP_X_TOKEN` and `CONTENT_TYPE` style names to header names.
fn header_name(name: &str) -> String {
    let name = name.strip_prefix("HTTP_").unwrap_or(name);
    name.replace('_', "-").to_ascii_lowercase()
}

/// Buffered request data.
///
/// # Example
///
/// ```rust
/// use paramgate_extract::{ExtractionContext, RequestValues};
/// use paramgate_core::Value;
/// use http::{Method, Uri};
///
/// let ctx = ExtractionContext::builder()
///     .method(Method::GET)
///     .uri(Uri::from_static("/articles?offset=10&limit=20"))
///     .header("x-token", "secret")
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.query("offset"), Some(Value::from("10")));
/// assert_eq!(ctx.header("HTTP_X_TOKEN"), Some(Value::from("secret")));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: IndexMap<String, String>,
    body_fields: ParamMap,
    files: IndexMap<String, UploadedFile>,
    path_params: PathParams,
}

impl ExtractionContext {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the parsed body fields.
    #[must_use]
    pub fn body_fields(&self) -> &ParamMap {
        &self.body_fields
    }

    /// Returns the path captures.
    #[must_use]
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }
}

impl RequestValues for ExtractionContext {
    fn query(&self, name: &str) -> Option<Value> {
        self.query.get(name).map(|v| Value::Str(v.clone()))
    }

    fn body(&self, name: &str) -> Option<Value> {
        self.body_fields.get(name).cloned()
    }

    fn file(&self, name: &str) -> Option<Value> {
        self.files.get(name).cloned().map(Value::File)
    }

    fn header(&self, name: &str) -> Option<Value> {
        self.headers
            .get(header_name(name).as_str())
            .and_then(|v| v.to_str().ok())
            .map(Value::from)
    }

    fn extra(&self, name: &str) -> Option<Value> {
        self.path_params.get(name).map(Value::from)
    }
}

/// Builder for [`ExtractionContext`].
///
/// JSON object bodies and urlencoded form bodies are decoded on
/// [`build`](Self::build). Multipart bodies are parsed ahead of time with
/// [`MultipartForm::parse`] and merged with [`multipart`](Self::multipart).
#[derive(Debug)]
pub struct ExtractionContextBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    max_body_size: usize,
    body_fields: ParamMap,
    files: IndexMap<String, UploadedFile>,
    path_params: PathParams,
    error: Option<ExtractionError>,
}

impl Default for ExtractionContextBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            max_body_size: DEFAULT_MAX_FORM_SIZE,
            body_fields: ParamMap::new(),
            files: IndexMap::new(),
            path_params: PathParams::new(),
            error: None,
        }
    }
}

impl ExtractionContextBuilder {
    /// Creates a builder for `GET /`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request URI. Its query string becomes the query source.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a header. An invalid name or value fails [`build`](Self::build).
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| e.to_string())
            .and_then(|n| HeaderValue::from_str(value).map(|v| (n, v)).map_err(|e| e.to_string()));

        match parsed {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(details) => {
                self.error.get_or_insert_with(|| {
                    ExtractionError::invalid_value(ExtractionSource::Header, name, details)
                });
            }
        }
        self
    }

    /// Sets the raw body, decoded on build according to its content type.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the limit for the raw body.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Sets a body field directly.
    #[must_use]
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body_fields.insert(name, value);
        self
    }

    /// Adds an uploaded file under a form field name.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    /// Merges a parsed multipart body.
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        let (fields, files) = form.into_parts();
        self.body_fields.extend(fields);
        self.files.extend(files);
        self
    }

    /// Adds a path capture.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Sets all path captures.
    #[must_use]
    pub fn path_params(mut self, params: PathParams) -> Self {
        self.path_params = params;
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns an error if a header was invalid, the body exceeds the size
    /// limit, or the query string or body cannot be decoded.
    pub fn build(self) -> Result<ExtractionContext, ExtractionError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let query = match self.uri.query() {
            Some(qs) => serde_urlencoded::from_str::<Vec<(String, String)>>(qs)
                .map_err(|e| ExtractionError::malformed(ExtractionSource::Query, e.to_string()))?
                .into_iter()
                .collect(),
            None => IndexMap::new(),
        };

        let mut body_fields = self.body_fields;
        if !self.body.is_empty() {
            if self.body.len() > self.max_body_size {
                return Err(ExtractionError::too_large(
                    self.max_body_size,
                    self.body.len(),
                ));
            }
            let content_type = self
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            decode_body(content_type, &self.body, &mut body_fields)?;
        }

        Ok(ExtractionContext {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            query,
            body_fields,
            files: self.files,
            path_params: self.path_params,
        })
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
}

fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

/// Decodes JSON object and urlencoded bodies into `fields`; other content
/// types leave the body undecoded.
fn decode_body(content_type: &str, body: &Bytes, fields: &mut ParamMap) -> Result<(), ExtractionError> {
    if is_json(content_type) {
        let json: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Body, e.to_string()))?;
        let serde_json::Value::Object(object) = json else {
            return Err(ExtractionError::malformed(
                ExtractionSource::Body,
                "expected a JSON object",
            ));
        };
        fields.extend(object);
    } else if is_form(content_type) {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Body, e.to_string()))?;
        fields.extend(pairs);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ctx = ExtractionContext::builder().build().expect("defaults build");

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.body_fields().is_empty());
        assert_eq!(ctx.query("anything"), None);
    }

    #[test]
    fn test_query_last_value_wins() {
        let ctx = ExtractionContext::builder()
            .uri(Uri::from_static("/search?tag=a&tag=b&q=rust%20lang"))
            .build()
            .expect("valid query");

        assert_eq!(ctx.query("tag"), Some(Value::from("b")));
        assert_eq!(ctx.query("q"), Some(Value::from("rust lang")));
    }

    #[test]
    fn test_header_lookup_styles() {
        let ctx = ExtractionContext::builder()
            .header("X-Token", "abc")
            .header("content-type", "text/plain")
            .build()
            .expect("valid headers");

        assert_eq!(ctx.header("x-token"), Some(Value::from("abc")));
        assert_eq!(ctx.header("HTTP_X_TOKEN"), Some(Value::from("abc")));
        assert_eq!(ctx.header("CONTENT_TYPE"), Some(Value::from("text/plain")));
        assert_eq!(ctx.header("HTTP_MISSING"), None);
    }

    #[test]
    fn test_invalid_header_fails_build() {
        let err = ExtractionContext::builder()
            .header("bad header", "x")
            .build()
            .expect_err("invalid header name");

        assert_eq!(err.extraction_source(), ExtractionSource::Header);
        assert_eq!(err.field(), Some("bad header"));
    }

    #[test]
    fn test_json_body() {
        let ctx = ExtractionContext::builder()
            .method(Method::POST)
            .header("content-type", "application/json; charset=utf-8")
            .body(r#"{"name": "alice", "age": 30, "tags": ["a", "b"]}"#)
            .build()
            .expect("valid json");

        assert_eq!(ctx.body("name"), Some(Value::from("alice")));
        assert_eq!(ctx.body("age"), Some(Value::Int(30)));
        assert_eq!(ctx.body("tags"), Some(Value::from(vec!["a", "b"])));
        assert_eq!(ctx.query("name"), None);
    }

    #[test]
    fn test_json_body_must_be_object() {
        let err = ExtractionContext::builder()
            .header("content-type", "application/json")
            .body("[1, 2]")
            .build()
            .expect_err("array body");
        assert_eq!(err.error_code(), "MALFORMED_REQUEST");
    }

    #[test]
    fn test_form_body() {
        let ctx = ExtractionContext::builder()
            .method(Method::POST)
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=bob&password=s3cret")
            .build()
            .expect("valid form");

        assert_eq!(ctx.body("name"), Some(Value::from("bob")));
        assert_eq!(ctx.body("password"), Some(Value::from("s3cret")));
    }

    #[test]
    fn test_unknown_body_type_is_ignored() {
        let ctx = ExtractionContext::builder()
            .header("content-type", "application/octet-stream")
            .body(vec![0_u8, 1, 2])
            .build()
            .expect("opaque body");
        assert!(ctx.body_fields().is_empty());
    }

    #[test]
    fn test_body_size_limit() {
        let err = ExtractionContext::builder()
            .header("content-type", "application/json")
            .body(r#"{"a": 1}"#)
            .max_body_size(4)
            .build()
            .expect_err("too large");
        assert_eq!(err.status_code(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_files_and_path_params() {
        let ctx = ExtractionContext::builder()
            .file("avatar", UploadedFile::new("me.jpg", &b"JPEG"[..]))
            .path_param("id", "42")
            .build()
            .expect("valid context");

        let file = ctx.file("avatar").expect("file present");
        assert_eq!(file.as_file().map(UploadedFile::name), Some("me.jpg"));
        assert_eq!(ctx.extra("id"), Some(Value::from("42")));
        assert_eq!(ctx.file("other"), None);
    }
}
