//! `multipart/form-data` bodies.
//!
//! Hosts that receive uploads parse the body once with
//! [`MultipartForm::parse`] and hand the result to
//! [`ExtractionContextBuilder::multipart`](crate::ExtractionContextBuilder::multipart).
//! Text parts become body fields, parts with a file name become
//! [`UploadedFile`]s.

use bytes::Bytes;
use http::{header, HeaderMap};
use paramgate_core::UploadedFile;
use std::io;

use crate::{ExtractionError, ExtractionSource};

/// Default maximum body size for multipart requests (50 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum size for a single part (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Limits applied while parsing a multipart body.
#[derive(Debug, Clone)]
pub struct MultipartConfig {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size of a single part in bytes.
    pub max_field_size: usize,
    /// Maximum number of parts.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: 100,
        }
    }
}

impl MultipartConfig {
    /// Creates a config with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Sets the maximum part size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Sets the maximum number of parts.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// A fully parsed multipart body.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Parses a buffered multipart body.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is missing or lacks a boundary,
    /// if a limit in `config` is exceeded, or if the body is malformed.
    pub async fn parse(
        headers: &HeaderMap,
        body: Bytes,
        config: MultipartConfig,
    ) -> Result<Self, ExtractionError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .ok_or_else(|| ExtractionError::missing_content_type("multipart/form-data"))?
            .to_str()
            .map_err(|_| {
                ExtractionError::invalid_content_type("invalid UTF-8 in Content-Type header")
            })?;

        let boundary = multer::parse_boundary(content_type).map_err(|_| {
            ExtractionError::invalid_content_type(
                "missing or invalid boundary in multipart Content-Type",
            )
        })?;

        if body.len() > config.max_body_size {
            return Err(ExtractionError::too_large(
                config.max_body_size,
                body.len(),
            ));
        }

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = Self::default();
        let mut count = 0;

        while let Some(field) = multipart.next_field().await.map_err(parse_error)? {
            count += 1;
            if count > config.max_fields {
                return Err(ExtractionError::TooManyParts { limit: config.max_fields });
            }

            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(String::from);
            let content_type = field.content_type().map(ToString::to_string);

            let data = field.bytes().await.map_err(parse_error)?;
            if data.len() > config.max_field_size {
                return Err(ExtractionError::too_large(
                    config.max_field_size,
                    data.len(),
                ));
            }

            match file_name {
                Some(file_name) => {
                    let mut file = UploadedFile::new(file_name, data);
                    if let Some(content_type) = content_type {
                        file = file.with_content_type(content_type);
                    }
                    form.files.push((name, file));
                }
                None => {
                    let text = String::from_utf8(data.to_vec()).map_err(|e| {
                        ExtractionError::malformed(
                            ExtractionSource::Body,
                            format!("field '{name}' is not valid UTF-8: {e}"),
                        )
                    })?;
                    form.fields.push((name, text));
                }
            }
        }

        Ok(form)
    }

    /// Parses with default limits.
    ///
    /// # Errors
    ///
    /// See [`MultipartForm::parse`].
    pub async fn parse_default(headers: &HeaderMap, body: Bytes) -> Result<Self, ExtractionError> {
        Self::parse(headers, body, MultipartConfig::default()).await
    }

    /// Returns the text parts in body order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the file parts in body order, keyed by form field name.
    #[must_use]
    pub fn files(&self) -> &[(String, UploadedFile)] {
        &self.files
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, String)>, Vec<(String, UploadedFile)>) {
        (self.fields, self.files)
    }
}

fn parse_error(e: multer::Error) -> ExtractionError {
    ExtractionError::malformed(
        ExtractionSource::Body,
        format!("multipart parse error: {e}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const BOUNDARY: &str = "X-PARAMGATE-BOUNDARY";

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=X-PARAMGATE-BOUNDARY"),
        );
        headers
    }

    fn body() -> Bytes {
        Bytes::from(format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             holiday\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"beach.PNG\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{BOUNDARY}--\r\n"
        ))
    }

    #[test]
    fn test_config_builder() {
        let config = MultipartConfig::new()
            .max_body_size(1024)
            .max_field_size(512)
            .max_fields(5);

        assert_eq!(config.max_body_size, 1024);
        assert_eq!(config.max_field_size, 512);
        assert_eq!(config.max_fields, 5);
    }

    #[tokio::test]
    async fn test_parse_fields_and_files() {
        let form = MultipartForm::parse_default(&headers(), body())
            .await
            .expect("valid multipart");

        assert_eq!(form.fields(), &[("title".to_string(), "holiday".to_string())]);
        assert_eq!(form.files().len(), 1);

        let (name, file) = &form.files()[0];
        assert_eq!(name, "photo");
        assert_eq!(file.name(), "beach.PNG");
        assert_eq!(file.extension(), "png");
        assert_eq!(file.content_type(), Some("image/png"));
        assert_eq!(file.data().as_ref(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = MultipartForm::parse_default(&HeaderMap::new(), body())
            .await
            .expect_err("no content type");
        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));

        let err = MultipartForm::parse_default(&headers, body())
            .await
            .expect_err("no boundary");
        assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let config = MultipartConfig::new().max_body_size(10);
        let err = MultipartForm::parse(&headers(), body(), config)
            .await
            .expect_err("too large");
        assert_eq!(err.status_code(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_too_many_parts() {
        let config = MultipartConfig::new().max_fields(1);
        let err = MultipartForm::parse(&headers(), body(), config)
            .await
            .expect_err("too many");
        assert_eq!(err.error_code(), "TOO_MANY_PARTS");
    }
}
