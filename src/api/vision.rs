//! Vision/parsing API client: turns an uploaded form into labeled fields.

use crate::api::http::RetryingClient;
use crate::error::{FormvaniError, Result};
use crate::form::field::FormField;
use async_trait::async_trait;
use serde::Deserialize;

/// Trait for form-parsing services.
#[async_trait]
pub trait FormParser: Send + Sync {
    /// Parse an uploaded image or PDF into labeled fields. An empty
    /// result is valid and means the service found nothing.
    async fn parse(&self, file: &[u8], filename: &str) -> Result<Vec<FormField>>;
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    fields: Vec<ParsedField>,
}

#[derive(Debug, Deserialize)]
struct ParsedField {
    label: String,
    #[serde(default)]
    description: String,
}

/// HTTP client for the hosted vision/parsing API.
pub struct HttpFormParser {
    http: RetryingClient,
    base_url: String,
    api_key: String,
}

impl HttpFormParser {
    pub fn new(http: RetryingClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// Guess a MIME type from the upload's filename.
fn mime_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl FormParser for HttpFormParser {
    async fn parse(&self, file: &[u8], filename: &str) -> Result<Vec<FormField>> {
        let url = format!("{}/v1/parse", self.base_url);
        let file = file.to_vec();
        let filename = filename.to_string();
        let mime = mime_for(&filename);

        let response = self
            .http
            .send_with_retry("form parsing", move |client| {
                let part = reqwest::multipart::Part::bytes(file.clone())
                    .file_name(filename.clone())
                    .mime_str(mime)
                    .unwrap_or_else(|_| reqwest::multipart::Part::bytes(file.clone()));
                let form = reqwest::multipart::Form::new().part("file", part);
                client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .multipart(form)
            })
            .await?;

        let body: ParseResponse = response
            .json()
            .await
            .map_err(|e| FormvaniError::ApiMalformed {
                service: "form parsing".to_string(),
                message: e.to_string(),
            })?;

        Ok(body
            .fields
            .into_iter()
            .map(|f| FormField::new(&f.label, &f.description))
            .collect())
    }
}

/// Mock parser for tests.
pub struct MockFormParser {
    fields: Vec<FormField>,
    should_fail: bool,
}

impl MockFormParser {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            should_fail: false,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FormField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockFormParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormParser for MockFormParser {
    async fn parse(&self, _file: &[u8], _filename: &str) -> Result<Vec<FormField>> {
        if self.should_fail {
            return Err(FormvaniError::Api {
                service: "form parsing".to_string(),
                message: "mock parse failure".to_string(),
            });
        }
        Ok(self.fields.clone())
    }
}
