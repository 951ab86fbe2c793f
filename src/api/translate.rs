//! Translation client with batched field translation.

use crate::api::http::RetryingClient;
use crate::defaults::TRANSLATION_BATCH_SIZE;
use crate::error::{FormvaniError, Result};
use crate::form::field::FormField;
use crate::lang::Language;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;

/// Trait for text translation services.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// HTTP client for the hosted translation API.
pub struct HttpTranslator {
    http: RetryingClient,
    base_url: String,
    api_key: String,
}

impl HttpTranslator {
    pub fn new(http: RetryingClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let url = format!("{}/v1/translate", self.base_url);
        let payload = json!({
            "q": text,
            "source": source.code(),
            "target": target.code(),
        });

        let response = self
            .http
            .send_with_retry("translation", move |client| {
                client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&payload)
            })
            .await?;

        let body: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| FormvaniError::ApiMalformed {
                    service: "translation".to_string(),
                    message: e.to_string(),
                })?;

        Ok(body.translated_text)
    }
}

/// Outcome of translating a batch of field explanations.
#[derive(Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub translated: usize,
    pub failed: usize,
}

/// Translate every field's explanation into `target`, in place.
///
/// Requests go out in fixed-size batches so at most
/// [`TRANSLATION_BATCH_SIZE`] calls are in flight at once. A failed
/// translation leaves that field's `translated_explanation` unset (the
/// English text is shown instead); failures never abort the batch.
///
/// English targets are a no-op: the explanations are already English.
pub async fn translate_fields(
    translator: &dyn Translator,
    fields: &mut [FormField],
    target: Language,
) -> BatchOutcome {
    if target == Language::English {
        return BatchOutcome::default();
    }

    let mut outcome = BatchOutcome::default();

    for chunk_start in (0..fields.len()).step_by(TRANSLATION_BATCH_SIZE) {
        let chunk_end = (chunk_start + TRANSLATION_BATCH_SIZE).min(fields.len());

        let futures = fields[chunk_start..chunk_end]
            .iter()
            .map(|f| translator.translate(&f.explanation, Language::English, target));
        let results = join_all(futures).await;

        for (field, result) in fields[chunk_start..chunk_end].iter_mut().zip(results) {
            match result {
                Ok(text) => {
                    field.translated_explanation = Some(text);
                    outcome.translated += 1;
                }
                Err(_) => {
                    field.translated_explanation = None;
                    outcome.failed += 1;
                }
            }
        }
    }

    outcome
}

/// Mock translator: wraps text in a language-tagged marker, or fails.
pub struct MockTranslator {
    should_fail: bool,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source: Language, target: Language) -> Result<String> {
        if self.should_fail {
            return Err(FormvaniError::Api {
                service: "translation".to_string(),
                message: "mock translation failure".to_string(),
            });
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(n: usize) -> Vec<FormField> {
        (0..n)
            .map(|i| FormField::new(&format!("Field {}", i), &format!("Explanation {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_translate_fields_sets_translations() {
        let translator = MockTranslator::new();
        let mut fs = fields(3);

        let outcome = translate_fields(&translator, &mut fs, Language::Hindi).await;

        assert_eq!(outcome, BatchOutcome { translated: 3, failed: 0 });
        assert_eq!(
            fs[0].translated_explanation.as_deref(),
            Some("[hi] Explanation 0")
        );
    }

    #[tokio::test]
    async fn test_translate_fields_handles_more_than_one_batch() {
        let translator = MockTranslator::new();
        let mut fs = fields(TRANSLATION_BATCH_SIZE * 2 + 1);

        let outcome = translate_fields(&translator, &mut fs, Language::Tamil).await;

        assert_eq!(outcome.translated, TRANSLATION_BATCH_SIZE * 2 + 1);
        assert!(fs.iter().all(|f| f.translated_explanation.is_some()));
    }

    #[tokio::test]
    async fn test_translate_fields_failure_leaves_english() {
        let translator = MockTranslator::new().with_failure();
        let mut fs = fields(2);

        let outcome = translate_fields(&translator, &mut fs, Language::Hindi).await;

        assert_eq!(outcome, BatchOutcome { translated: 0, failed: 2 });
        assert!(fs.iter().all(|f| f.translated_explanation.is_none()));
        // Display still works: falls back to English.
        assert_eq!(fs[0].display_explanation(), "Explanation 0");
    }

    #[tokio::test]
    async fn test_english_target_is_noop() {
        let translator = MockTranslator::new();
        let mut fs = fields(2);

        let outcome = translate_fields(&translator, &mut fs, Language::English).await;

        assert_eq!(outcome, BatchOutcome::default());
        assert!(fs.iter().all(|f| f.translated_explanation.is_none()));
    }

    #[tokio::test]
    async fn test_empty_field_list() {
        let translator = MockTranslator::new();
        let mut fs: Vec<FormField> = Vec::new();
        let outcome = translate_fields(&translator, &mut fs, Language::Hindi).await;
        assert_eq!(outcome, BatchOutcome::default());
    }

    #[test]
    fn test_response_deserializes() {
        let body: TranslateResponse =
            serde_json::from_str(r#"{"translatedText": "नमस्ते"}"#).unwrap();
        assert_eq!(body.translated_text, "नमस्ते");
    }
}
