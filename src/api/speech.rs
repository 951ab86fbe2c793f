//! Speech-to-text client.

use crate::api::http::RetryingClient;
use crate::defaults::UNKNOWN_LANGUAGE_HINT;
use crate::error::{FormvaniError, Result};
use crate::lang::Language;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Result of transcribing one voice recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Language the API claims it heard. Treated as advisory only: for
    /// short clips the detection is unreliable (see the language
    /// sub-flow, which ignores it by design).
    pub detected_language: Option<Language>,
}

/// Trait for speech-to-text transcription.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a WAV recording. `language_hint` is `None` when the
    /// spoken language is not yet known; the wire format sends
    /// `"unknown"` in that case.
    async fn transcribe(&self, wav: &[u8], language_hint: Option<Language>) -> Result<Transcript>;
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcript: String,
    #[serde(default)]
    language: Option<String>,
}

/// HTTP client for the hosted speech API.
pub struct HttpSpeechClient {
    http: RetryingClient,
    base_url: String,
    api_key: String,
}

impl HttpSpeechClient {
    pub fn new(http: RetryingClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechClient {
    async fn transcribe(&self, wav: &[u8], language_hint: Option<Language>) -> Result<Transcript> {
        let url = format!("{}/v1/transcribe", self.base_url);
        let hint = language_hint
            .map(|l| l.code().to_string())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE_HINT.to_string());

        let wav = wav.to_vec();
        let response = self
            .http
            .send_with_retry("speech", move |client| {
                let part = reqwest::multipart::Part::bytes(wav.clone())
                    .file_name("query.wav")
                    .mime_str("audio/wav")
                    // Hardcoded MIME type, always parses.
                    .unwrap_or_else(|_| reqwest::multipart::Part::bytes(wav.clone()));
                let form = reqwest::multipart::Form::new()
                    .part("audio", part)
                    .text("language", hint.clone());
                client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .multipart(form)
            })
            .await?;

        let body: TranscribeResponse =
            response
                .json()
                .await
                .map_err(|e| FormvaniError::ApiMalformed {
                    service: "speech".to_string(),
                    message: e.to_string(),
                })?;

        Ok(Transcript {
            text: body.transcript,
            detected_language: body.language.as_deref().and_then(Language::from_code),
        })
    }
}

/// Mock transcriber for tests: returns queued transcripts in order, then
/// repeats the last one.
pub struct MockSpeechClient {
    queue: Mutex<VecDeque<Transcript>>,
    last: Mutex<Transcript>,
    should_fail: bool,
    /// Language hints seen, for asserting what the flow sent.
    hints: Mutex<Vec<Option<Language>>>,
}

impl MockSpeechClient {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            last: Mutex::new(Transcript {
                text: "mock transcript".to_string(),
                detected_language: None,
            }),
            should_fail: false,
            hints: Mutex::new(Vec::new()),
        }
    }

    /// Queue a transcript to return.
    pub fn with_transcript(self, text: &str, detected: Option<Language>) -> Self {
        let transcript = Transcript {
            text: text.to_string(),
            detected_language: detected,
        };
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(transcript);
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Language hints passed to `transcribe`, in call order.
    pub fn seen_hints(&self) -> Vec<Option<Language>> {
        self.hints.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for MockSpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechToText for MockSpeechClient {
    async fn transcribe(&self, _wav: &[u8], language_hint: Option<Language>) -> Result<Transcript> {
        self.hints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(language_hint);

        if self.should_fail {
            return Err(FormvaniError::Api {
                service: "speech".to_string(),
                message: "mock transcription failure".to_string(),
            });
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        match queue.pop_front() {
            Some(t) => {
                *self.last.lock().unwrap_or_else(|e| e.into_inner()) = t.clone();
                Ok(t)
            }
            None => Ok(self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_queued_transcripts_in_order() {
        let mock = MockSpeechClient::new()
            .with_transcript("first", Some(Language::Hindi))
            .with_transcript("second", None);

        let a = mock.transcribe(&[], None).await.unwrap();
        let b = mock.transcribe(&[], None).await.unwrap();
        assert_eq!(a.text, "first");
        assert_eq!(a.detected_language, Some(Language::Hindi));
        assert_eq!(b.text, "second");
    }

    #[tokio::test]
    async fn test_mock_repeats_last_transcript_when_exhausted() {
        let mock = MockSpeechClient::new().with_transcript("only", None);
        mock.transcribe(&[], None).await.unwrap();
        let again = mock.transcribe(&[], None).await.unwrap();
        assert_eq!(again.text, "only");
    }

    #[tokio::test]
    async fn test_mock_records_hints() {
        let mock = MockSpeechClient::new();
        mock.transcribe(&[], Some(Language::Tamil)).await.unwrap();
        mock.transcribe(&[], None).await.unwrap();
        assert_eq!(mock.seen_hints(), vec![Some(Language::Tamil), None]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockSpeechClient::new().with_failure();
        assert!(mock.transcribe(&[], None).await.is_err());
    }

    #[test]
    fn test_response_parses_without_language() {
        let body: TranscribeResponse =
            serde_json::from_str(r#"{"transcript": "naam kya hai"}"#).unwrap();
        assert_eq!(body.transcript, "naam kya hai");
        assert!(body.language.is_none());
    }

    #[test]
    fn test_response_parses_with_language() {
        let body: TranscribeResponse =
            serde_json::from_str(r#"{"transcript": "hello", "language": "en"}"#).unwrap();
        assert_eq!(body.language.as_deref(), Some("en"));
    }
}
