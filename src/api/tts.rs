//! Text-to-speech client.

use crate::api::http::RetryingClient;
use crate::error::{FormvaniError, Result};
use crate::lang::Language;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;

/// Trait for speech synthesis services.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize spoken audio for `text` in `language`. Returns encoded
    /// audio bytes (MP3 from the hosted API) ready for playback.
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    /// Base64-encoded audio payload.
    audio: String,
}

/// HTTP client for the hosted TTS API.
pub struct HttpSynthesizer {
    http: RetryingClient,
    base_url: String,
    api_key: String,
}

impl HttpSynthesizer {
    pub fn new(http: RetryingClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let url = format!("{}/v1/synthesize", self.base_url);
        let payload = json!({
            "text": text,
            "language": language.code(),
        });

        let response = self
            .http
            .send_with_retry("speech synthesis", move |client| {
                client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&payload)
            })
            .await?;

        let body: SynthesizeResponse =
            response
                .json()
                .await
                .map_err(|e| FormvaniError::ApiMalformed {
                    service: "speech synthesis".to_string(),
                    message: e.to_string(),
                })?;

        BASE64
            .decode(body.audio.as_bytes())
            .map_err(|e| FormvaniError::ApiMalformed {
                service: "speech synthesis".to_string(),
                message: format!("invalid base64 audio: {}", e),
            })
    }
}

/// Mock synthesizer: returns fixed bytes, or fails.
pub struct MockSynthesizer {
    audio: Vec<u8>,
    should_fail: bool,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            audio: vec![0x4d, 0x50, 0x33], // arbitrary marker bytes
            should_fail: false,
        }
    }

    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<Vec<u8>> {
        if self.should_fail {
            return Err(FormvaniError::Api {
                service: "speech synthesis".to_string(),
                message: "mock synthesis failure".to_string(),
            });
        }
        Ok(self.audio.clone())
    }
}
