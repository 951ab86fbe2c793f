//! Clients for the external speech, vision, translation, and TTS APIs.
//!
//! Each service sits behind a trait so the flow controller and tests can
//! swap in mocks; the HTTP implementations share one retrying client.

pub mod http;
pub mod speech;
pub mod translate;
pub mod tts;
pub mod vision;

pub use http::RetryingClient;
pub use speech::{SpeechToText, Transcript};
pub use translate::Translator;
pub use tts::Synthesizer;
pub use vision::FormParser;
