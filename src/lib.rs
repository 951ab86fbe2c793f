//! formvani - Voice-first form assistant
//!
//! Explains the fields of an uploaded form in the user's spoken
//! language, using hosted speech, vision, translation, and TTS APIs.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod flow;
pub mod form;
pub mod lang;
pub mod matcher;
pub mod output;
pub mod playback;
pub mod recording;
pub mod session;

// Core traits (capture → transcribe → answer → speak)
pub use api::{FormParser, SpeechToText, Synthesizer, Translator};
pub use audio::recorder::AudioSource;
pub use playback::{CommandExecutor, SystemCommandExecutor};

// Flow
pub use flow::FlowController;
pub use matcher::{QueryMatch, match_query};
pub use session::{Session, Step};

// Error handling
pub use error::{FormvaniError, Result};

// Config
pub use config::Config;

// Language support
pub use lang::{ALL_LANGUAGES, Language};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(ver.contains('+'), "got: {}", ver);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
