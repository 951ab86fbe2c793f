//! Supported languages and their API codes.
//!
//! The set is a closed enum rather than a free-form string map: every
//! supported language is listed here, and unknown names are rejected
//! explicitly instead of silently falling through to English.

use crate::error::{FormvaniError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the assistant can speak and translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Bengali,
    Tamil,
    Telugu,
    Marathi,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
}

/// All supported languages, in menu display order.
pub const ALL_LANGUAGES: &[Language] = &[
    Language::English,
    Language::Hindi,
    Language::Bengali,
    Language::Tamil,
    Language::Telugu,
    Language::Marathi,
    Language::Gujarati,
    Language::Kannada,
    Language::Malayalam,
    Language::Punjabi,
];

impl Language {
    /// ISO 639-1 code used by the speech, translation, and TTS APIs.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
        }
    }

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Gujarati => "Gujarati",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
        }
    }

    /// Native-script display name, shown in the language menu.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
            Language::Bengali => "বাংলা",
            Language::Tamil => "தமிழ்",
            Language::Telugu => "తెలుగు",
            Language::Marathi => "मराठी",
            Language::Gujarati => "ગુજરાતી",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Malayalam => "മലയാളം",
            Language::Punjabi => "ਪੰਜਾਬੀ",
        }
    }

    /// Resolve a language from an ISO code.
    pub fn from_code(code: &str) -> Option<Language> {
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|l| l.code() == code.trim().to_lowercase())
    }

    /// Resolve a language from user input: accepts an English name
    /// (case-insensitive) or an ISO code. Unknown input is an error,
    /// never a silent default.
    pub fn parse(input: &str) -> Result<Language> {
        let trimmed = input.trim();
        if let Some(lang) = Self::from_code(trimmed) {
            return Ok(lang);
        }
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|l| l.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FormvaniError::UnsupportedLanguage {
                name: trimmed.to_string(),
            })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
