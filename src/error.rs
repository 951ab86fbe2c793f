//! Error types for formvani.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormvaniError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Microphone access denied: {message}")]
    MicrophonePermissionDenied { message: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // External API errors
    #[error("{service} request failed: {message}")]
    Api { service: String, message: String },

    #[error("{service} returned status {status}")]
    ApiStatus { service: String, status: u16 },

    #[error("{service} returned a malformed response: {message}")]
    ApiMalformed { service: String, message: String },

    // Input validation errors
    #[error("No file selected")]
    NoFileSelected,

    #[error("No fields could be extracted from {filename}")]
    NoFieldsExtracted { filename: String },

    #[error("Unsupported language: {name}")]
    UnsupportedLanguage { name: String },

    // Playback errors
    #[error("Audio player not found: {tool}")]
    PlayerNotFound { tool: String },

    #[error("Audio playback failed: {message}")]
    PlaybackFailed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, FormvaniError>;

impl FormvaniError {
    /// Build an API error from a reqwest failure, tagged with the service name.
    pub fn api(service: &str, err: reqwest::Error) -> Self {
        FormvaniError::Api {
            service: service.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = FormvaniError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_audio_device_not_found_display() {
        let error = FormvaniError::AudioDeviceNotFound {
            device: "default".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: default");
    }

    #[test]
    fn test_microphone_permission_denied_display() {
        let error = FormvaniError::MicrophonePermissionDenied {
            message: "portal denied access".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Microphone access denied: portal denied access"
        );
    }

    #[test]
    fn test_api_status_display() {
        let error = FormvaniError::ApiStatus {
            service: "translation".to_string(),
            status: 503,
        };
        assert_eq!(error.to_string(), "translation returned status 503");
    }

    #[test]
    fn test_api_malformed_display() {
        let error = FormvaniError::ApiMalformed {
            service: "speech".to_string(),
            message: "missing transcript field".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "speech returned a malformed response: missing transcript field"
        );
    }

    #[test]
    fn test_no_fields_extracted_display() {
        let error = FormvaniError::NoFieldsExtracted {
            filename: "form.pdf".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No fields could be extracted from form.pdf"
        );
    }

    #[test]
    fn test_unsupported_language_display() {
        let error = FormvaniError::UnsupportedLanguage {
            name: "klingon".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported language: klingon");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: FormvaniError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: FormvaniError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FormvaniError>();
        assert_sync::<FormvaniError>();
    }
}
