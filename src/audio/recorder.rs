//! Audio source abstraction.

use crate::error::{FormvaniError, Result};

/// Trait for audio input devices.
///
/// Allows swapping implementations: real microphone, WAV file, or mock.
pub trait AudioSource: Send + Sync {
    /// Start capturing audio.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio.
    fn stop(&mut self) -> Result<()>;

    /// Drain captured samples (16-bit PCM, 16kHz mono) since the last read.
    fn read_samples(&mut self) -> Result<Vec<i16>>;
}

/// Mock audio source for tests.
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    samples: Vec<i16>,
    fail_start: bool,
    permission_denied: bool,
}

impl MockAudioSource {
    pub fn new() -> Self {
        Self {
            is_started: false,
            samples: vec![0i16; 160],
            fail_start: false,
            permission_denied: false,
        }
    }

    /// Configure the samples every read returns.
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the mock to fail on start with a generic capture error.
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Configure the mock to fail on start with a permission error,
    /// simulating a denied microphone.
    pub fn with_permission_denied(mut self) -> Self {
        self.permission_denied = true;
        self
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.permission_denied {
            return Err(FormvaniError::MicrophonePermissionDenied {
                message: "mock microphone denied".to_string(),
            });
        }
        if self.fail_start {
            return Err(FormvaniError::AudioCapture {
                message: "mock capture failure".to_string(),
            });
        }
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        Ok(self.samples.clone())
    }
}
