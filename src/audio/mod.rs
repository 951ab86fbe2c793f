//! Audio capture and WAV handling.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod recorder;
pub mod wav;
