//! Recording session management for voice capture.
//!
//! Accumulates microphone samples either for a fixed window (the spoken
//! language-selection capture) or until a stop flag is raised (voice
//! queries, stopped by the user).

use crate::audio::recorder::AudioSource;
use crate::error::Result;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while draining the audio source.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Records complete audio segments from an AudioSource.
pub struct RecordingSession<A: AudioSource> {
    audio_source: A,
    show_levels: bool,
}

impl<A: AudioSource> RecordingSession<A> {
    pub fn new(audio_source: A) -> Self {
        Self {
            audio_source,
            show_levels: false,
        }
    }

    /// Enable the level meter during recording.
    pub fn with_level_display(mut self, show: bool) -> Self {
        self.show_levels = show;
        self
    }

    /// Record for a fixed wall-clock window.
    pub fn record_for(&mut self, window: Duration) -> Result<Vec<i16>> {
        let deadline = Instant::now() + window;
        self.record_while(|| Instant::now() < deadline)
    }

    /// Record until `stop` is set (e.g. by the input thread when the
    /// user presses Enter).
    pub fn record_until_stopped(&mut self, stop: Arc<AtomicBool>) -> Result<Vec<i16>> {
        self.record_while(|| !stop.load(Ordering::Relaxed))
    }

    fn record_while<F: Fn() -> bool>(&mut self, keep_going: F) -> Result<Vec<i16>> {
        let mut accumulated = Vec::new();

        self.audio_source.start()?;

        while keep_going() {
            let samples = self.audio_source.read_samples()?;
            if samples.is_empty() {
                thread::sleep(POLL_INTERVAL);
                continue;
            }

            if self.show_levels {
                display_level(rms(&samples));
            }
            accumulated.extend_from_slice(&samples);
        }

        // Drain whatever arrived between the last read and the stop.
        let tail = self.audio_source.read_samples()?;
        accumulated.extend_from_slice(&tail);

        self.audio_source.stop()?;

        if self.show_levels {
            eprint!("\r{:40}\r", "");
            let _ = io::stderr().flush();
        }

        Ok(accumulated)
    }
}

/// Root-mean-square level of a sample block, normalized to 0.0..1.0.
fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / i16::MAX as f64;
            v * v
        })
        .sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Draw a one-line level meter on stderr.
fn display_level(level: f32) {
    let bar_width = 20;
    let filled = ((level / 0.1).min(1.0) * bar_width as f32) as usize;

    let mut bar = String::with_capacity(bar_width);
    for i in 0..bar_width {
        bar.push(if i < filled { '█' } else { '░' });
    }

    eprint!("\r[{}] recording ", bar);
    let _ = io::stderr().flush();
}
