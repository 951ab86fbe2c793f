//! WAV encoding and decoding for speech API payloads.

use crate::audio::recorder::AudioSource;
use crate::defaults::SAMPLE_RATE;
use crate::error::{FormvaniError, Result};
use std::io::Cursor;
use std::path::Path;

/// Encode 16kHz mono i16 samples as an in-memory WAV file, ready to be
/// uploaded to the speech API.
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| FormvaniError::AudioCapture {
                message: format!("Failed to create WAV writer: {}", e),
            })?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| FormvaniError::AudioCapture {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }
        writer.finalize().map_err(|e| FormvaniError::AudioCapture {
            message: format!("Failed to finalize WAV data: {}", e),
        })?;
    }
    Ok(cursor.into_inner())
}

/// Audio source that replays a WAV file.
///
/// Accepts arbitrary sample rates and channel counts, converting to
/// 16kHz mono. Used for piped input and for exercising the flow without
/// a microphone.
pub struct WavAudioSource {
    samples: Vec<i16>,
    position: usize,
    chunk_size: usize,
}

impl WavAudioSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path).map_err(|e| FormvaniError::AudioCapture {
            message: format!("Failed to open WAV file {}: {}", path.display(), e),
        })?;

        let spec = reader.spec();
        let raw: Vec<i16> = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FormvaniError::AudioCapture {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        let mono: Vec<i16> = if spec.channels == 2 {
            raw.chunks_exact(2)
                .map(|frame| ((frame[0] as i32 + frame[1] as i32) / 2) as i16)
                .collect()
        } else {
            raw
        };

        let samples = if spec.sample_rate != SAMPLE_RATE {
            resample(&mono, spec.sample_rate, SAMPLE_RATE)
        } else {
            mono
        };

        Ok(Self {
            samples,
            position: 0,
            // 100ms chunks at 16kHz
            chunk_size: 1600,
        })
    }

    /// Consume the source and return all samples.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl AudioSource for WavAudioSource {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.position >= self.samples.len() {
            return Ok(Vec::new());
        }
        let end = (self.position + self.chunk_size).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;
        Ok(chunk)
    }
}

/// Linear-interpolation resampler. Adequate for speech payloads; the
/// hosted API is tolerant of mild aliasing.
pub fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Vec<i16> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let target_len = (samples.len() as f64 / ratio) as usize;
    let mut out = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = pos - idx as f64;
        let a = samples[idx] as f64;
        let b = samples[(idx + 1).min(samples.len() - 1)] as f64;
        out.push((a + (b - a) * frac) as i16);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wav_produces_riff_header() {
        let wav = encode_wav(&[0i16; 1600]).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn test_encode_wav_empty_samples() {
        let wav = encode_wav(&[]).unwrap();
        // Header only, still a valid WAV container.
        assert_eq!(&wav[0..4], b"RIFF");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let samples: Vec<i16> = (0..1600).map(|i| (i % 100) as i16).collect();
        let wav = encode_wav(&samples).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        let back: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(back, samples);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![1i16, 2, 3, 4];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn test_resample_halves_length_for_double_rate() {
        let samples = vec![0i16; 32000];
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 16000);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample(&[], 44100, 16000).is_empty());
    }

    #[test]
    fn test_wav_source_chunks_and_exhausts() {
        let samples: Vec<i16> = (0..3200).map(|i| i as i16).collect();
        let wav = encode_wav(&samples).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.wav");
        std::fs::write(&path, wav).unwrap();

        let mut source = WavAudioSource::from_path(&path).unwrap();
        source.start().unwrap();

        let first = source.read_samples().unwrap();
        assert_eq!(first.len(), 1600);
        let second = source.read_samples().unwrap();
        assert_eq!(second.len(), 1600);
        let third = source.read_samples().unwrap();
        assert!(third.is_empty());
    }
}
