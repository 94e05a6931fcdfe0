//! Quantization and WAV export
//!
//! Converts finished buffers to 16-bit PCM and writes mono WAV files.

#[cfg(feature = "wav-export")]
use std::path::Path;

use crate::SampleBuffer;
#[cfg(feature = "wav-export")]
use crate::{Result, SynthError};

/// Quantize one sample to 16-bit PCM
///
/// Clamps to -32768.0 to 32767.0, then truncates toward zero.
pub fn quantize(sample: f32) -> i16 {
    // `as` truncates toward zero and maps NaN to 0
    sample.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Convert a finished buffer to PCM i16
pub fn to_pcm_i16(buffer: &SampleBuffer) -> Vec<i16> {
    buffer.iter().map(|&s| quantize(s)).collect()
}

/// Write PCM samples to a mono 16-bit WAV file
///
/// Requires the `wav-export` feature. A partially written file is removed if
/// any step fails, so a failed sound never leaves a corrupt file behind.
///
/// # Arguments
/// * `samples` - PCM i16 samples
/// * `sample_rate` - Sample rate in Hz
/// * `path` - Output file path
#[cfg(feature = "wav-export")]
pub fn write_wav(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    if sample_rate == 0 {
        return Err(SynthError::InvalidSampleRate(sample_rate));
    }

    let result = write_pcm(samples, sample_rate, path);
    if result.is_err() && path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove partial file {:?}: {}", path, e);
        }
    }
    result
}

#[cfg(feature = "wav-export")]
fn write_pcm(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    use hound::{SampleFormat, WavSpec, WavWriter};

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Quantize a finished buffer and write it as WAV (convenience function)
///
/// Requires the `wav-export` feature.
#[cfg(feature = "wav-export")]
pub fn write_sound(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let pcm = to_pcm_i16(buffer);
    write_wav(&pcm, buffer.sample_rate, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    #[test]
    fn test_quantize_truncates_toward_zero() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.9), 1);
        assert_eq!(quantize(-1.9), -1);
        assert_eq!(quantize(12345.7), 12345);
        assert_eq!(quantize(-12345.7), -12345);
    }

    #[test]
    fn test_quantize_clamp() {
        assert_eq!(quantize(40000.0), i16::MAX);
        assert_eq!(quantize(-40000.0), i16::MIN);
        assert_eq!(quantize(32767.0), 32767);
        assert_eq!(quantize(-32768.0), -32768);
        assert_eq!(quantize(f32::INFINITY), i16::MAX);
        assert_eq!(quantize(f32::NEG_INFINITY), i16::MIN);
    }

    #[test]
    fn test_to_pcm_i16() {
        let buf = SampleBuffer::from_samples(SAMPLE_RATE, vec![0.0, 100.5, -100.5, 1e9]);
        assert_eq!(to_pcm_i16(&buf), vec![0, 100, -100, i16::MAX]);
    }

    #[cfg(feature = "wav-export")]
    #[test]
    fn test_write_wav() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];

        write_wav(&samples, SAMPLE_RATE, &path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[cfg(feature = "wav-export")]
    #[test]
    fn test_write_wav_missing_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("tone.wav");
        assert!(write_wav(&[0, 1, 2], SAMPLE_RATE, &path).is_err());
        assert!(!path.exists());
    }
}
