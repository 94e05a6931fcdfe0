//! Procedural drum and synth-note sample synthesis
//!
//! This crate renders short one-shot samples (kick, snare, hi-hats, clap, toms,
//! rimshot, shaker, cowbell and FM-shaped melodic notes) into mono 16-bit PCM.
//!
//! Every sound flows one way through the same stages:
//! generator -> envelope -> quantize -> encode.
//!
//! # Example
//! ```no_run
//! use boom_synth::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
//!
//! // Synthesize a kick and shape it with its envelope
//! let kick = synthesize(&InstrumentSpec::kick(), &mut rng)?;
//!
//! // Quantize for the container
//! let pcm = to_pcm_i16(&kick);
//!
//! // Export to WAV (requires the wav-export feature)
//! #[cfg(feature = "wav-export")]
//! write_wav(&pcm, SAMPLE_RATE, std::path::Path::new("kick.wav"))?;
//! # Ok::<(), boom_synth::SynthError>(())
//! ```

mod envelope;
mod error;
mod export;
mod generators;
mod instrument;
mod oscillators;
pub mod pack;
mod pipeline;

/// Output sample rate (44.1kHz)
pub const SAMPLE_RATE: u32 = 44100;

/// Largest positive 16-bit amplitude; raw generators scale to this ceiling
pub const MAX_AMP: f32 = 32767.0;

/// Length of the deadline fade at the end of every sound, in samples
pub const FADE_OUT_SAMPLES: usize = 100;

/// Longest sound the engine will render, in seconds
pub const MAX_DURATION_SECS: f32 = 300.0;

// Envelope
pub use envelope::EnvelopeSpec;

// Errors
pub use error::{Result, SynthError};

// Oscillator primitives
pub use oscillators::{
    FrequencySweep, WaveShape, fm_phase, noise_with_gain, shape_sample, swept_sine, white_noise,
};

// Instruments
pub use generators::{NOTE_HEADROOM, RICHNESS_TO_INDEX};
pub use instrument::{
    ClapParams, InstrumentSpec, NoiseParams, NoteParams, RimshotParams, ShakerParams, SnareParams,
    SweepParams, ToneParams, Voice,
};

// Pipeline
pub use pipeline::{
    CatalogueEntry, RenderOptions, RenderedSound, catalogue, render_catalogue, synthesize,
};

// Quantizer and export
pub use export::{quantize, to_pcm_i16};

#[cfg(feature = "wav-export")]
pub use export::{write_sound, write_wav};

/// Sample buffer in the integer amplitude domain (roughly -32767.0 to 32767.0)
///
/// Index order is time. Each pipeline stage consumes the buffer it is given and
/// returns a new one, so no two stages ever alias the same samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Amplitude values, one per time step
    pub samples: Vec<f32>,
}

impl SampleBuffer {
    /// Create a new empty buffer
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    /// Create a buffer from samples
    pub fn from_samples(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |a, &s| a.max(s.abs()))
    }

    /// Iterate over samples
    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.samples.iter()
    }
}

/// Number of samples spanned by `duration` seconds at `sample_rate`
///
/// Rejects a zero sample rate and negative, non-finite or overlong (see
/// [`MAX_DURATION_SECS`]) durations before any buffer is allocated. A duration
/// too short to produce one sample is an error, so no generator ever returns an
/// empty buffer.
pub fn sample_count(duration: f32, sample_rate: u32) -> Result<usize> {
    if sample_rate == 0 {
        return Err(SynthError::InvalidSampleRate(sample_rate));
    }
    if !(0.0..=MAX_DURATION_SECS).contains(&duration) {
        return Err(SynthError::InvalidDuration(duration));
    }
    // f64 keeps e.g. 0.4s at exactly 17640 samples
    let count = (duration as f64 * sample_rate as f64).round() as usize;
    if count == 0 {
        return Err(SynthError::EmptyBuffer);
    }
    Ok(count)
}
