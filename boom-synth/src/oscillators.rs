//! Oscillator primitives shared by the instrument generators
//!
//! Three combinators cover every voice:
//! - [`swept_sine`]: sine whose frequency decays exponentially (kick, tom)
//! - [`noise_with_gain`]: white noise under a time-varying gain (hats, clap, shaker)
//! - [`fm_phase`] + [`shape_sample`]: FM-modulated phase fed through a wave shape (notes)

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::SynthError;

/// Carrier wave shapes for melodic notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveShape {
    /// Sign of the modulated sine with a third-harmonic blend - hollow, retro
    Square,
    /// First four harmonics weighted by 1/n - bright, buzzy
    Saw,
    /// Raw modulated sine - smooth
    Sine,
}

impl WaveShape {
    /// Theoretical peak of [`shape_sample`] for this shape, used for headroom
    pub fn peak(self) -> f32 {
        match self {
            WaveShape::Square => 1.0,
            // 1 + 1/2 + 1/3 + 1/4
            WaveShape::Saw => 25.0 / 12.0,
            WaveShape::Sine => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Square => "square",
            WaveShape::Saw => "saw",
            WaveShape::Sine => "sine",
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveShape {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(WaveShape::Square),
            "saw" => Ok(WaveShape::Saw),
            "sine" => Ok(WaveShape::Sine),
            _ => Err(SynthError::UnknownWaveShape(s.to_string())),
        }
    }
}

/// Exponential pitch drop: `f(t) = (start - floor) * e^(-rate * t) + floor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencySweep {
    /// Frequency at t = 0, in Hz
    pub start: f32,
    /// Frequency the sweep settles towards, in Hz
    pub floor: f32,
    /// Sweep speed in 1/seconds
    pub rate: f32,
}

impl FrequencySweep {
    pub fn new(start: f32, floor: f32, rate: f32) -> Self {
        Self { start, floor, rate }
    }

    /// Instantaneous frequency at `t` seconds
    pub fn frequency_at(&self, t: f32) -> f32 {
        (self.start - self.floor) * (-self.rate * t).exp() + self.floor
    }
}

/// Generate a frequency-swept sine
///
/// The phase is a running integral of the instantaneous frequency, so the pitch
/// glides without discontinuities. `harmonic` weights an added second harmonic;
/// the sum is normalized back to the -1.0 to 1.0 range.
///
/// # Arguments
/// * `sweep` - Pitch trajectory
/// * `harmonic` - Second-harmonic weight (0.0 for a pure sine)
/// * `len` - Number of samples
/// * `sample_rate` - Sample rate in Hz
pub fn swept_sine(sweep: &FrequencySweep, harmonic: f32, len: usize, sample_rate: u32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(len);
    let norm = 1.0 / (1.0 + harmonic.abs());
    let mut phase = 0.0f32;

    for i in 0..len {
        let t = i as f32 / sample_rate as f32;
        let sample = phase.sin() + harmonic * (2.0 * phase).sin();
        samples.push(sample * norm);

        phase += TAU * sweep.frequency_at(t) / sample_rate as f32;
        if phase > TAU {
            phase -= TAU;
        }
    }

    samples
}

/// Generate uniform white noise in the -1.0 to 1.0 range
///
/// Randomness comes from the caller's generator; nothing is cached between calls.
pub fn white_noise<R: Rng>(len: usize, rng: &mut R) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0f32..=1.0)).collect()
}

/// Generate white noise shaped by a time-varying gain
///
/// # Arguments
/// * `len` - Number of samples
/// * `sample_rate` - Sample rate in Hz
/// * `rng` - Noise source
/// * `gain` - Gain as a function of time in seconds
pub fn noise_with_gain<R, F>(len: usize, sample_rate: u32, rng: &mut R, gain: F) -> Vec<f32>
where
    R: Rng,
    F: Fn(f32) -> f32,
{
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            rng.random_range(-1.0f32..=1.0) * gain(t)
        })
        .collect()
}

/// Carrier phase perturbed by a modulator at twice the carrier frequency
///
/// `phase = 2π·f·t + index·sin(2π·2f·t)`
pub fn fm_phase(carrier: f32, index: f32, t: f32) -> f32 {
    TAU * carrier * t + index * (TAU * 2.0 * carrier * t).sin()
}

/// Evaluate a wave shape at `phase`
pub fn shape_sample(shape: WaveShape, phase: f32) -> f32 {
    match shape {
        WaveShape::Square => {
            let sign = if phase.sin() >= 0.0 { 1.0 } else { -1.0 };
            0.8 * sign + 0.2 * (3.0 * phase).sin()
        }
        WaveShape::Saw => (1..=4)
            .map(|h| {
                let h = h as f32;
                (h * phase).sin() / h
            })
            .sum(),
        WaveShape::Sine => phase.sin(),
    }
}
