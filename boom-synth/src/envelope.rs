//! Attack / exponential decay / deadline fade envelope
//!
//! Every sound is shaped by the product of three gains:
//! - Attack: linear ramp from 0 to 1 over the attack window
//! - Decay: `s + (1 - s) * e^(-rate * t)`, running over the whole buffer
//! - Fade: linear ramp to exactly 0 over the last `fade_out` samples
//!
//! The fade is deadline based, so the final sample is silent no matter how far
//! the exponential decay has progressed.

use crate::{FADE_OUT_SAMPLES, Result, SampleBuffer, SynthError};

/// Envelope parameters for one instrument
///
/// Attack is in seconds, decay rate in 1/seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSpec {
    /// Attack time in seconds (0 disables the attack ramp)
    pub attack: f32,
    /// Exponential decay coefficient in 1/seconds
    pub decay_rate: f32,
    /// Level the decay settles towards (0.0 to 1.0), silence when `None`
    pub sustain: Option<f32>,
    /// Length of the closing linear fade in samples
    pub fade_out: usize,
}

impl Default for EnvelopeSpec {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay_rate: 10.0,
            sustain: None,
            fade_out: FADE_OUT_SAMPLES,
        }
    }
}

impl EnvelopeSpec {
    /// Create a new envelope, rejecting negative or non-finite parameters
    pub fn new(attack: f32, decay_rate: f32) -> Result<Self> {
        let env = Self {
            attack,
            decay_rate,
            ..Self::default()
        };
        env.validate()?;
        Ok(env)
    }

    /// Settle at `level` instead of decaying to silence
    pub fn with_sustain(mut self, level: f32) -> Result<Self> {
        self.sustain = Some(level);
        self.validate()?;
        Ok(self)
    }

    /// Override the closing fade length (at least one sample)
    pub fn with_fade_out(mut self, samples: usize) -> Result<Self> {
        self.fade_out = samples;
        self.validate()?;
        Ok(self)
    }

    /// Check parameters; called again by [`EnvelopeSpec::apply`] since fields are public
    pub fn validate(&self) -> Result<()> {
        if !self.attack.is_finite() || self.attack < 0.0 {
            return Err(SynthError::InvalidEnvelope {
                field: "attack",
                value: self.attack,
            });
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(SynthError::InvalidEnvelope {
                field: "decay_rate",
                value: self.decay_rate,
            });
        }
        if let Some(level) = self.sustain {
            if !(0.0..=1.0).contains(&level) {
                return Err(SynthError::InvalidEnvelope {
                    field: "sustain",
                    value: level,
                });
            }
        }
        // A zero-length fade would leave the last sample unshaped
        if self.fade_out == 0 {
            return Err(SynthError::InvalidEnvelope {
                field: "fade_out",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Kick: short click-free attack, medium decay
    pub fn kick() -> Self {
        Self {
            attack: 0.005,
            decay_rate: 12.0,
            ..Self::default()
        }
    }

    pub fn snare() -> Self {
        Self {
            attack: 0.001,
            decay_rate: 20.0,
            ..Self::default()
        }
    }

    /// Closed hi-hat: very fast decay
    pub fn closed_hat() -> Self {
        Self {
            attack: 0.0005,
            decay_rate: 60.0,
            ..Self::default()
        }
    }

    /// Open hi-hat: long ring
    pub fn open_hat() -> Self {
        Self {
            attack: 0.001,
            decay_rate: 8.0,
            ..Self::default()
        }
    }

    /// Clap: the generator shapes its own bursts, so this only rounds off the tail
    pub fn clap() -> Self {
        Self {
            attack: 0.001,
            decay_rate: 4.0,
            ..Self::default()
        }
    }

    pub fn tom() -> Self {
        Self {
            attack: 0.002,
            decay_rate: 9.0,
            ..Self::default()
        }
    }

    pub fn rimshot() -> Self {
        Self {
            attack: 0.0005,
            decay_rate: 30.0,
            ..Self::default()
        }
    }

    /// Shaker: softer attack so the texture swells in
    pub fn shaker() -> Self {
        Self {
            attack: 0.01,
            decay_rate: 18.0,
            ..Self::default()
        }
    }

    pub fn cowbell() -> Self {
        Self {
            attack: 0.001,
            decay_rate: 10.0,
            ..Self::default()
        }
    }

    /// Melodic note: medium decay
    pub fn note() -> Self {
        Self {
            attack: 0.01,
            decay_rate: 3.0,
            ..Self::default()
        }
    }

    /// Pad/lead: slower attack, holds at a sustain level
    pub fn pad() -> Self {
        Self {
            attack: 0.08,
            decay_rate: 2.5,
            sustain: Some(0.35),
            fade_out: FADE_OUT_SAMPLES,
        }
    }

    /// Attack window length in samples
    pub fn attack_samples(&self, sample_rate: u32) -> usize {
        (self.attack as f64 * sample_rate as f64).round() as usize
    }

    /// Attack ramp factor; 1.0 outside the window or when the window is empty
    pub fn attack_gain(&self, index: usize, sample_rate: u32) -> f32 {
        let attack_samples = self.attack_samples(sample_rate);
        if attack_samples > 0 && index < attack_samples {
            index as f32 / attack_samples as f32
        } else {
            1.0
        }
    }

    /// Exponential decay factor at `index`
    pub fn decay_gain(&self, index: usize, sample_rate: u32) -> f32 {
        let t = index as f32 / sample_rate as f32;
        let sustain = self.sustain.unwrap_or(0.0);
        sustain + (1.0 - sustain) * (-self.decay_rate * t).exp()
    }

    /// Deadline fade factor at `index` in a buffer of `len` samples
    ///
    /// Buffers shorter than the fade window fade over their full length.
    pub fn fade_gain(&self, index: usize, len: usize) -> f32 {
        if index >= len {
            return 0.0;
        }
        let fade_len = self.fade_out.min(len);
        if fade_len == 0 {
            return 1.0;
        }
        let fade_start = len - fade_len;
        if index >= fade_start {
            (len - 1 - index) as f32 / fade_len as f32
        } else {
            1.0
        }
    }

    /// Combined gain for sample `index` of a `len`-sample buffer
    pub fn gain_at(&self, index: usize, len: usize, sample_rate: u32) -> f32 {
        self.attack_gain(index, sample_rate)
            * self.decay_gain(index, sample_rate)
            * self.fade_gain(index, len)
    }

    /// Shape a raw buffer, returning a new buffer of the same length
    pub fn apply(&self, buffer: SampleBuffer) -> Result<SampleBuffer> {
        self.validate()?;
        if buffer.sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate(buffer.sample_rate));
        }

        let SampleBuffer {
            sample_rate,
            samples,
        } = buffer;
        let len = samples.len();

        let shaped = samples
            .into_iter()
            .enumerate()
            .map(|(i, s)| s * self.gain_at(i, len, sample_rate))
            .collect();

        Ok(SampleBuffer::from_samples(sample_rate, shaped))
    }

    /// Envelope curve over `len` samples
    ///
    /// Useful for visualization or debugging.
    pub fn curve(&self, len: usize, sample_rate: u32) -> Vec<f32> {
        (0..len).map(|i| self.gain_at(i, len, sample_rate)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    fn ones(len: usize) -> SampleBuffer {
        SampleBuffer::from_samples(SAMPLE_RATE, vec![1.0; len])
    }

    #[test]
    fn test_envelope_presets_are_valid() {
        for env in [
            EnvelopeSpec::kick(),
            EnvelopeSpec::snare(),
            EnvelopeSpec::closed_hat(),
            EnvelopeSpec::open_hat(),
            EnvelopeSpec::clap(),
            EnvelopeSpec::tom(),
            EnvelopeSpec::rimshot(),
            EnvelopeSpec::shaker(),
            EnvelopeSpec::cowbell(),
            EnvelopeSpec::note(),
            EnvelopeSpec::pad(),
        ] {
            assert!(env.validate().is_ok(), "{env:?}");
        }
    }

    #[test]
    fn test_envelope_rejects_bad_parameters() {
        assert!(matches!(
            EnvelopeSpec::new(-0.01, 5.0),
            Err(SynthError::InvalidEnvelope { field: "attack", .. })
        ));
        assert!(matches!(
            EnvelopeSpec::new(0.01, f32::INFINITY),
            Err(SynthError::InvalidEnvelope {
                field: "decay_rate",
                ..
            })
        ));
        assert!(matches!(
            EnvelopeSpec::default().with_sustain(1.5),
            Err(SynthError::InvalidEnvelope {
                field: "sustain",
                ..
            })
        ));
        assert!(matches!(
            EnvelopeSpec::default().with_fade_out(0),
            Err(SynthError::InvalidEnvelope {
                field: "fade_out",
                ..
            })
        ));
    }

    #[test]
    fn test_apply_rejects_zero_fade_out() {
        let env = EnvelopeSpec {
            fade_out: 0,
            ..EnvelopeSpec::kick()
        };
        assert!(env.apply(ones(1000)).is_err());
    }

    #[test]
    fn test_custom_fade_out_length() {
        let env = EnvelopeSpec::new(0.0, 0.0).unwrap().with_fade_out(10).unwrap();
        let curve = env.curve(1000, SAMPLE_RATE);
        assert_eq!(curve[989], 1.0);
        assert_eq!(curve[990], 0.9);
        assert_eq!(curve[999], 0.0);
    }

    #[test]
    fn test_apply_keeps_length() {
        let env = EnvelopeSpec::kick();
        let shaped = env.apply(ones(4410)).unwrap();
        assert_eq!(shaped.len(), 4410);
        assert_eq!(shaped.sample_rate, SAMPLE_RATE);
    }

    #[test]
    fn test_attack_ramp() {
        let env = EnvelopeSpec::new(0.005, 0.0).unwrap();
        let attack_samples = env.attack_samples(SAMPLE_RATE);
        assert_eq!(attack_samples, 220);

        assert_eq!(env.attack_gain(0, SAMPLE_RATE), 0.0);
        assert!((env.attack_gain(110, SAMPLE_RATE) - 0.5).abs() < 1e-6);
        assert_eq!(env.attack_gain(attack_samples, SAMPLE_RATE), 1.0);

        // Ramp is monotonic inside the window
        let ramp: Vec<f32> = (0..attack_samples)
            .map(|i| env.attack_gain(i, SAMPLE_RATE))
            .collect();
        assert!(ramp.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_zero_attack_skips_ramp() {
        let env = EnvelopeSpec::new(0.0, 0.0).unwrap();
        assert_eq!(env.attack_samples(SAMPLE_RATE), 0);
        let shaped = env.apply(ones(500)).unwrap();
        assert_eq!(shaped.samples[0], 1.0);
        assert!(shaped.samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_attack_longer_than_buffer() {
        let env = EnvelopeSpec::new(1.0, 0.0).unwrap();
        let shaped = env.apply(ones(1000)).unwrap();
        assert_eq!(shaped.len(), 1000);
        // Still rising when the tail fade takes over
        assert!(shaped.samples[800] < 0.02);
        assert!(shaped.samples.iter().all(|s| s.is_finite()));
        assert_eq!(*shaped.samples.last().unwrap(), 0.0);
    }

    #[test]
    fn test_tail_fade_reaches_zero() {
        let env = EnvelopeSpec::note();
        let len = 8000;
        let curve = env.curve(len, SAMPLE_RATE);

        assert_eq!(curve[len - 1], 0.0);
        let tail = &curve[len - FADE_OUT_SAMPLES..];
        assert!(tail.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_tail_fade_dominates_sustain() {
        // Sustain keeps the decay high, the fade still forces silence
        let env = EnvelopeSpec::new(0.0, 0.0).unwrap().with_sustain(1.0).unwrap();
        let curve = env.curve(1000, SAMPLE_RATE);
        assert_eq!(curve[899], 1.0);
        assert!(curve[950] < 0.5);
        assert_eq!(curve[999], 0.0);
    }

    #[test]
    fn test_short_buffer_fades_over_full_length() {
        let env = EnvelopeSpec::new(0.0, 0.0).unwrap();
        let curve = env.curve(10, SAMPLE_RATE);
        assert_eq!(curve[0], 0.9);
        assert_eq!(curve[9], 0.0);
    }

    #[test]
    fn test_decay_is_exponential() {
        let env = EnvelopeSpec::new(0.0, 10.0).unwrap();
        let g = env.decay_gain(SAMPLE_RATE as usize / 10, SAMPLE_RATE);
        assert!((g - (-1.0f32).exp()).abs() < 1e-4);
    }

    #[test]
    fn test_sustain_floor() {
        let env = EnvelopeSpec::pad();
        let g = env.decay_gain(SAMPLE_RATE as usize * 10, SAMPLE_RATE);
        assert!((g - 0.35).abs() < 1e-3);
    }

    #[test]
    fn test_apply_empty_buffer() {
        let env = EnvelopeSpec::default();
        let shaped = env.apply(SampleBuffer::new(SAMPLE_RATE)).unwrap();
        assert!(shaped.is_empty());
    }

    #[test]
    fn test_apply_rejects_zero_sample_rate() {
        let env = EnvelopeSpec::default();
        assert!(matches!(
            env.apply(SampleBuffer::from_samples(0, vec![1.0])),
            Err(SynthError::InvalidSampleRate(0))
        ));
    }
}
