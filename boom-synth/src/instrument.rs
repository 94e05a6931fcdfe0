//! Instrument definitions
//!
//! An [`InstrumentSpec`] pairs a [`Voice`] (which generator to run, with its
//! parameters) with a duration and the [`EnvelopeSpec`] that shapes it.
//! Adding an instrument means adding a voice variant, its generator and a preset;
//! existing voices are untouched.

use rand::Rng;

use crate::envelope::EnvelopeSpec;
use crate::generators;
use crate::oscillators::{FrequencySweep, WaveShape};
use crate::{MAX_AMP, Result, SampleBuffer, SynthError, sample_count};

/// Parameters for swept-sine drums (kick, tom)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    pub sweep: FrequencySweep,
    /// Second-harmonic weight (0.0 for a single harmonic)
    pub harmonic: f32,
    pub volume: f32,
}

/// Snare: white noise plus fixed-frequency resonances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnareParams {
    pub noise_level: f32,
    /// (frequency in Hz, weight) per resonance
    pub tones: [(f32, f32); 2],
}

impl Default for SnareParams {
    fn default() -> Self {
        Self {
            noise_level: 0.7,
            tones: [(180.0, 0.2), (330.0, 0.1)],
        }
    }
}

/// Plain noise voices (hi-hats)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub volume: f32,
}

/// Clap burst timing and tail shape
///
/// Burst windows are half-open `[start, end)` intervals in seconds and must not
/// overlap. The defaults are tuned presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClapParams {
    pub bursts: [(f32, f32); 3],
    /// Decay rate inside each burst (1/s)
    pub burst_decay: f32,
    /// Level of the noise tail relative to a burst
    pub tail_level: f32,
    /// Decay rate of the tail (1/s)
    pub tail_decay: f32,
    pub volume: f32,
}

impl Default for ClapParams {
    fn default() -> Self {
        Self {
            bursts: [(0.0, 0.010), (0.012, 0.022), (0.024, 0.034)],
            burst_decay: 80.0,
            tail_level: 0.4,
            tail_decay: 18.0,
            volume: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RimshotParams {
    pub frequency: f32,
    /// Decay rate of the burst (1/s)
    pub decay: f32,
    pub tone_level: f32,
    pub noise_level: f32,
}

impl Default for RimshotParams {
    fn default() -> Self {
        Self {
            frequency: 1700.0,
            decay: 60.0,
            tone_level: 0.8,
            noise_level: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakerParams {
    /// Amplitude modulation rate in Hz
    pub modulation: f32,
    pub volume: f32,
}

impl Default for ShakerParams {
    fn default() -> Self {
        Self {
            modulation: 5000.0,
            volume: 0.6,
        }
    }
}

/// Fixed-frequency sine (cowbell)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub frequency: f32,
    pub volume: f32,
}

/// FM-synthesized melodic note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteParams {
    pub frequency: f32,
    pub shape: WaveShape,
    /// Scales the modulation index; 0.0 is an unmodulated carrier
    pub richness: f32,
}

/// Which generator produces a sound, with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voice {
    Kick(SweepParams),
    Snare(SnareParams),
    ClosedHiHat(NoiseParams),
    OpenHiHat(NoiseParams),
    Clap(ClapParams),
    Tom(SweepParams),
    Rimshot(RimshotParams),
    Shaker(ShakerParams),
    Cowbell(ToneParams),
    MelodicNote(NoteParams),
}

impl Voice {
    /// Short lowercase name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Voice::Kick(_) => "kick",
            Voice::Snare(_) => "snare",
            Voice::ClosedHiHat(_) => "closed hi-hat",
            Voice::OpenHiHat(_) => "open hi-hat",
            Voice::Clap(_) => "clap",
            Voice::Tom(_) => "tom",
            Voice::Rimshot(_) => "rimshot",
            Voice::Shaker(_) => "shaker",
            Voice::Cowbell(_) => "cowbell",
            Voice::MelodicNote(_) => "note",
        }
    }

    /// Whether the generator draws random values
    pub fn uses_noise(&self) -> bool {
        matches!(
            self,
            Voice::Snare(_)
                | Voice::ClosedHiHat(_)
                | Voice::OpenHiHat(_)
                | Voice::Clap(_)
                | Voice::Rimshot(_)
                | Voice::Shaker(_)
        )
    }

    /// Upper bound of the raw output as a fraction of [`MAX_AMP`]
    pub fn mix_weight(&self) -> f32 {
        match self {
            Voice::Kick(p) | Voice::Tom(p) => p.volume,
            Voice::Snare(p) => p.noise_level + p.tones.iter().map(|&(_, w)| w.abs()).sum::<f32>(),
            Voice::ClosedHiHat(p) | Voice::OpenHiHat(p) => p.volume,
            Voice::Clap(p) => p.volume * p.tail_level.max(1.0),
            Voice::Rimshot(p) => p.tone_level + p.noise_level,
            Voice::Shaker(p) => p.volume,
            Voice::Cowbell(p) => p.volume,
            Voice::MelodicNote(_) => generators::NOTE_HEADROOM,
        }
    }

    /// Reject non-finite or out-of-range parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Voice::Kick(p) | Voice::Tom(p) => {
                positive("sweep.start", p.sweep.start)?;
                positive("sweep.floor", p.sweep.floor)?;
                non_negative("sweep.rate", p.sweep.rate)?;
                non_negative("harmonic", p.harmonic)?;
                non_negative("volume", p.volume)
            }
            Voice::Snare(p) => {
                non_negative("noise_level", p.noise_level)?;
                for &(freq, weight) in &p.tones {
                    positive("tone.frequency", freq)?;
                    non_negative("tone.weight", weight)?;
                }
                Ok(())
            }
            Voice::ClosedHiHat(p) | Voice::OpenHiHat(p) => non_negative("volume", p.volume),
            Voice::Clap(p) => {
                let mut previous_end = 0.0;
                for &(start, end) in &p.bursts {
                    non_negative("burst.start", start)?;
                    if !end.is_finite() || end <= start || start < previous_end {
                        return Err(SynthError::InvalidParameter {
                            name: "burst.end",
                            value: end,
                        });
                    }
                    previous_end = end;
                }
                non_negative("burst_decay", p.burst_decay)?;
                non_negative("tail_level", p.tail_level)?;
                non_negative("tail_decay", p.tail_decay)?;
                non_negative("volume", p.volume)
            }
            Voice::Rimshot(p) => {
                positive("frequency", p.frequency)?;
                non_negative("decay", p.decay)?;
                non_negative("tone_level", p.tone_level)?;
                non_negative("noise_level", p.noise_level)
            }
            Voice::Shaker(p) => {
                positive("modulation", p.modulation)?;
                non_negative("volume", p.volume)
            }
            Voice::Cowbell(p) => {
                positive("frequency", p.frequency)?;
                non_negative("volume", p.volume)
            }
            Voice::MelodicNote(p) => {
                positive("frequency", p.frequency)?;
                non_negative("richness", p.richness)
            }
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidParameter { name, value })
    }
}

/// A complete instrument: voice, length and envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentSpec {
    pub voice: Voice,
    /// Duration in seconds
    pub duration: f32,
    pub envelope: EnvelopeSpec,
}

impl InstrumentSpec {
    pub fn new(voice: Voice, duration: f32, envelope: EnvelopeSpec) -> Result<Self> {
        let spec = Self {
            voice,
            duration,
            envelope,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Kick: 150Hz -> 40Hz sweep with a second harmonic for punch
    pub fn kick() -> Self {
        Self {
            voice: Voice::Kick(SweepParams {
                sweep: FrequencySweep::new(150.0, 40.0, 25.0),
                harmonic: 0.3,
                volume: 1.0,
            }),
            duration: 0.4,
            envelope: EnvelopeSpec::kick(),
        }
    }

    pub fn snare() -> Self {
        Self {
            voice: Voice::Snare(SnareParams::default()),
            duration: 0.25,
            envelope: EnvelopeSpec::snare(),
        }
    }

    pub fn closed_hat() -> Self {
        Self {
            voice: Voice::ClosedHiHat(NoiseParams { volume: 0.5 }),
            duration: 0.08,
            envelope: EnvelopeSpec::closed_hat(),
        }
    }

    pub fn open_hat() -> Self {
        Self {
            voice: Voice::OpenHiHat(NoiseParams { volume: 0.45 }),
            duration: 0.4,
            envelope: EnvelopeSpec::open_hat(),
        }
    }

    pub fn clap() -> Self {
        Self {
            voice: Voice::Clap(ClapParams::default()),
            duration: 0.3,
            envelope: EnvelopeSpec::clap(),
        }
    }

    /// Tom starting at `frequency`, settling 40% lower with a slow sweep
    pub fn tom(frequency: f32) -> Self {
        Self {
            voice: Voice::Tom(SweepParams {
                sweep: FrequencySweep::new(frequency, frequency * 0.6, 8.0),
                harmonic: 0.0,
                volume: 0.9,
            }),
            duration: 0.35,
            envelope: EnvelopeSpec::tom(),
        }
    }

    pub fn rimshot() -> Self {
        Self {
            voice: Voice::Rimshot(RimshotParams::default()),
            duration: 0.1,
            envelope: EnvelopeSpec::rimshot(),
        }
    }

    pub fn shaker() -> Self {
        Self {
            voice: Voice::Shaker(ShakerParams::default()),
            duration: 0.15,
            envelope: EnvelopeSpec::shaker(),
        }
    }

    pub fn cowbell() -> Self {
        Self {
            voice: Voice::Cowbell(ToneParams {
                frequency: 800.0,
                volume: 0.6,
            }),
            duration: 0.3,
            envelope: EnvelopeSpec::cowbell(),
        }
    }

    /// Melodic note with the default note envelope
    pub fn note(frequency: f32, shape: WaveShape, richness: f32) -> Self {
        Self {
            voice: Voice::MelodicNote(NoteParams {
                frequency,
                shape,
                richness,
            }),
            duration: 0.8,
            envelope: EnvelopeSpec::note(),
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeSpec) -> Self {
        self.envelope = envelope;
        self
    }

    /// Validate duration, envelope and voice parameters
    pub fn validate(&self) -> Result<()> {
        sample_count(self.duration, crate::SAMPLE_RATE)?;
        self.envelope.validate()?;
        self.voice.validate()
    }

    /// Number of samples this instrument renders at `sample_rate`
    pub fn num_samples(&self, sample_rate: u32) -> Result<usize> {
        sample_count(self.duration, sample_rate)
    }

    /// Largest raw amplitude the generator can produce
    pub fn amplitude_bound(&self) -> f32 {
        self.voice.mix_weight() * MAX_AMP
    }

    /// Produce the raw, un-enveloped buffer
    pub fn generate<R: Rng>(&self, sample_rate: u32, rng: &mut R) -> Result<SampleBuffer> {
        let len = sample_count(self.duration, sample_rate)?;
        self.voice.validate()?;

        let samples = match &self.voice {
            Voice::Kick(p) | Voice::Tom(p) => generators::swept_drum(p, len, sample_rate),
            Voice::Snare(p) => generators::snare(p, len, sample_rate, rng),
            Voice::ClosedHiHat(p) | Voice::OpenHiHat(p) => {
                generators::hat(p, len, sample_rate, rng)
            }
            Voice::Clap(p) => generators::clap(p, len, sample_rate, rng),
            Voice::Rimshot(p) => generators::rimshot(p, len, sample_rate, rng),
            Voice::Shaker(p) => generators::shaker(p, len, sample_rate, rng),
            Voice::Cowbell(p) => generators::tone(p, len, sample_rate),
            Voice::MelodicNote(p) => generators::note(p, len, sample_rate),
        };

        Ok(SampleBuffer::from_samples(sample_rate, samples))
    }
}
