//! Per-voice waveform generators
//!
//! Each generator returns `len` raw samples scaled to [`MAX_AMP`], before any
//! envelope is applied. Noise-bearing voices draw from the caller's generator.

use std::f32::consts::TAU;

use rand::Rng;

use crate::MAX_AMP;
use crate::instrument::{
    ClapParams, NoiseParams, NoteParams, RimshotParams, ShakerParams, SnareParams, SweepParams,
    ToneParams,
};
use crate::oscillators::{fm_phase, noise_with_gain, shape_sample, swept_sine};

/// Modulation index per unit of note richness
pub const RICHNESS_TO_INDEX: f32 = 2.0;

/// Fraction of full scale used by melodic notes
pub const NOTE_HEADROOM: f32 = 0.7;

fn time(i: usize, sample_rate: u32) -> f32 {
    i as f32 / sample_rate as f32
}

/// Kick and tom: exponentially swept sine with an optional second harmonic
pub fn swept_drum(params: &SweepParams, len: usize, sample_rate: u32) -> Vec<f32> {
    let scale = params.volume * MAX_AMP;
    swept_sine(&params.sweep, params.harmonic, len, sample_rate)
        .into_iter()
        .map(|s| s * scale)
        .collect()
}

/// Snare: noise-dominated mix with fixed tonal resonances
pub fn snare<R: Rng>(params: &SnareParams, len: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = time(i, sample_rate);
            let noise = rng.random_range(-1.0f32..=1.0) * params.noise_level;
            let tone: f32 = params
                .tones
                .iter()
                .map(|&(freq, weight)| (TAU * freq * t).sin() * weight)
                .sum();
            (noise + tone) * MAX_AMP
        })
        .collect()
}

/// Hi-hats: plain white noise at a fixed volume
pub fn hat<R: Rng>(params: &NoiseParams, len: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let scale = params.volume * MAX_AMP;
    noise_with_gain(len, sample_rate, rng, |_| scale)
}

/// Clap: noise micro-bursts in fixed windows over a decaying noise tail
pub fn clap<R: Rng>(params: &ClapParams, len: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let scale = params.volume * MAX_AMP;
    noise_with_gain(len, sample_rate, rng, |t| {
        let burst = params
            .bursts
            .iter()
            .find(|&&(start, end)| t >= start && t < end);
        let gain = match burst {
            Some(&(start, _)) => (-(t - start) * params.burst_decay).exp(),
            None => params.tail_level * (-t * params.tail_decay).exp(),
        };
        gain * scale
    })
}

/// Rimshot: fast-decaying high sine burst with a little noise
pub fn rimshot<R: Rng>(
    params: &RimshotParams,
    len: usize,
    sample_rate: u32,
    rng: &mut R,
) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = time(i, sample_rate);
            let decay = (-t * params.decay).exp();
            let tone = (TAU * params.frequency * t).sin() * params.tone_level;
            let noise = rng.random_range(-1.0f32..=1.0) * params.noise_level;
            (tone + noise) * decay * MAX_AMP
        })
        .collect()
}

/// Shaker: noise amplitude-modulated by a fast sine folded into 0..1
pub fn shaker<R: Rng>(params: &ShakerParams, len: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let scale = params.volume * MAX_AMP;
    noise_with_gain(len, sample_rate, rng, |t| {
        let am = 0.5 + 0.5 * (TAU * params.modulation * t).sin();
        am * scale
    })
}

/// Cowbell: fixed-frequency sine; all shaping comes from the envelope
pub fn tone(params: &ToneParams, len: usize, sample_rate: u32) -> Vec<f32> {
    let scale = params.volume * MAX_AMP;
    (0..len)
        .map(|i| (TAU * params.frequency * time(i, sample_rate)).sin() * scale)
        .collect()
}

/// Melodic note: FM-modulated carrier through the selected wave shape
pub fn note(params: &NoteParams, len: usize, sample_rate: u32) -> Vec<f32> {
    let index = params.richness * RICHNESS_TO_INDEX;
    let scale = NOTE_HEADROOM * MAX_AMP / params.shape.peak();
    (0..len)
        .map(|i| {
            let phase = fm_phase(params.frequency, index, time(i, sample_rate));
            shape_sample(params.shape, phase) * scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;
    use crate::oscillators::{FrequencySweep, WaveShape};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_swept_drum_scale() {
        let params = SweepParams {
            sweep: FrequencySweep::new(150.0, 40.0, 25.0),
            harmonic: 0.3,
            volume: 1.0,
        };
        let samples = swept_drum(&params, 4410, SAMPLE_RATE);
        assert!(samples.iter().all(|s| s.abs() <= MAX_AMP));
        assert!(samples.iter().any(|s| s.abs() > 0.5 * MAX_AMP));
    }

    #[test]
    fn test_clap_bursts_louder_than_gaps() {
        let params = ClapParams::default();
        let mut rng = Pcg64::seed_from_u64(3);
        let samples = clap(&params, 4410, SAMPLE_RATE, &mut rng);

        let window_peak = |from: f32, to: f32| {
            let a = (from * SAMPLE_RATE as f32) as usize;
            let b = (to * SAMPLE_RATE as f32) as usize;
            samples[a..b].iter().fold(0.0f32, |m, s| m.max(s.abs()))
        };
        // Start of the second burst vs the gap right before it
        assert!(window_peak(0.012, 0.014) > window_peak(0.0102, 0.0118));
        // The end of each burst still stands above the following gap
        assert!(window_peak(0.0085, 0.0100) > window_peak(0.0102, 0.0118));
        assert!(window_peak(0.0205, 0.0220) > window_peak(0.0222, 0.0238));
    }

    #[test]
    fn test_note_headroom() {
        for shape in [WaveShape::Square, WaveShape::Saw, WaveShape::Sine] {
            let params = NoteParams {
                frequency: 261.63,
                shape,
                richness: 1.0,
            };
            let samples = note(&params, 8820, SAMPLE_RATE);
            let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            assert!(peak <= NOTE_HEADROOM * MAX_AMP + 1.0, "{shape} peak {peak}");
        }
    }

    #[test]
    fn test_shaker_never_exceeds_volume() {
        let params = ShakerParams::default();
        let mut rng = Pcg64::seed_from_u64(11);
        let samples = shaker(&params, 4410, SAMPLE_RATE, &mut rng);
        assert!(
            samples
                .iter()
                .all(|s| s.abs() <= params.volume * MAX_AMP + 1e-2)
        );
    }
}
