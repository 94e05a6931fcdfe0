//! Synthesis pipeline and the built-in sound catalogue
//!
//! Each sound is rendered independently: generate -> envelope -> finite check.
//! Sounds share no state, so the catalogue renders in parallel with one RNG per
//! sound.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;

use crate::instrument::InstrumentSpec;
use crate::oscillators::WaveShape;
use crate::pack::AnimationType;
use crate::{EnvelopeSpec, Result, SAMPLE_RATE, SampleBuffer, SynthError};

/// Render one instrument to a finished buffer
///
/// Fails rather than returning a buffer containing NaN or infinite samples.
pub fn synthesize<R: Rng>(spec: &InstrumentSpec, rng: &mut R) -> Result<SampleBuffer> {
    spec.validate()?;

    let raw = spec.generate(SAMPLE_RATE, rng)?;
    let shaped = spec.envelope.apply(raw)?;

    if shaped.is_empty() {
        return Err(SynthError::EmptyBuffer);
    }
    if let Some(index) = shaped.iter().position(|s| !s.is_finite()) {
        return Err(SynthError::NonFiniteSample { index });
    }

    Ok(shaped)
}

/// One sound in the catalogue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogueEntry {
    /// Stable identifier, also the output file stem
    pub id: &'static str,
    pub label: &'static str,
    pub spec: InstrumentSpec,
    /// Pack metadata consumed by the app
    pub animation: AnimationType,
    pub color: &'static str,
    pub key: &'static str,
}

impl CatalogueEntry {
    /// Output file name (`<id>.wav`)
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.id)
    }
}

/// Result of rendering one catalogue entry
#[derive(Debug)]
pub struct RenderedSound {
    pub id: &'static str,
    pub result: Result<SampleBuffer>,
}

/// Options for [`render_catalogue`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Base seed for noise; `None` draws fresh entropy for every run
    pub seed: Option<u64>,
}

impl RenderOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Independent generator for the sound at `index`
    fn rng_for(&self, index: usize) -> Pcg64 {
        match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed.wrapping_add(index as u64)),
            None => Pcg64::from_rng(&mut rand::rng()),
        }
    }
}

const NOTE_RICHNESS: f32 = 0.5;

fn entry(
    id: &'static str,
    label: &'static str,
    spec: InstrumentSpec,
    animation: AnimationType,
    color: &'static str,
    key: &'static str,
) -> CatalogueEntry {
    CatalogueEntry {
        id,
        label,
        spec,
        animation,
        color,
        key,
    }
}

/// The fixed catalogue of sounds written by the generator
///
/// Drum voices, one octave of note names `a` to `g`, and auxiliary timbres.
pub fn catalogue() -> Vec<CatalogueEntry> {
    use AnimationType::*;

    let note = |freq, shape| InstrumentSpec::note(freq, shape, NOTE_RICHNESS);

    vec![
        // Drums
        entry("kick", "Kick", InstrumentSpec::kick(), Ripple, "#FF6B6B", "Q"),
        entry("snare", "Snare", InstrumentSpec::snare(), Burst, "#4ECDC4", "W"),
        entry("hihat_closed", "Closed Hat", InstrumentSpec::closed_hat(), Scatter, "#45B7D1", "E"),
        entry("hihat_open", "Open Hat", InstrumentSpec::open_hat(), Spiral, "#96CEB4", "R"),
        entry("clap", "Clap", InstrumentSpec::clap(), Flash, "#FFEAA7", "T"),
        entry("tom_low", "Low Tom", InstrumentSpec::tom(110.0), Pulse, "#DDA0DD", "Y"),
        entry("tom_high", "High Tom", InstrumentSpec::tom(196.0), Pulse, "#E6A3F0", "U"),
        entry("rimshot", "Rimshot", InstrumentSpec::rimshot(), Slice, "#F7DC6F", "I"),
        entry("shaker", "Shaker", InstrumentSpec::shaker(), Wave, "#82E0AA", "O"),
        entry("cowbell", "Cowbell", InstrumentSpec::cowbell(), Shatter, "#F0B27A", "P"),
        // C minor pentatonic: C4 Eb4 F4 G4 Bb4 C5 Eb5
        entry("a", "C4", note(261.63, WaveShape::Square), Ripple, "#FF8A80", "A"),
        entry("b", "Eb4", note(311.13, WaveShape::Square), Burst, "#FFD180", "S"),
        entry("c", "F4", note(349.23, WaveShape::Saw), Spiral, "#FFFF8D", "D"),
        entry("d", "G4", note(392.00, WaveShape::Saw), Wave, "#CCFF90", "F"),
        entry("e", "Bb4", note(466.16, WaveShape::Square), Bloom, "#A7FFEB", "G"),
        entry("f", "C5", note(523.25, WaveShape::Sine), Orbit, "#80D8FF", "H"),
        entry("g", "Eb5", note(622.25, WaveShape::Sine), Mirror, "#B388FF", "J"),
        // Auxiliary timbres
        entry(
            "bell",
            "Bell",
            InstrumentSpec::note(1046.5, WaveShape::Sine, 1.5).with_duration(1.2),
            Bloom,
            "#FFE082",
            "K",
        ),
        entry(
            "bass",
            "Bass",
            InstrumentSpec::note(65.41, WaveShape::Saw, 0.3),
            Pulse,
            "#8C9EFF",
            "L",
        ),
        entry(
            "lead",
            "Lead",
            InstrumentSpec::note(523.25, WaveShape::Square, 0.8)
                .with_duration(1.0)
                .with_envelope(EnvelopeSpec::pad()),
            Orbit,
            "#FF80AB",
            "Z",
        ),
    ]
}

/// Render every entry in parallel
///
/// Results come back in catalogue order. A failed sound does not affect the
/// others; the caller decides what to do with each result.
pub fn render_catalogue(entries: &[CatalogueEntry], options: RenderOptions) -> Vec<RenderedSound> {
    entries
        .par_iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut rng = options.rng_for(index);
            let result = synthesize(&entry.spec, &mut rng);
            match &result {
                Ok(buffer) => tracing::debug!(
                    "Rendered {} ({}, {} samples)",
                    entry.id,
                    entry.spec.voice.name(),
                    buffer.len()
                ),
                Err(e) => tracing::warn!("Failed to render {}: {}", entry.id, e),
            }
            RenderedSound {
                id: entry.id,
                result,
            }
        })
        .collect()
}
