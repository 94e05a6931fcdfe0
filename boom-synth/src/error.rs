//! Error type for synthesis and export

/// Errors raised while building, rendering or writing a sound.
///
/// Parameter errors are raised eagerly, before any buffer is allocated.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),

    #[error("Duration must be between 0 and {max} seconds, got {0}", max = crate::MAX_DURATION_SECS)]
    InvalidDuration(f32),

    #[error("Invalid envelope {field}: {value}")]
    InvalidEnvelope { field: &'static str, value: f32 },

    #[error("Invalid instrument parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("Sound would contain no samples")]
    EmptyBuffer,

    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Unknown wave shape: {0:?} (use square, saw, or sine)")]
    UnknownWaveShape(String),

    #[cfg(feature = "wav-export")]
    #[error("Failed to write WAV: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sound pack manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SynthError>;
