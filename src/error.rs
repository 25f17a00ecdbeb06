//! Error types shared across the crate.

use thiserror::Error;

/// Rejected metronome configuration.
///
/// The scheduler itself assumes validated input; these errors are raised at
/// the edges (config parsing, presentation layer) before values reach it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tempo {bpm} BPM is outside {min}..={max}")]
    TempoOutOfRange { bpm: u32, min: u16, max: u16 },
    #[error("time signature needs at least one beat")]
    ZeroBeats,
    #[error("a signature without a beat unit has exactly one beat, got {0}")]
    UnitlessBeats(u8),
    #[error("accent pattern has {actual} entries but the signature has {expected} beats")]
    AccentLength { expected: usize, actual: usize },
    #[error("volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),
    #[error("unknown time signature `{0}`")]
    UnknownSignature(String),
}

/// Failure to bring up the audio output device.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no default output device available")]
    NoDevice,
    #[error("audio output is unavailable for this session")]
    Unavailable,
    #[error("failed to fetch default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Failure of an auxiliary beat actuator (flash, vibration, bell).
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("actuator `{0}` is not available")]
    Unavailable(&'static str),
    #[error("actuator i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
