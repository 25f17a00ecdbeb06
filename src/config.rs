//! Metronome configuration.
//!
//! ```
//! use saavy_metronome::{config::MetronomeConfig, sequencing::TimeSignature};
//!
//! let config = MetronomeConfig::new()
//!     .bpm(90)
//!     .signature(TimeSignature::SIX_EIGHT)
//!     .volume(0.6);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::DEFAULT_WARM_UP,
    error::ConfigError,
    sequencing::{AccentPattern, Tempo, TimeSignature},
};

/// Everything needed to build a transport.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct MetronomeConfig {
    pub tempo: Tempo,
    pub signature: TimeSignature,
    /// One entry per beat of `signature`.
    pub accents: AccentPattern,
    /// Click gain, 0.0-1.0
    pub volume: f32,
    /// Delay before the first click after the device is first opened.
    pub warm_up: Duration,
}

impl MetronomeConfig {
    pub const DEFAULT_VOLUME: f32 = 0.8;

    pub fn new() -> Self {
        Self {
            tempo: Tempo::DEFAULT,
            signature: TimeSignature::FOUR_FOUR,
            accents: AccentPattern::for_signature(TimeSignature::FOUR_FOUR),
            volume: Self::DEFAULT_VOLUME,
            warm_up: DEFAULT_WARM_UP,
        }
    }

    /// Set the tempo, clamped into range.
    pub fn bpm(mut self, bpm: u16) -> Self {
        self.tempo = Tempo::clamped(bpm as u32);
        self
    }

    /// Set the meter; the accent pattern is resized to match.
    pub fn signature(mut self, signature: TimeSignature) -> Self {
        self.accents = self.accents.resized(signature.beats());
        self.signature = signature;
        self
    }

    pub fn accents(mut self, accents: AccentPattern) -> Self {
        self.accents = accents;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn warm_up(mut self, warm_up: Duration) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Check the invariants the scheduler relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accents.len() != self.signature.beats() {
            return Err(ConfigError::AccentLength {
                expected: self.signature.beats(),
                actual: self.accents.len(),
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::VolumeOutOfRange(self.volume));
        }
        Ok(())
    }
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self::new()
    }
}
