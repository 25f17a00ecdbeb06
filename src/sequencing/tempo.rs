use std::{fmt, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tempo in beats per minute, always within `Tempo::MIN..=Tempo::MAX`.
///
/// The value is the literal click rate: one tick per beat at this BPM.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(u16);

impl Tempo {
    pub const MIN: u16 = 40;
    pub const MAX: u16 = 800;
    pub const DEFAULT: Tempo = Tempo(120);

    /// Floor on the tick interval, regardless of tempo.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

    pub fn new(bpm: u16) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&bpm) {
            Ok(Self(bpm))
        } else {
            Err(ConfigError::TempoOutOfRange {
                bpm: bpm as u32,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Clamp any BPM value into range.
    pub fn clamped(bpm: u32) -> Self {
        Self(bpm.clamp(Self::MIN as u32, Self::MAX as u32) as u16)
    }

    pub fn bpm(self) -> u16 {
        self.0
    }

    /// Move by `delta` BPM, stopping at the range bounds.
    pub fn saturating_add(self, delta: i32) -> Self {
        Self::clamped((self.0 as i32 + delta).max(0) as u32)
    }

    /// Time between ticks: `max(60000 / bpm ms, 10ms)`.
    pub fn interval(self) -> Duration {
        Duration::from_micros(60_000_000 / self.0 as u64).max(Self::MIN_INTERVAL)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

impl TryFrom<u16> for Tempo {
    type Error = ConfigError;

    fn try_from(bpm: u16) -> Result<Self, Self::Error> {
        Self::new(bpm)
    }
}

impl From<Tempo> for u16 {
    fn from(tempo: Tempo) -> Self {
        tempo.0
    }
}
