use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Note value that gets one click.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeatUnit {
    Quarter,
    Eighth,
    /// No meter: a single, endlessly repeated beat.
    None,
}

impl BeatUnit {
    fn denominator(self) -> Option<u8> {
        match self {
            Self::Quarter => Some(4),
            Self::Eighth => Some(8),
            Self::None => None,
        }
    }
}

/// Time signature: how many beats make a bar, and which note value each
/// beat is.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    beats: u8,
    unit: BeatUnit,
}

impl TimeSignature {
    /// No signature: every click is beat 0.
    pub const NONE: TimeSignature = TimeSignature {
        beats: 1,
        unit: BeatUnit::None,
    };

    pub const TWO_FOUR: TimeSignature = TimeSignature {
        beats: 2,
        unit: BeatUnit::Quarter,
    };

    pub const THREE_FOUR: TimeSignature = TimeSignature {
        beats: 3,
        unit: BeatUnit::Quarter,
    };

    pub const FOUR_FOUR: TimeSignature = TimeSignature {
        beats: 4,
        unit: BeatUnit::Quarter,
    };

    pub const FIVE_FOUR: TimeSignature = TimeSignature {
        beats: 5,
        unit: BeatUnit::Quarter,
    };

    /// 6/8 (compound duple)
    pub const SIX_EIGHT: TimeSignature = TimeSignature {
        beats: 6,
        unit: BeatUnit::Eighth,
    };

    pub const SEVEN_EIGHT: TimeSignature = TimeSignature {
        beats: 7,
        unit: BeatUnit::Eighth,
    };

    /// 9/8 (compound triple)
    pub const NINE_EIGHT: TimeSignature = TimeSignature {
        beats: 9,
        unit: BeatUnit::Eighth,
    };

    /// 12/8 (compound quadruple)
    pub const TWELVE_EIGHT: TimeSignature = TimeSignature {
        beats: 12,
        unit: BeatUnit::Eighth,
    };

    /// Signatures offered by the front end, in cycling order.
    pub const PRESETS: [TimeSignature; 9] = [
        Self::NONE,
        Self::TWO_FOUR,
        Self::THREE_FOUR,
        Self::FOUR_FOUR,
        Self::FIVE_FOUR,
        Self::SIX_EIGHT,
        Self::SEVEN_EIGHT,
        Self::NINE_EIGHT,
        Self::TWELVE_EIGHT,
    ];

    pub fn new(beats: u8, unit: BeatUnit) -> Result<Self, ConfigError> {
        match (beats, unit) {
            (0, _) => Err(ConfigError::ZeroBeats),
            (1, BeatUnit::None) => Ok(Self { beats, unit }),
            (n, BeatUnit::None) => Err(ConfigError::UnitlessBeats(n)),
            _ => Ok(Self { beats, unit }),
        }
    }

    /// Beats per bar; the scheduler's cursor modulus. Always at least 1.
    pub fn beats(&self) -> usize {
        self.beats as usize
    }

    pub fn unit(&self) -> BeatUnit {
        self.unit
    }

    /// Compound meters group eighths in threes (6/8, 9/8, 12/8).
    pub fn is_compound(&self) -> bool {
        self.unit == BeatUnit::Eighth && self.beats > 3 && self.beats % 3 == 0
    }

    /// The preset after this one, wrapping. Unknown signatures go to the first preset.
    pub fn next_preset(&self) -> TimeSignature {
        let index = Self::PRESETS.iter().position(|sig| sig == self);
        match index {
            Some(i) => Self::PRESETS[(i + 1) % Self::PRESETS.len()],
            None => Self::PRESETS[0],
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::FOUR_FOUR
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit.denominator() {
            Some(denominator) => write!(f, "{}/{}", self.beats, denominator),
            None => f.write_str("-"),
        }
    }
}

impl FromStr for TimeSignature {
    type Err = ConfigError;

    /// Parses `"4/4"`, `"6/8"`, or `"-"` / `"none"` for no signature.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-" || s.eq_ignore_ascii_case("none") {
            return Ok(Self::NONE);
        }

        let unknown = || ConfigError::UnknownSignature(s.to_string());
        let (beats, denominator) = s.split_once('/').ok_or_else(unknown)?;
        let beats: u8 = beats.trim().parse().map_err(|_| unknown())?;
        let unit = match denominator.trim() {
            "4" => BeatUnit::Quarter,
            "8" => BeatUnit::Eighth,
            _ => return Err(unknown()),
        };
        Self::new(beats, unit)
    }
}
