#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::TimeSignature;

/// Which beats of the bar are accented, one entry per beat.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccentPattern {
    accents: Vec<bool>,
}

impl AccentPattern {
    /// Downbeat accented, everything else plain.
    pub fn new(beats: usize) -> Self {
        debug_assert!(beats >= 1, "accent pattern needs at least one beat");
        let mut accents = vec![false; beats.max(1)];
        accents[0] = true;
        Self { accents }
    }

    pub fn for_signature(signature: TimeSignature) -> Self {
        Self::new(signature.beats())
    }

    /// Take an explicit pattern as-is. Empty input falls back to a single accented beat.
    pub fn from_vec(accents: Vec<bool>) -> Self {
        if accents.is_empty() {
            return Self::new(1);
        }
        Self { accents }
    }

    /// Pattern for a new beat count after a time-signature change.
    ///
    /// Overlapping positions keep their value, new positions start plain,
    /// surplus positions are dropped, and beat 0 is always accented.
    pub fn resized(&self, beats: usize) -> Self {
        debug_assert!(beats >= 1, "accent pattern needs at least one beat");
        let mut accents = self.accents.clone();
        accents.resize(beats.max(1), false);
        accents[0] = true;
        Self { accents }
    }

    /// Flip one beat. Positions outside the bar are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(accent) = self.accents.get_mut(index) {
            *accent = !*accent;
        }
    }

    pub fn is_accented(&self, index: usize) -> bool {
        self.accents.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.accents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accents.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.accents
    }
}

impl Default for AccentPattern {
    fn default() -> Self {
        Self::for_signature(TimeSignature::default())
    }
}
