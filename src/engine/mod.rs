//! Beat scheduling and transport control.

pub mod scheduler;
pub mod transport;

pub use scheduler::{Beat, BeatListener, BeatScheduler};
pub use transport::{Transport, TransportState, DEFAULT_WARM_UP};

use crate::sequencing::{Tempo, TimeSignature};

/// User intents fed into the transport, one per control gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Jump to a tempo
    SetTempo(Tempo),
    /// Move the tempo by a number of BPM, clamped to range
    NudgeTempo(i32),
    /// Switch meter; accents are carried over
    SetTimeSignature(TimeSignature),
    /// Flip the accent on one beat of the bar
    ToggleAccent(usize),
    /// Tap-tempo gesture
    Tap,
    /// Lock or unlock tap tempo; locking discards the pending taps
    ToggleTapLock,
    /// Start or stop
    ToggleRun,
    /// Click gain, 0.0-1.0
    SetVolume(f32),
}
