//! Tone generator: turns "click now" requests into sound.
//!
//! The scheduler talks to a [`ClickSink`]. The real sink is the audio output
//! device (see `io::output`), which forwards each click as a [`ClickRequest`]
//! through a lock-free ring to the [`ClickMixer`] running on the audio
//! thread. Every request becomes its own short-lived voice, so clicks that
//! overlap (fast tempos, a reschedule right after a tick) ring out
//! independently.

mod mixer;

pub use mixer::{ClickMixer, ClickVoice, MAX_LIVE_CLICKS};

use rtrb::Producer;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which of the two click sounds to play.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRole {
    Accent,
    Regular,
}

impl ClickRole {
    pub fn from_accent(accented: bool) -> Self {
        if accented {
            Self::Accent
        } else {
            Self::Regular
        }
    }

    pub fn timbre(self) -> Timbre {
        match self {
            Self::Accent => Timbre::ACCENT,
            Self::Regular => Timbre::REGULAR,
        }
    }
}

/// Pitch and relative loudness of a click role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timbre {
    pub frequency_hz: f32,
    pub gain_multiplier: f32,
}

impl Timbre {
    pub const ACCENT: Timbre = Timbre {
        frequency_hz: 1_200.0,
        gain_multiplier: 1.0,
    };

    pub const REGULAR: Timbre = Timbre {
        frequency_hz: 800.0,
        gain_multiplier: 0.7,
    };

    /// Peak amplitude for a click at `gain` (clamped to 0.0-1.0, NaN is silent).
    pub fn amplitude(&self, gain: f32) -> f32 {
        if gain.is_nan() {
            return 0.0;
        }
        gain.clamp(0.0, 1.0) * self.gain_multiplier
    }
}

/// One click, resolved to frequency and peak amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickRequest {
    pub frequency_hz: f32,
    pub amplitude: f32,
}

impl ClickRequest {
    pub fn new(role: ClickRole, gain: f32) -> Self {
        let timbre = role.timbre();
        Self {
            frequency_hz: timbre.frequency_hz,
            amplitude: timbre.amplitude(gain),
        }
    }
}

/// Destination for clicks.
///
/// Fire-and-forget: implementations must never block or panic. A sink with
/// no working device simply drops the click.
pub trait ClickSink {
    fn emit_click(&mut self, role: ClickRole, gain: f32);
}

/// Sink used when no audio output exists. Every click is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl ClickSink for SilentSink {
    fn emit_click(&mut self, _role: ClickRole, _gain: f32) {}
}

impl ClickSink for Producer<ClickRequest> {
    fn emit_click(&mut self, role: ClickRole, gain: f32) {
        if self.push(ClickRequest::new(role, gain)).is_err() {
            trace!("click ring full, dropping click");
        }
    }
}

/// Sink that keeps every click it receives. Handy for driving the
/// scheduler without hardware.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    clicks: Vec<ClickRequest>,
    activations: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> &[ClickRequest] {
        &self.clicks
    }

    /// Number of times the sink was activated as an output device.
    pub fn activations(&self) -> usize {
        self.activations
    }

    pub(crate) fn record_activation(&mut self) -> usize {
        self.activations += 1;
        self.activations
    }
}

impl ClickSink for RecordingSink {
    fn emit_click(&mut self, role: ClickRole, gain: f32) {
        self.clicks.push(ClickRequest::new(role, gain));
    }
}
