//! Display state for the UI.
//!
//! [`BeatDisplay`] rides along in the scheduler as a beat listener and
//! remembers the last sounded beat. [`MetronomeView`] is a plain snapshot
//! taken once per frame so the widgets never touch the transport.

use std::time::{Duration, Instant};

use saavy_metronome::{sequencing::TimeSignature, Beat, BeatListener, TransportState};

use crate::app::MetronomeTransport;

/// How long the sounded beat stays lit.
pub const FLASH: Duration = Duration::from_millis(80);

/// Beat listener that keeps what the beat row needs.
#[derive(Debug, Default)]
pub struct BeatDisplay {
    last: Option<(Beat, Instant)>,
}

impl BeatDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_beat(&self) -> Option<Beat> {
        self.last.map(|(beat, _)| beat)
    }

    /// Whether the last beat is still within its flash window.
    pub fn is_flashing(&self, now: Instant) -> bool {
        self.last
            .is_some_and(|(_, at)| now.saturating_duration_since(at) < FLASH)
    }

    fn record(&mut self, beat: Beat, at: Instant) {
        self.last = Some((beat, at));
    }
}

impl BeatListener for BeatDisplay {
    fn on_beat(&mut self, beat: Beat) {
        self.record(beat, Instant::now());
    }
}

/// Per-frame snapshot of everything drawn.
#[derive(Debug, Clone)]
pub struct MetronomeView {
    pub bpm: u16,
    pub signature: TimeSignature,
    pub state: TransportState,
    pub volume: f32,
    pub taps: usize,
    pub taps_locked: bool,
    pub accents: Vec<bool>,
    /// Beat currently sounding, if running
    pub current: Option<usize>,
    pub flashing: bool,
    /// (sample rate, channels) of the open device
    pub audio: Option<(f32, usize)>,
}

impl MetronomeView {
    pub fn capture(transport: &MetronomeTransport, now: Instant) -> Self {
        let scheduler = transport.scheduler();
        let (display, _) = scheduler.listener();
        let state = transport.state();
        let current = match state {
            TransportState::Running => display.last_beat().map(|beat| beat.index),
            TransportState::Stopped => None,
        };

        Self {
            bpm: scheduler.tempo().bpm(),
            signature: scheduler.signature(),
            state,
            volume: scheduler.volume(),
            taps: transport.tap_tempo().taps(),
            taps_locked: transport.tap_tempo().is_locked(),
            accents: scheduler.accents().as_slice().to_vec(),
            current,
            flashing: current.is_some() && display.is_flashing(now),
            audio: if transport.is_silent() {
                None
            } else {
                scheduler.sink().stream_format()
            },
        }
    }
}
