//! Transport - start/stop lifecycle around the beat scheduler and the audio
//! output device.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{
    config::MetronomeConfig,
    engine::{
        scheduler::{BeatListener, BeatScheduler},
        Intent,
    },
    io::{Activation, OutputDevice},
    sequencing::{TapTempo, Tempo, TimeSignature},
    tone::ClickSink,
};

/// Pause between opening the output device and the first click, giving the
/// device time to come up. Only paid on the first start of a session.
pub const DEFAULT_WARM_UP: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

/// Routes user intents to the scheduler and manages device activation.
pub struct Transport<D, L> {
    scheduler: BeatScheduler<D, L>,
    tap: TapTempo,
    warm_up: Duration,
    /// The output failed to activate; running without sound.
    silent: bool,
}

impl<D, L> Transport<D, L>
where
    D: ClickSink + OutputDevice,
    L: BeatListener,
{
    pub fn new(scheduler: BeatScheduler<D, L>) -> Self {
        Self {
            scheduler,
            tap: TapTempo::new(),
            warm_up: DEFAULT_WARM_UP,
            silent: false,
        }
    }

    /// Build the scheduler from a validated config.
    pub fn from_config(config: &MetronomeConfig, device: D, listener: L) -> Self {
        let scheduler = BeatScheduler::new(
            config.tempo,
            config.signature,
            config.accents.clone(),
            device,
            listener,
        )
        .with_volume(config.volume);
        Self::new(scheduler).with_warm_up(config.warm_up)
    }

    pub fn with_warm_up(mut self, warm_up: Duration) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Start if stopped, stop if running.
    ///
    /// Starting activates the output device first. The very first
    /// activation opens the device, and the first beat is held back by the
    /// warm-up delay; later starts click immediately. A device that cannot
    /// be opened is logged and the metronome runs silently.
    pub fn toggle(&mut self, now: Instant) -> TransportState {
        if self.scheduler.is_running() {
            self.scheduler.stop();
            info!("transport stopped");
            return TransportState::Stopped;
        }

        let delay = match self.scheduler.sink_mut().activate() {
            Ok(Activation::Opened) => self.warm_up,
            Ok(Activation::Resumed) => Duration::ZERO,
            Err(err) => {
                if !self.silent {
                    warn!(%err, "audio output unavailable, running without sound");
                    self.silent = true;
                }
                Duration::ZERO
            }
        };

        self.scheduler.reset_cursor();
        self.scheduler.start_after(now, delay);
        info!(tempo = self.scheduler.tempo().bpm(), ?delay, "transport started");
        TransportState::Running
    }

    /// Apply one user intent.
    pub fn apply(&mut self, intent: Intent, now: Instant) {
        debug!(?intent, "intent");
        match intent {
            Intent::SetTempo(tempo) => self.set_tempo(tempo, now),
            Intent::NudgeTempo(delta) => {
                let tempo = self.scheduler.tempo().saturating_add(delta);
                self.set_tempo(tempo, now);
            }
            Intent::SetTimeSignature(signature) => self.set_time_signature(signature, now),
            Intent::ToggleAccent(index) => self.scheduler.toggle_accent(index),
            Intent::Tap => {
                self.tap(now);
            }
            Intent::ToggleTapLock => {
                self.toggle_tap_lock();
            }
            Intent::ToggleRun => {
                self.toggle(now);
            }
            Intent::SetVolume(volume) => self.scheduler.set_volume(volume),
        }
    }

    pub fn set_tempo(&mut self, tempo: Tempo, now: Instant) {
        if tempo != self.scheduler.tempo() {
            self.scheduler.reconfigure_tempo(tempo, now);
        }
    }

    /// Switch meter, carrying the accent pattern over to the new beat count.
    pub fn set_time_signature(&mut self, signature: TimeSignature, now: Instant) {
        let accents = self.scheduler.accents().resized(signature.beats());
        self.scheduler.reconfigure_time_signature(signature, accents, now);
    }

    /// Register a tap and retune to the estimate, if there is one.
    pub fn tap(&mut self, now: Instant) -> Option<Tempo> {
        let tempo = self.tap.register_tap(now)?;
        self.set_tempo(tempo, now);
        Some(tempo)
    }

    /// Freeze or release tap tempo. Returns the new lock state.
    pub fn toggle_tap_lock(&mut self) -> bool {
        let locked = !self.tap.is_locked();
        if locked {
            self.tap.reset();
        }
        self.tap.set_locked(locked);
        debug!(locked, "tap tempo lock");
        locked
    }

    /// Drive the scheduler; call whenever the host loop wakes.
    pub fn poll(&mut self, now: Instant) -> usize {
        self.tap.expire(now);
        self.scheduler.poll(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Whether the output device could not be brought up.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn state(&self) -> TransportState {
        if self.scheduler.is_running() {
            TransportState::Running
        } else {
            TransportState::Stopped
        }
    }

    pub fn scheduler(&self) -> &BeatScheduler<D, L> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut BeatScheduler<D, L> {
        &mut self.scheduler
    }

    pub fn tap_tempo(&self) -> &TapTempo {
        &self.tap
    }

    pub fn tap_tempo_mut(&mut self) -> &mut TapTempo {
        &mut self.tap
    }
}
