//! Best-effort beat actuators (flash, vibration, bell).
//!
//! These mirror the beat on some physical device. They are optional: a
//! missing actuator leaves the feature off, and the first failure switches
//! it off for the rest of the session. Neither case touches audio or beat
//! timing.

use std::{io::Write, time::Duration};

use tracing::{debug, warn};

use crate::{
    engine::{Beat, BeatListener},
    error::FeedbackError,
};

/// Pulse length on accented beats.
pub const ACCENT_PULSE: Duration = Duration::from_millis(100);
/// Pulse length on plain beats.
pub const REGULAR_PULSE: Duration = Duration::from_millis(50);

/// A binary output that can be switched on for a bounded time.
pub trait Actuator {
    fn name(&self) -> &'static str;

    /// Fire one pulse. Must return promptly; the pulse ends on its own.
    fn pulse(&mut self, duration: Duration) -> Result<(), FeedbackError>;
}

/// Terminal bell: writes BEL to the wrapped writer on every pulse.
pub struct TerminalBell<W> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Actuator for TerminalBell<W> {
    fn name(&self) -> &'static str {
        "terminal bell"
    }

    fn pulse(&mut self, _duration: Duration) -> Result<(), FeedbackError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Beat listener that pulses an actuator while the feature is enabled.
pub struct PulseFeedback {
    actuator: Option<Box<dyn Actuator>>,
    enabled: bool,
}

impl PulseFeedback {
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self {
            actuator: Some(actuator),
            enabled: true,
        }
    }

    /// No actuator: the feature is off.
    pub fn disabled() -> Self {
        Self {
            actuator: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the feature on or off. Has no effect without an actuator.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.actuator.is_some();
    }
}

impl BeatListener for PulseFeedback {
    fn on_beat(&mut self, beat: Beat) {
        if !self.enabled {
            return;
        }
        let Some(actuator) = self.actuator.as_mut() else {
            return;
        };

        let duration = if beat.accented {
            ACCENT_PULSE
        } else {
            REGULAR_PULSE
        };
        if let Err(err) = actuator.pulse(duration) {
            warn!(actuator = actuator.name(), %err, "beat actuator failed, disabling it");
            self.enabled = false;
        } else {
            debug!(actuator = actuator.name(), ?duration, "pulse");
        }
    }
}
