//! External interfaces: the audio output device.

pub mod output;

pub use output::AudioOutput;

use crate::{error::AudioError, tone::{RecordingSink, SilentSink}};

/// Result of bringing the output device up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The device was opened for the first time this session.
    Opened,
    /// The device was already open and is running again.
    Resumed,
}

/// An output that must be activated before it can sound.
pub trait OutputDevice {
    fn activate(&mut self) -> Result<Activation, AudioError>;
}

/// Nothing to open; always ready.
impl OutputDevice for SilentSink {
    fn activate(&mut self) -> Result<Activation, AudioError> {
        Ok(Activation::Resumed)
    }
}

/// Behaves like a real device: opened once, resumed afterwards.
impl OutputDevice for RecordingSink {
    fn activate(&mut self) -> Result<Activation, AudioError> {
        if self.record_activation() == 1 {
            Ok(Activation::Opened)
        } else {
            Ok(Activation::Resumed)
        }
    }
}
