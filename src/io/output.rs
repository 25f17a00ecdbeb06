//! cpal-backed audio output.
//!
//! The device is opened lazily on the first [`OutputDevice::activate`] and
//! kept for the rest of the session; it is released when the
//! [`AudioOutput`] is dropped. Clicks travel from the control thread to the
//! audio callback through an rtrb ring, so `emit_click` never blocks.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};
use tracing::{debug, error, info};

use crate::{
    error::AudioError,
    io::{Activation, OutputDevice},
    tone::{ClickMixer, ClickRequest, ClickRole, ClickSink},
    MAX_BLOCK_SIZE,
};

/// Pending clicks between the control thread and the audio callback.
const CLICK_QUEUE_SIZE: usize = 64;

enum DeviceState {
    Closed,
    Open(OpenOutput),
    Unavailable,
}

struct OpenOutput {
    stream: cpal::Stream,
    tx: Producer<ClickRequest>,
    sample_rate: f32,
    channels: usize,
}

/// Process-wide audio output handle.
pub struct AudioOutput {
    state: DeviceState,
}

impl AudioOutput {
    /// A handle that will open the default output device on first activation.
    pub fn new() -> Self {
        Self {
            state: DeviceState::Closed,
        }
    }

    /// A handle that never opens a device; every click is dropped.
    pub fn disabled() -> Self {
        Self {
            state: DeviceState::Unavailable,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DeviceState::Open(_))
    }

    /// Sample rate and channel count of the open stream.
    pub fn stream_format(&self) -> Option<(f32, usize)> {
        match &self.state {
            DeviceState::Open(output) => Some((output.sample_rate, output.channels)),
            _ => None,
        }
    }

    fn open() -> Result<OpenOutput, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::<ClickRequest>::new(CLICK_QUEUE_SIZE);
        let mut mixer = ClickMixer::new(sample_rate, rx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_remaining = total_frames - frames_written;
                    let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    mixer.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels,
            "audio output opened"
        );
        Ok(OpenOutput {
            stream,
            tx,
            sample_rate,
            channels,
        })
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDevice for AudioOutput {
    fn activate(&mut self) -> Result<Activation, AudioError> {
        match &self.state {
            DeviceState::Open(output) => {
                output.stream.play()?;
                debug!("audio output resumed");
                Ok(Activation::Resumed)
            }
            DeviceState::Unavailable => Err(AudioError::Unavailable),
            DeviceState::Closed => match Self::open() {
                Ok(output) => {
                    self.state = DeviceState::Open(output);
                    Ok(Activation::Opened)
                }
                Err(err) => {
                    self.state = DeviceState::Unavailable;
                    Err(err)
                }
            },
        }
    }
}

impl ClickSink for AudioOutput {
    fn emit_click(&mut self, role: ClickRole, gain: f32) {
        if let DeviceState::Open(output) = &mut self.state {
            output.tx.emit_click(role, gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_output_is_a_silent_no_op() {
        let mut output = AudioOutput::disabled();
        output.emit_click(ClickRole::Accent, 1.0);
        assert!(matches!(output.activate(), Err(AudioError::Unavailable)));
        assert!(!output.is_open());
        assert_eq!(output.stream_format(), None);
    }

    #[test]
    fn closed_output_drops_clicks() {
        let mut output = AudioOutput::new();
        output.emit_click(ClickRole::Regular, 0.5);
        assert!(!output.is_open());
    }
}
