//! Low-level DSP primitives used by the graph nodes.
//!
//! These components are allocation-free and realtime-safe, so a click voice
//! can be created and dropped on the audio thread.

/// Attack/release click envelope.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::EnvelopeState;
