//! Composable building blocks for constructing click voices.
//!
//! Graph nodes wrap the low-level DSP primitives with a trigger and
//! block-based rendering. The `extensions` module adds the fluent
//! `.amplify()` helper so voices read as a signal chain.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Envelope node scaled by the voice gain.
pub mod envelope;
/// Fluent combinators (`.amplify()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
