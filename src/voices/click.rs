//! Metronome click voice.
//!
//! A sine blip shaped by a 1ms attack and a 50ms linear release. The pitch
//! and peak level are taken from the render context, which the click mixer
//! fills in from the click's timbre.
//!
//! # How It Works
//!
//! 1. Sine oscillator at the timbre frequency (1200 Hz accent, 800 Hz regular)
//! 2. Envelope ramps 0 → gain in 1ms, then straight back to 0 over 50ms
//! 3. Voice reports inactive once the release lands on zero (~51ms)

use crate::graph::{amplify::Amplify, envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

/// Concrete node type of a click voice.
pub type ClickNode = Amplify<OscNode, EnvNode>;

/// Create a click voice.
pub fn click() -> ClickNode {
    OscNode::sine().amplify(EnvNode::click())
}
