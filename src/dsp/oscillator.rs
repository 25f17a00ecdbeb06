use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/// Phase-accumulating sine oscillator.
///
/// Phase is kept normalized to `0.0..1.0` so long-running voices do not lose
/// precision as the accumulator grows.
pub struct OscillatorBlock {
    phase: f32,
}

impl OscillatorBlock {
    pub fn sine() -> Self {
        Self { phase: 0.0 }
    }

    /// Restart the waveform at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;
        for sample in out.iter_mut() {
            *sample = (TAU * self.phase).sin();
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }
}
