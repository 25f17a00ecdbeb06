use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

The click's tone source. A sine is used because a metronome click should be
a clean, pitched blip: the two click roles are told apart by pitch
(1200 Hz accent, 800 Hz regular) and a pure tone keeps them distinct even
at low volume.

The oscillator follows `ctx.frequency`, which the click mixer sets from
the click's timbre.

Example usage:
  let osc = OscNode::sine(); // follows ctx.frequency

  // A click: sine shaped by the attack/release envelope
  let voice = OscNode::sine().amplify(EnvNode::click());
*/

pub struct OscNode {
    osc: OscillatorBlock,
}

impl OscNode {
    pub fn sine() -> Self {
        Self {
            osc: OscillatorBlock::sine(),
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Every click starts at a zero crossing
        self.osc.reset();
    }
}
