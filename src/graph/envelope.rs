use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
};

/// Envelope node scaled to the voice's peak gain.
///
/// The underlying envelope is unit-height; this node multiplies it by
/// `ctx.gain`, so the ramp goes 0 → gain → 0.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    /// The 1ms attack / 50ms release click shape.
    pub fn click() -> Self {
        Self {
            env: Envelope::click(),
        }
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
        for sample in out.iter_mut() {
            *sample *= ctx.gain;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
