use crate::graph::node::{GraphNode, RenderCtx};

/// Modulator frames rendered per pass. Kept on the stack so a voice holds no
/// heap buffers and can be created on the audio thread.
const CHUNK: usize = 64;

pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self { signal, modulator }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        let mut gain = [0.0f32; CHUNK];
        for block in out.chunks_mut(CHUNK) {
            let frames = &mut gain[..block.len()];
            self.modulator.render_block(frames, ctx);

            for (o, g) in block.iter_mut().zip(frames.iter()) {
                *o *= *g;
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator.get_envelope_level()
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active()
    }
}
