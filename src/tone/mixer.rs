use rtrb::Consumer;
use tracing::trace;

use crate::{
    graph::node::{GraphNode, RenderCtx},
    tone::ClickRequest,
    voices::{self, ClickNode},
    MAX_BLOCK_SIZE,
};

/// Upper bound on clicks sounding at once. The fastest tempo ticks every
/// 75ms, longer than a 51ms click, so steady playback keeps one voice alive;
/// the cap bounds bursts of queued requests.
pub const MAX_LIVE_CLICKS: usize = 32;

/// A single click in flight. Created per request, dropped when silent.
pub struct ClickVoice {
    node: ClickNode,
    ctx: RenderCtx,
}

impl ClickVoice {
    pub fn new(request: ClickRequest, sample_rate: f32) -> Self {
        let ctx = RenderCtx::from_freq(sample_rate, request.frequency_hz, request.amplitude);
        let mut node = voices::click();
        node.note_on(&ctx);
        Self { node, ctx }
    }

    pub fn render(&mut self, out: &mut [f32]) {
        self.node.render_block(out, &self.ctx);
    }

    pub fn is_active(&self) -> bool {
        self.node.is_active()
    }

    /// Current envelope level, 0.0 once the click has died away.
    pub fn level(&self) -> f32 {
        self.node.get_envelope_level().unwrap_or(0.0)
    }
}

/// Audio-thread side of the tone generator.
///
/// Drains click requests, starts one fresh voice per request and sums all
/// live voices. Voices never steal from or retrigger each other.
pub struct ClickMixer {
    rx: Consumer<ClickRequest>,
    voices: Vec<ClickVoice>,
    temp_buffer: Vec<f32>,
    sample_rate: f32,
    dropped: u64,
}

impl ClickMixer {
    pub fn new(sample_rate: f32, rx: Consumer<ClickRequest>) -> Self {
        Self {
            rx,
            voices: Vec::with_capacity(MAX_LIVE_CLICKS),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate,
            dropped: 0,
        }
    }

    /// Render one block (at most `MAX_BLOCK_SIZE` frames) of mono output.
    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        while let Ok(request) = self.rx.pop() {
            if self.voices.len() < MAX_LIVE_CLICKS {
                self.voices.push(ClickVoice::new(request, self.sample_rate));
            } else {
                self.dropped += 1;
                trace!(dropped = self.dropped, "click voice limit reached");
            }
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            let scratch = &mut self.temp_buffer[..out.len()];
            scratch.fill(0.0);
            voice.render(scratch);

            for (o, v) in out.iter_mut().zip(scratch.iter()) {
                *o += v;
            }
        }

        self.voices.retain(ClickVoice::is_active);
    }

    /// Number of clicks currently sounding.
    pub fn live_voices(&self) -> usize {
        self.voices.len()
    }

    /// Requests discarded because `MAX_LIVE_CLICKS` were already sounding.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
