/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz)
/// - gain: Peak amplitude of the voice (0.0-1.0)
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub gain: f32,
}

impl RenderCtx {
    /// Create context from a direct frequency and peak gain.
    pub fn from_freq(sample_rate: f32, frequency: f32, gain: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            gain,
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes render audio block by block and respond to a trigger.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when the voice starts.
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Check if this node is still producing sound
    ///
    /// Used by the click mixer to know when a voice can be dropped.
    fn is_active(&self) -> bool {
        true
    }
}
