pub mod config;
pub mod dsp;
pub mod engine; // Beat scheduler and transport
pub mod error;
pub mod feedback;
pub mod graph; // Composable click voice nodes
pub mod io;
pub mod sequencing; // Tempo, meter, accents, tap tempo
pub mod tone; // Click synthesis and mixing
pub mod voices;

pub use config::MetronomeConfig;
pub use engine::{Beat, BeatListener, BeatScheduler, Intent, Transport, TransportState};
pub use error::{AudioError, ConfigError, FeedbackError};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
