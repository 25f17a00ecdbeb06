//! Musical data model: tempo, meter, accents and tap tempo.

pub mod accent;
pub mod tap_tempo;
pub mod tempo;
pub mod time_signature;

pub use accent::AccentPattern;
pub use tap_tempo::TapTempo;
pub use tempo::Tempo;
pub use time_signature::{BeatUnit, TimeSignature};
