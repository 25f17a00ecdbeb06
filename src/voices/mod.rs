//! Pre-built voices for metronome clicks.
//!
//! A voice is a ready-to-use node graph. Its pitch and loudness come from the
//! `RenderCtx` it is rendered with, so one patch serves both click roles.
//!
//! # Example
//!
//! ```
//! use saavy_metronome::{graph::{GraphNode, RenderCtx}, voices};
//!
//! let mut click = voices::click();
//! let ctx = RenderCtx::from_freq(48_000.0, 1_200.0, 0.8);
//! click.note_on(&ctx);
//!
//! let mut block = [0.0f32; 64];
//! click.render_block(&mut block, &ctx);
//! assert!(click.is_active());
//! ```

mod click;

pub use click::{click, ClickNode};
