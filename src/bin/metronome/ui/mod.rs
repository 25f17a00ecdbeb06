//! TUI module for metronome
//!
//! Layout: transport bar, beat row, help bar.

mod beats;
pub mod state;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use state::{BeatDisplay, MetronomeView};

use beats::render_beats;
use transport::render_transport;

const HELP: &str =
    " [Space] Start/Stop  [↑↓] ±1  [←→] ±10  [T] Tap  [L] Lock  [S] Meter  [1-9] Accent  [+/-] Vol  [R] 120  [Q] Quit";

/// Render one frame
pub fn render(frame: &mut Frame, view: &MetronomeView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(3),    // Beats
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], view);
    render_beats(frame, chunks[1], view);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
