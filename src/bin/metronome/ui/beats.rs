//! Beat row: one cell per beat of the bar

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::MetronomeView;

pub fn render_beats(frame: &mut Frame, area: Rect, view: &MetronomeView) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, view.accents.len() as u32);
            view.accents.len()
        ])
        .split(area);

    for (index, (&accented, &cell)) in view.accents.iter().zip(cells.iter()).enumerate() {
        let current = view.current == Some(index);
        let label = if accented {
            format!("{}>", index + 1)
        } else {
            format!("{}", index + 1)
        };

        let style = match (current, view.flashing, accented) {
            (true, true, true) => Style::default().fg(Color::Black).bg(Color::Red),
            (true, true, false) => Style::default().fg(Color::Black).bg(Color::Green),
            (true, false, _) => Style::default().fg(Color::Green),
            (false, _, true) => Style::default().fg(Color::Red),
            (false, _, false) => Style::default().fg(Color::DarkGray),
        };
        let border = if current {
            style.add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let beat = Paragraph::new(label)
            .style(style)
            .centered()
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(beat, cell);
    }
}
