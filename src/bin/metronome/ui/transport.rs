//! Transport bar widget - shows BPM, meter, play state, volume and device

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_metronome::TransportState;

use super::MetronomeView;

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, view: &MetronomeView) {
    let block = Block::default().title(" metronome ").borders(Borders::ALL);

    let running = view.state == TransportState::Running;
    let play_symbol = if running { "▶" } else { "⏸" };
    let play_state_str = if running { "Running" } else { "Stopped" };

    let device = match view.audio {
        Some((sample_rate, channels)) => format!("{:.1}kHz {}ch", sample_rate / 1000.0, channels),
        None => "no audio".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            format!("{} BPM  ", view.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            if view.signature.is_compound() {
                format!("{} (compound)  ", view.signature)
            } else {
                format!("{}  ", view.signature)
            },
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state_str),
            Style::default().fg(if running { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!("Vol {:>3.0}%  ", view.volume * 100.0),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(device, Style::default().fg(Color::DarkGray)),
    ];
    if view.taps_locked {
        spans.push(Span::styled("  tap locked", Style::default().fg(Color::Red)));
    } else if view.taps > 0 {
        spans.push(Span::styled(
            format!("  tap {}", view.taps),
            Style::default().fg(Color::LightBlue),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
