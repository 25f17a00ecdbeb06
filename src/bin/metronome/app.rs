//! Event loop: keys in, intents to the transport, frames out.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;

use saavy_metronome::{
    feedback::PulseFeedback,
    io::AudioOutput,
    sequencing::{Tempo, TimeSignature},
    Intent, MetronomeConfig, Transport,
};

use super::ui::{self, BeatDisplay, MetronomeView};

/// Upper bound on the wait between frames.
const REDRAW_PERIOD: Duration = Duration::from_millis(16);
const VOLUME_STEP: f32 = 0.1;

pub type MetronomeTransport = Transport<AudioOutput, (BeatDisplay, PulseFeedback)>;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    Intent(Intent),
    Quit,
}

pub struct App {
    transport: MetronomeTransport,
    should_quit: bool,
}

impl App {
    pub fn new(config: &MetronomeConfig, output: AudioOutput, feedback: PulseFeedback) -> Self {
        Self {
            transport: Transport::from_config(config, output, (BeatDisplay::new(), feedback)),
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        info!(tempo = self.transport.scheduler().tempo().bpm(), "metronome ready");

        while !self.should_quit {
            let now = Instant::now();
            self.transport.poll(now);

            let view = MetronomeView::capture(&self.transport, now);
            terminal.draw(|frame| ui::render(frame, &view))?;

            // Wake for whichever comes first: a key, the next beat, or a redraw
            let timeout = wait_timeout(self.transport.next_deadline(), Instant::now());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, Instant::now());
                    }
                }
            }
        }

        if self.transport.scheduler().is_running() {
            self.transport.toggle(Instant::now());
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, now: Instant) {
        let scheduler = self.transport.scheduler();
        match key_action(code, scheduler.signature(), scheduler.volume()) {
            Some(KeyAction::Quit) => self.should_quit = true,
            Some(KeyAction::Intent(intent)) => self.transport.apply(intent, now),
            None => {}
        }
    }
}

fn wait_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(now).min(REDRAW_PERIOD),
        None => REDRAW_PERIOD,
    }
}

fn key_action(code: KeyCode, signature: TimeSignature, volume: f32) -> Option<KeyAction> {
    let intent = match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char(' ') => Intent::ToggleRun,
        KeyCode::Up => Intent::NudgeTempo(1),
        KeyCode::Down => Intent::NudgeTempo(-1),
        KeyCode::Right => Intent::NudgeTempo(10),
        KeyCode::Left => Intent::NudgeTempo(-10),
        KeyCode::Char('t') | KeyCode::Char('T') => Intent::Tap,
        KeyCode::Char('l') | KeyCode::Char('L') => Intent::ToggleTapLock,
        KeyCode::Char('s') | KeyCode::Char('S') => {
            Intent::SetTimeSignature(signature.next_preset())
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::SetTempo(Tempo::DEFAULT),
        KeyCode::Char('+') | KeyCode::Char('=') => Intent::SetVolume(volume + VOLUME_STEP),
        KeyCode::Char('-') => Intent::SetVolume(volume - VOLUME_STEP),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as u8 - b'1') as usize;
            if index >= signature.beats() {
                return None;
            }
            Intent::ToggleAccent(index)
        }
        _ => return None,
    };
    Some(KeyAction::Intent(intent))
}
