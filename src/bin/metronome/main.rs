//! metronome - terminal metronome
//!
//! Run with: cargo run -- --bpm 96 --signature 6/8

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::App;
use saavy_metronome::{
    feedback::{PulseFeedback, TerminalBell},
    io::AudioOutput,
    sequencing::TimeSignature,
    MetronomeConfig,
};

#[derive(Debug, Parser)]
#[command(name = "metronome", version, about = "Fixed-interval terminal metronome")]
struct Cli {
    /// Tempo in beats per minute (40-800)
    #[arg(long, default_value_t = 120)]
    bpm: u16,

    /// Time signature, e.g. 3/4, 6/8, or "-" for none
    #[arg(long, default_value = "4/4")]
    signature: TimeSignature,

    /// Click volume, 0.0-1.0
    #[arg(long, default_value_t = MetronomeConfig::DEFAULT_VOLUME)]
    volume: f32,

    /// Do not open an audio device
    #[arg(long)]
    silent: bool,

    /// Ring the terminal bell on every beat
    #[arg(long)]
    bell: bool,

    /// Write logs to this file (RUST_LOG filters, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> MetronomeConfig {
        MetronomeConfig::new()
            .bpm(self.bpm)
            .signature(self.signature)
            .volume(self.volume)
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.config();
    config.validate().wrap_err("invalid metronome settings")?;

    let output = if cli.silent {
        AudioOutput::disabled()
    } else {
        AudioOutput::new()
    };
    let feedback = if cli.bell {
        PulseFeedback::new(Box::new(TerminalBell::new(std::io::stdout())))
    } else {
        PulseFeedback::disabled()
    };

    let mut terminal = ratatui::init();
    let result = App::new(&config, output, feedback).run(&mut terminal);
    ratatui::restore();
    result
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
