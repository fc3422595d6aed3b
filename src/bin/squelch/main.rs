//! squelch - terminal acid bass box
//!
//! Run with: cargo run -- --bpm 128 --log-file squelch.log

mod app;
mod patterns;
mod rig;
mod ui;

use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use squelch::KnobMode;

/// Monophonic bass voice with a step sequencer, played from the keyboard
#[derive(Parser, Debug)]
#[command(name = "squelch")]
#[command(version)]
struct Cli {
    /// Tempo in beats per minute
    #[arg(long, default_value_t = 120.0)]
    bpm: f32,

    /// Sequencer steps per beat
    #[arg(long, default_value_t = 4)]
    steps_per_beat: u32,

    /// Pattern to start on (wraps)
    #[arg(short, long, default_value_t = 0)]
    pattern: usize,

    /// How knobs take over a parameter after switching knob-sets
    #[arg(long, default_value = "pickup")]
    knob_mode: KnobModeArg,

    /// Write trace output here (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum KnobModeArg {
    Pickup,
    Scale,
}

impl From<KnobModeArg> for KnobMode {
    fn from(arg: KnobModeArg) -> Self {
        match arg {
            KnobModeArg::Pickup => KnobMode::Pickup,
            KnobModeArg::Scale => KnobMode::Scale,
        }
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("squelch=debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    app::Squelch::new()
        .bpm(cli.bpm)
        .steps_per_beat(cli.steps_per_beat)
        .pattern(cli.pattern)
        .knob_mode(cli.knob_mode.into())
        .run()
}
