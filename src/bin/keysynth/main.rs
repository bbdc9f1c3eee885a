//! keysynth - play the computer keyboard like a piano
//!
//! Run with: cargo run --release
//!
//! Environment:
//!   RUST_LOG          log filter (default: warn)
//!   KEYSYNTH_LOG      write the log to this file instead of stderr
//!   KEYSYNTH_GATE_MS  note length when the terminal cannot report key releases

mod app;
mod audio;
mod input;
mod ui;

use std::time::Duration;

use app::KeySynth;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use keysynth::SynthConfig;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut synth = KeySynth::new().config(SynthConfig::default());

    if let Ok(raw) = std::env::var("KEYSYNTH_GATE_MS") {
        let ms: u64 = raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("KEYSYNTH_GATE_MS must be milliseconds, got {raw:?}"))?;
        synth = synth.gate_time(Duration::from_millis(ms));
    }

    synth.run()
}

fn init_logging() -> EyreResult<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    // The TUI owns the terminal, so a log file keeps messages readable
    if let Some(path) = std::env::var_os("KEYSYNTH_LOG") {
        let file = std::fs::File::create(&path)
            .wrap_err_with(|| format!("failed to create log file {}", path.to_string_lossy()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
