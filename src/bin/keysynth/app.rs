//! KeySynth - application builder and runner

use std::io::{self, stdout};
use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use rtrb::RingBuffer;

use keysynth::{
    synth::{PolySynth, PoolSnapshot},
    SynthConfig,
};

use crate::audio::{self, AudioTaps};
use crate::input::{InputMode, KeyInput};
use crate::ui::{StreamInfo, UiApp, VIS_BUFFER_SIZE};

/// Capacity of the audio → UI sample ring, in visualization windows
const AUDIO_RING_WINDOWS: usize = 4;
const SNAPSHOT_RING_SIZE: usize = 64;
/// Longer than the usual OS key-repeat delay, so a held key's first
/// auto-repeat lands before its gate closes
const DEFAULT_GATE: Duration = Duration::from_millis(600);

/// Main application builder
pub struct KeySynth {
    config: SynthConfig,
    gate: Duration,
}

impl KeySynth {
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
            gate: DEFAULT_GATE,
        }
    }

    pub fn config(mut self, config: SynthConfig) -> Self {
        self.config = config;
        self
    }

    /// Note length used when the terminal cannot report key releases
    pub fn gate_time(mut self, gate: Duration) -> Self {
        self.gate = gate;
        self
    }

    /// Open the audio device, take over the terminal, and play until quit
    pub fn run(self) -> EyreResult<()> {
        let (synth, handle) =
            PolySynth::new(self.config.clone()).wrap_err("invalid synth configuration")?;

        let (scope_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_WINDOWS);
        let (snapshot_tx, snapshot_rx) = RingBuffer::<PoolSnapshot>::new(SNAPSHOT_RING_SIZE);

        let output = audio::start(
            synth,
            &self.config,
            AudioTaps {
                scope_tx,
                snapshot_tx,
            },
        )?;

        let mut terminal = ratatui::init();

        let enhanced = enable_key_releases();
        let input_mode = if enhanced {
            InputMode::KeyRelease
        } else {
            log::warn!(
                "terminal does not report key releases, notes last {}ms",
                self.gate.as_millis()
            );
            InputMode::Gate(self.gate)
        };

        let info = StreamInfo {
            device_name: output.device_name.clone(),
            sample_rate: self.config.sample_rate,
            block_size: self.config.block_size,
            channels: self.config.channels,
            input_mode,
        };

        let mut app = UiApp::new(handle, KeyInput::new(input_mode), audio_rx, snapshot_rx, info);
        let res = app.run(&mut terminal);

        if enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        ratatui::restore();

        // Let held notes fade before the stream goes away
        let mut handle = app.into_handle();
        if handle.all_notes_off() {
            let release = self.config.release_samples as f64 / self.config.sample_rate as f64;
            std::thread::sleep(Duration::from_secs_f64(release.min(1.0)));
        }
        if let Err(e) = output.pause() {
            log::warn!("failed to pause audio stream: {e:?}");
        }
        drop(output);

        res
    }
}

/// Ask the terminal for key-up events. Any failure leaves the terminal as it
/// was and falls back to gated notes.
fn enable_key_releases() -> bool {
    try_key_releases(supports_keyboard_enhancement(), || {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
    })
}

fn try_key_releases(supported: io::Result<bool>, push: impl FnOnce() -> io::Result<()>) -> bool {
    if !supported.unwrap_or(false) {
        return false;
    }
    match push() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to enable key release reporting: {e}");
            false
        }
    }
}

impl Default for KeySynth {
    fn default() -> Self {
        Self::new()
    }
}
