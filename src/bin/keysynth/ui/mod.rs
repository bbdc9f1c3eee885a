//! TUI module for keysynth
//!
//! Turns key events into synth commands and shows what the voice pool is doing.

mod keyboard;
mod spectrum;
pub mod state;
mod transport;
mod voices;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event};
use keysynth::synth::{PoolSnapshot, SynthHandle};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

pub use state::{StreamInfo, UiState};

use crate::input::{InputAction, KeyInput};
use keyboard::render_keyboard;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use voices::render_voices;
use waveform::render_waveform;

/// Samples kept for the oscilloscope and spectrum
pub const VIS_BUFFER_SIZE: usize = 2048;

/// UI application state
pub struct UiApp {
    /// Command side of the synth
    synth: SynthHandle,
    /// Key event translation
    input: KeyInput,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for pool snapshots
    snapshot_rx: Consumer<PoolSnapshot>,
    info: StreamInfo,
    /// Latest received state
    current_state: UiState,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        synth: SynthHandle,
        input: KeyInput,
        audio_rx: Consumer<f32>,
        snapshot_rx: Consumer<PoolSnapshot>,
        info: StreamInfo,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, info.sample_rate as f64);
        Self {
            synth,
            input,
            audio_rx,
            snapshot_rx,
            info,
            current_state: UiState::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            should_quit: false,
        }
    }

    /// Run the UI event loop until Esc / Ctrl+C
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Drain every pending key event before the next frame (~60fps)
            let mut timeout = Duration::from_millis(16);
            while event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if self.input.handle(key, &mut self.synth, Instant::now()) == InputAction::Quit {
                        self.should_quit = true;
                    }
                }
                timeout = Duration::ZERO;
            }

            self.input.expire(&mut self.synth, Instant::now());
        }

        Ok(())
    }

    /// Hand the command side back for shutdown
    pub fn into_handle(self) -> SynthHandle {
        self.synth
    }

    /// Poll for new audio samples, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }
        let Ok(chunk) = self.audio_rx.read_chunk(available) else {
            return;
        };
        let (first, second) = chunk.as_slices();
        self.audio_buffer.extend_from_slice(first);
        self.audio_buffer.extend_from_slice(second);
        chunk.commit_all();

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        self.spectrum.update(&self.audio_buffer);
    }

    /// Keep only the latest snapshot
    fn poll_state(&mut self) {
        while let Ok(pool) = self.snapshot_rx.pop() {
            self.current_state.pool = pool;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(13), // Voices + spectrum
                Constraint::Min(6),     // Waveform
                Constraint::Length(4),  // Key legend
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, rows[0], &self.info, &self.current_state, &stats);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(52), Constraint::Min(20)])
            .split(rows[1]);
        render_voices(frame, middle[0], &self.info, &self.current_state);
        render_spectrum(frame, middle[1], self.spectrum.data());

        render_waveform(frame, rows[2], &self.audio_buffer);
        let held: Vec<char> = self.input.held().collect();
        render_keyboard(frame, rows[3], &self.current_state, &held);

        let help = Paragraph::new(" Play with q2w3e... and <azsxd...  [Space] All notes off  [Esc] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[4]);
    }
}
