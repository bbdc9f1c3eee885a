//! Status bar widget - shows stream format, clock, voice count and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use keysynth::MAX_VOICES;

use super::{StreamInfo, UiState};
use crate::input::InputMode;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the status bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    info: &StreamInfo,
    state: &UiState,
    audio_stats: &AudioStats,
) {
    let block = Block::default()
        .title(" keysynth ")
        .borders(Borders::ALL);

    let open = state.pool.open_count();
    let sample_rate_khz = info.sample_rate as f32 / 1000.0;
    let input = match info.input_mode {
        InputMode::KeyRelease => String::from("key release"),
        InputMode::Gate(gate) => format!("gate {}ms", gate.as_millis()),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(
                " {:.1}kHz {}ch x{}  ",
                sample_rate_khz, info.channels, info.block_size
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Voices: {}/{}  ", open, MAX_VOICES),
            Style::default().fg(if open == MAX_VOICES {
                Color::Red
            } else if open > 0 {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("{:.2}s  ", info.seconds(state.pool.clock)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} samples  ", state.pool.clock),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}  ", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("[{}] {}", input, info.device_name),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
