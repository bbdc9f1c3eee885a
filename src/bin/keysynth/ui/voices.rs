//! Voice slot table - one row per pool slot

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use keysynth::{keymap, synth::VoiceState};

use super::{StreamInfo, UiState};

const LEVEL_BAR_WIDTH: usize = 12;

fn level_bar(level: f32) -> String {
    let filled = (level.clamp(0.0, 1.0) * LEVEL_BAR_WIDTH as f32).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"·".repeat(LEVEL_BAR_WIDTH - filled));
    bar
}

pub fn render_voices(frame: &mut Frame, area: Rect, info: &StreamInfo, state: &UiState) {
    let header = Row::new(["#", "State", "Key", "Freq", "Level", "Age"])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let rows = state.pool.voices.iter().enumerate().map(|(slot, voice)| {
        let (label, color) = match voice.state {
            VoiceState::Closed => ("free", Color::DarkGray),
            VoiceState::Active => ("held", Color::Green),
            VoiceState::Releasing => ("release", Color::Yellow),
        };

        if voice.state == VoiceState::Closed {
            return Row::new([
                Cell::from(slot.to_string()),
                Cell::from(label),
                Cell::from(""),
                Cell::from(""),
                Cell::from(level_bar(0.0)),
                Cell::from(""),
            ])
            .style(Style::default().fg(color));
        }

        let key = keymap::symbol_for_frequency(voice.freq)
            .map(|k| k.to_string())
            .unwrap_or_else(|| String::from("?"));
        let age = info.seconds(state.pool.clock.saturating_sub(voice.press_timestamp));

        Row::new([
            Cell::from(slot.to_string()),
            Cell::from(label),
            Cell::from(key),
            Cell::from(format!("{:7.2} Hz", voice.freq)),
            Cell::from(level_bar(voice.amplitude)),
            Cell::from(format!("{age:.2}s")),
        ])
        .style(Style::default().fg(color))
    });

    let widths = [
        Constraint::Length(2),
        Constraint::Length(8),
        Constraint::Length(3),
        Constraint::Length(11),
        Constraint::Length(LEVEL_BAR_WIDTH as u16),
        Constraint::Min(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Voices ").borders(Borders::ALL));

    frame.render_widget(table, area);
}
