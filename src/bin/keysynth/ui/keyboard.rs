//! Keyboard legend - the playable keys laid out in table order, lit while sounding

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use keysynth::{
    keymap::{self, KEY_TABLE},
    synth::VoiceState,
};

use super::UiState;

/// Semitones that fall on black piano keys, counted from the first key
const BLACK_KEYS: [usize; 5] = [1, 3, 6, 8, 10];

/// `held` is what the input side believes is pressed; it can run a buffer
/// ahead of the pool snapshot, and is shown underlined.
pub fn render_keyboard(frame: &mut Frame, area: Rect, state: &UiState, held: &[char]) {
    let sounding = |index: usize| {
        let freq = keymap::frequency_at(index);
        state
            .pool
            .voices
            .iter()
            .find(|v| v.state != VoiceState::Closed && v.freq == freq)
            .map(|v| v.state)
    };

    let spans: Vec<Span> = KEY_TABLE
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let black = BLACK_KEYS.contains(&(i % 12));
            let base = if black {
                Style::default().fg(Color::Gray).bg(Color::Black)
            } else {
                Style::default().fg(Color::Black).bg(Color::Gray)
            };
            let mut style = match sounding(i) {
                Some(VoiceState::Active) => base.bg(Color::Green).add_modifier(Modifier::BOLD),
                Some(VoiceState::Releasing) => base.bg(Color::Yellow),
                _ => base,
            };
            if held.contains(key) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Span::styled(format!(" {key} "), style)
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Keys ").borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
