//! Output oscilloscope with the clip ceiling drawn in
//!
//! The mix is only limited from above, so the trace can run below -1 while
//! the top flattens against the rail at 1.0.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

const CEILING: f64 = 1.0;
/// Lowest y bound the scope will stretch to
const MAX_DEPTH: f32 = -4.0;

/// Lower y bound: -1 unless the signal goes further down.
fn scope_floor(samples: &[f32]) -> f64 {
    samples
        .iter()
        .fold(-1.0f32, |acc, &x| acc.min(x))
        .max(MAX_DEPTH) as f64
}

/// Samples sitting on the ceiling.
fn clipped_count(samples: &[f32]) -> usize {
    samples.iter().filter(|&&s| s as f64 >= CEILING).count()
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let clipped = clipped_count(audio_buffer);
    let title = if clipped > 0 {
        format!(" Output  clipped {clipped} ")
    } else {
        " Output ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if clipped > 0 {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        });

    let len = audio_buffer.len().max(1) as f64;
    let trace: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect();
    let rail = [(0.0, CEILING), (1.0, CEILING)];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&rail),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&trace),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([scope_floor(audio_buffer), CEILING])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
