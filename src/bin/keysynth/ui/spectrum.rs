//! Spectrum widget
//!
//! FFT of the latest output window, sampled at log-spaced frequencies that
//! cover the keyboard's range. The x axis is in octaves above the first key,
//! so each held note shows up as a peak at its table position / 12.

use std::sync::Arc;

use keysynth::keymap::{frequency_at, KEY_TABLE, REFERENCE_FREQ};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Points plotted across the keyboard range
const SPECTRUM_POINTS: usize = 96;
/// Octaves shown below the first key and above the last
const MARGIN_OCTAVES: f64 = 0.5;
const FLOOR_DB: f64 = -80.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    /// Hann window coefficients
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each plotted point
    bins: Vec<usize>,
    /// (octaves above the first key, level in dB)
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(window_len: usize, sample_rate: f64) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(window_len);

        let denom = window_len.saturating_sub(1).max(1) as f32;
        let window = (0..window_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let (low, high) = Self::octave_range();
        let nyquist_bin = (window_len / 2).saturating_sub(1);
        let mut bins = Vec::with_capacity(SPECTRUM_POINTS);
        let mut points = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let octave = low + (high - low) * i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = REFERENCE_FREQ * octave.exp2();
            let bin = (freq * window_len as f64 / sample_rate).round() as usize;
            bins.push(bin.min(nyquist_bin));
            points.push((octave, FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); window_len],
            bins,
            points,
        }
    }

    /// Octave span covered by the plot, relative to the first key
    pub fn octave_range() -> (f64, f64) {
        let top = (frequency_at(KEY_TABLE.len() - 1) / REFERENCE_FREQ).log2();
        (-MARGIN_OCTAVES, top + MARGIN_OCTAVES)
    }

    /// Recompute from a full window of samples; other lengths are ignored.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Hann window has a coherent gain of 0.5
        let norm = 2.0 / (0.5 * self.window.len() as f32);
        for (point, &idx) in self.points.iter_mut().zip(&self.bins) {
            let magnitude = (self.scratch[idx].norm() * norm).max(1e-6);
            point.1 = (20.0 * (magnitude as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// Render the spectrum widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (low, high) = SpectrumAnalyzer::octave_range();
    let octave_labels: Vec<Span> = [0usize, 12, 24, 35]
        .iter()
        .filter_map(|&i| KEY_TABLE.get(i))
        .map(|key| Span::raw(key.to_string()))
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([low, high])
                .labels(octave_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec![Span::raw("-80"), Span::raw("-40"), Span::raw("0")])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysynth::dsp::sine_at;

    #[test]
    fn pure_tone_peaks_near_its_octave() {
        let sample_rate = 44_100.0;
        let mut analyzer = SpectrumAnalyzer::new(4096, sample_rate);
        let freq = frequency_at(12);
        let samples: Vec<f32> = (0..4096)
            .map(|t| sine_at(t, freq, sample_rate) * 0.5)
            .collect();

        analyzer.update(&samples);

        let (octave, level) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, p| if p.1 > best.1 { p } else { best });
        assert!((octave - 1.0).abs() < 0.1, "peak at {octave} octaves");
        assert!(level > -12.0, "peak level {level} dB");
    }
}
