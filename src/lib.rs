pub mod config;
pub mod dsp;
pub mod error;
pub mod keymap; // Keyboard symbol → note frequency
pub mod synth; // Voice pool and realtime render path

pub use config::{ClipMode, SynthConfig};
pub use error::ConfigError;

/// Output sample rate the instrument is tuned for (Hz).
pub const SAMPLE_RATE: u32 = 44_100;
/// Frames per audio callback.
pub const BLOCK_SIZE: usize = 64;
/// Voices that can sound at once.
pub const MAX_VOICES: usize = 10;
/// Length of the linear release, in samples.
pub const RELEASE_SAMPLES: u64 = 5_000;
/// Amplitude of a held key.
pub const SUSTAIN_LEVEL: f32 = 0.5;

pub const MAX_BLOCK_SIZE: usize = 2048;
