use thiserror::Error;

/// Reasons a [`SynthConfig`](crate::config::SynthConfig) cannot drive the synth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
    #[error("block size must be between 1 and {max} frames, got {got}")]
    BlockSize { got: usize, max: usize },
    #[error("channel count must be non-zero")]
    ZeroChannels,
    #[error("release length must be at least one sample")]
    ZeroRelease,
    #[error("{name} must be a finite level in 0.0..=1.0, got {value}")]
    Level { name: &'static str, value: f32 },
    #[error("command queue needs room for at least one message")]
    ZeroQueue,
}
