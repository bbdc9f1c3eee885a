//! Shared state types for UI communication
//!
//! Static stream info is built once at startup. The per-buffer pool state
//! arrives as a `PoolSnapshot`, which is `Copy` so the audio thread never
//! allocates to publish it.

use keysynth::synth::PoolSnapshot;

use crate::input::InputMode;

/// Facts about the running stream, fixed for the whole session
#[derive(Clone, Debug)]
pub struct StreamInfo {
    /// Output device name
    pub device_name: String,
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Frames per callback
    pub block_size: usize,
    /// Output channel count
    pub channels: u16,
    /// How key releases are detected
    pub input_mode: InputMode,
}

/// Latest state received from the audio thread
#[derive(Clone, Copy, Debug, Default)]
pub struct UiState {
    pub pool: PoolSnapshot,
}

impl StreamInfo {
    /// Seconds of audio represented by `clock` samples
    pub fn seconds(&self, clock: u64) -> f64 {
        clock as f64 / self.sample_rate.max(1) as f64
    }
}
