//! Synth configuration.
//!
//! Every field has a default matching the classic instrument: 44.1 kHz mono,
//! 64-frame buffers, 0.5 sustain and a 5000-sample linear release that starts
//! from full level. Setters chain so a config reads like a patch:
//!
//! ```
//! use keysynth::config::{ClipMode, SynthConfig};
//!
//! let config = SynthConfig::default()
//!     .release_samples(8_000)
//!     .clip_mode(ClipMode::Symmetric);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, MAX_BLOCK_SIZE};

/// Output limiting applied to the summed mix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Clamp only the top at 1.0. Destructive interference between voices can
    /// still drive samples below -1.0.
    #[default]
    Upper,
    /// Clamp to -1.0..=1.0.
    Symmetric,
}

impl ClipMode {
    #[inline]
    pub fn apply(self, sample: f32) -> f32 {
        match self {
            ClipMode::Upper => sample.min(1.0),
            ClipMode::Symmetric => sample.clamp(-1.0, 1.0),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Frames per audio callback
    pub block_size: usize,
    /// Output channels; the mono mix is copied to each one
    pub channels: u16,
    /// Length of the linear release in samples
    pub release_samples: u64,
    /// Amplitude while a key is held
    pub sustain_level: f32,
    /// Amplitude at the first sample of the release ramp
    pub release_peak: f32,
    pub clip: ClipMode,
    /// Capacity of the input → audio command ring
    pub queue_capacity: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::SAMPLE_RATE,
            block_size: crate::BLOCK_SIZE,
            channels: 1,
            release_samples: crate::RELEASE_SAMPLES,
            sustain_level: crate::SUSTAIN_LEVEL,
            release_peak: 1.0,
            clip: ClipMode::Upper,
            queue_capacity: 256,
        }
    }
}

impl SynthConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn block_size(mut self, frames: usize) -> Self {
        self.block_size = frames;
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn release_samples(mut self, samples: u64) -> Self {
        self.release_samples = samples;
        self
    }

    pub fn sustain_level(mut self, level: f32) -> Self {
        self.sustain_level = level;
        self
    }

    /// Level the release ramp starts from.
    ///
    /// The default of 1.0 jumps up from the 0.5 sustain at key-up. Setting this
    /// to the sustain level gives a continuous fade instead.
    pub fn release_peak(mut self, level: f32) -> Self {
        self.release_peak = level;
        self
    }

    pub fn clip_mode(mut self, clip: ClipMode) -> Self {
        self.clip = clip;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Check that the config can drive the render path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::BlockSize {
                got: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.release_samples == 0 {
            return Err(ConfigError::ZeroRelease);
        }
        check_level("sustain level", self.sustain_level)?;
        check_level("release peak", self.release_peak)?;
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueue);
        }
        Ok(())
    }
}

fn check_level(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Level { name, value })
    }
}
