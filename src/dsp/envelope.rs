use crate::config::SynthConfig;

/*
Gate Envelope
=============

The amplitude shape for every voice. There are only two stages and no
attack or decay:

  Level
  peak ┐          ╲
       │           ╲
  S    ├──────────┐ ╲
       │          │  ╲
   0.0 └──────────┴───╲──→ Time
        key held   │   R samples
                key up

  held       level = S (sustain level, 0.5 by default)
  released   level = peak · (R - elapsed) / R

`elapsed` counts samples since key-up, so the first released sample sits at
`peak` and sample `R` lands exactly on 0.0. The voice is closed as soon as the
level is <= 0.0.

The default peak is 1.0, twice the sustain level, so every release starts
with a step up before it fades. That step is part of how the instrument has
always sounded. Set `release_peak` to the sustain level for a smooth fade.

Everything is computed from the integer sample distance, not accumulated per
sample, so a voice's level depends only on its timestamps and the clock.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateEnvelope {
    sustain_level: f32,
    release_peak: f32,
    release_samples: u64,
}

impl GateEnvelope {
    pub fn new(sustain_level: f32, release_peak: f32, release_samples: u64) -> Self {
        Self {
            sustain_level,
            release_peak,
            release_samples: release_samples.max(1),
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(
            config.sustain_level,
            config.release_peak,
            config.release_samples,
        )
    }

    /// Level while the key is held.
    #[inline]
    pub fn held_level(&self) -> f32 {
        self.sustain_level
    }

    /// Level `elapsed` samples after key-up. Never negative.
    #[inline]
    pub fn release_level(&self, elapsed: u64) -> f32 {
        let remaining = self.release_samples.saturating_sub(elapsed);
        self.release_peak * (remaining as f32 / self.release_samples as f32)
    }

    #[inline]
    pub fn level(&self, held: bool, elapsed: u64) -> f32 {
        if held {
            self.held_level()
        } else {
            self.release_level(elapsed)
        }
    }

    pub fn release_samples(&self) -> u64 {
        self.release_samples
    }
}

impl Default for GateEnvelope {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}
