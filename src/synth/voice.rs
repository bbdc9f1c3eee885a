use crate::dsp::{sine_at, GateEnvelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Closed, // Slot free for allocation
    Active,    // Key held, sustaining
    Releasing, // Key released, fading out
}

/// One slot of the voice pool.
///
/// A voice carries no oscillator phase or envelope accumulator: its output at
/// any clock value follows from the fields below.
#[derive(Debug, Clone, Copy, Default)]
pub struct Voice {
    open: bool,
    active: bool,
    base_freq: f64,
    press_timestamp: u64,
    release_timestamp: u64,
}

impl Voice {
    pub const fn closed() -> Self {
        Self {
            open: false,
            active: false,
            base_freq: 0.0,
            press_timestamp: 0,
            release_timestamp: 0,
        }
    }

    /// Open this slot for `freq`, pressed at `now`.
    pub fn open(&mut self, freq: f64, now: u64) {
        self.open = true;
        self.active = true;
        self.base_freq = freq;
        self.press_timestamp = now;
        self.release_timestamp = 0;
    }

    /// Re-arm an already open voice without moving it to another slot.
    pub fn retrigger(&mut self, now: u64) {
        self.active = true;
        self.press_timestamp = now;
    }

    /// Key up. Returns false if the voice was not held.
    pub fn release(&mut self, now: u64) -> bool {
        if self.open && self.active {
            self.active = false;
            self.release_timestamp = now;
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        *self = Self::closed();
    }

    /// Whether this open voice is sounding `freq`.
    #[inline]
    pub fn plays(&self, freq: f64) -> bool {
        self.open && self.base_freq == freq
    }

    /// Envelope level at absolute sample `t`, or `None` for a closed slot.
    #[inline]
    pub fn amplitude(&self, t: u64, env: &GateEnvelope) -> Option<f32> {
        if !self.open {
            return None;
        }
        let elapsed = t.saturating_sub(self.release_timestamp);
        Some(env.level(self.active, elapsed))
    }

    /// This voice's contribution at sample `t`.
    ///
    /// Closed slots contribute nothing. A released voice whose level has
    /// reached zero is closed here, which is the only way a slot is freed.
    #[inline]
    pub fn next_sample(&mut self, t: u64, env: &GateEnvelope, sample_rate: f64) -> f32 {
        let Some(amplitude) = self.amplitude(t, env) else {
            return 0.0;
        };
        if !self.active && amplitude <= 0.0 {
            self.close();
            return 0.0;
        }
        sine_at(t, self.base_freq, sample_rate) * amplitude
    }

    pub fn state(&self) -> VoiceState {
        match (self.open, self.active) {
            (false, _) => VoiceState::Closed,
            (true, true) => VoiceState::Active,
            (true, false) => VoiceState::Releasing,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_active(&self) -> bool {
        self.open && self.active
    }

    pub fn base_freq(&self) -> Option<f64> {
        self.open.then_some(self.base_freq)
    }

    pub fn press_timestamp(&self) -> Option<u64> {
        self.open.then_some(self.press_timestamp)
    }

    /// Clock value at key-up; only defined while releasing.
    pub fn release_timestamp(&self) -> Option<u64> {
        (self.open && !self.active).then_some(self.release_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_walks_the_states() {
        let env = GateEnvelope::default();
        let mut voice = Voice::closed();
        assert_eq!(voice.state(), VoiceState::Closed);
        assert_eq!(voice.amplitude(0, &env), None);

        voice.open(261.43, 10);
        assert_eq!(voice.state(), VoiceState::Active);
        assert_eq!(voice.press_timestamp(), Some(10));
        assert_eq!(voice.release_timestamp(), None);
        assert_eq!(voice.amplitude(50, &env), Some(0.5));

        assert!(voice.release(100));
        assert_eq!(voice.state(), VoiceState::Releasing);
        assert_eq!(voice.release_timestamp(), Some(100));
        assert_eq!(voice.amplitude(100, &env), Some(1.0));

        voice.close();
        assert_eq!(voice.state(), VoiceState::Closed);
        assert_eq!(voice.base_freq(), None);
    }

    #[test]
    fn second_release_keeps_first_timestamp() {
        let mut voice = Voice::closed();
        voice.open(440.0, 0);
        assert!(voice.release(64));
        assert!(!voice.release(128));
        assert_eq!(voice.release_timestamp(), Some(64));
    }

    #[test]
    fn silent_sustain_keeps_held_voice_open() {
        let env = GateEnvelope::new(0.0, 1.0, 5_000);
        let mut voice = Voice::closed();
        voice.open(261.43, 0);

        for t in 0..64 {
            assert_eq!(voice.next_sample(t, &env, 44_100.0), 0.0);
        }
        assert_eq!(voice.state(), VoiceState::Active);

        assert!(voice.release(64));
        voice.next_sample(64 + 5_000, &env, 44_100.0);
        assert_eq!(voice.state(), VoiceState::Closed);
    }

    #[test]
    fn closed_slot_never_matches() {
        let mut voice = Voice::closed();
        assert!(!voice.plays(0.0));
        voice.open(300.0, 0);
        assert!(voice.plays(300.0));
        voice.close();
        assert!(!voice.plays(300.0));
    }
}
