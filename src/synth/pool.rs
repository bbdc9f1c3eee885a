use crate::{
    config::{ClipMode, SynthConfig},
    dsp::GateEnvelope,
    synth::voice::{Voice, VoiceState},
    MAX_VOICES,
};

/// What a note-on did to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOnOutcome {
    /// An open voice already had this frequency and was re-armed.
    Retriggered(usize),
    /// A closed slot was opened.
    Allocated(usize),
    /// Every slot holds a different frequency; the note was ignored.
    Dropped,
}

/// Fixed arena of voices plus the sample clock that drives them.
///
/// The pool never grows, never steals, and never allocates after
/// construction. Slots are found by linear scan in index order.
pub struct VoicePool {
    voices: [Voice; MAX_VOICES],
    clock: u64,
    sample_rate: f64,
    envelope: GateEnvelope,
    clip: ClipMode,
}

impl VoicePool {
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            voices: [Voice::closed(); MAX_VOICES],
            clock: 0,
            sample_rate: config.sample_rate as f64,
            envelope: GateEnvelope::from_config(config),
            clip: config.clip,
        }
    }

    /// Press a note.
    ///
    /// A frequency that is already open re-triggers its own slot, so one
    /// pitch only ever owns one voice. Otherwise the first closed slot is
    /// taken. With no match and no free slot the note is dropped.
    pub fn note_on(&mut self, freq: f64) -> NoteOnOutcome {
        if !(freq.is_finite() && freq > 0.0) {
            return NoteOnOutcome::Dropped;
        }

        let now = self.clock;

        if let Some(idx) = self.voices.iter().position(|v| v.plays(freq)) {
            self.voices[idx].retrigger(now);
            return NoteOnOutcome::Retriggered(idx);
        }

        if let Some(idx) = self.voices.iter().position(|v| !v.is_open()) {
            self.voices[idx].open(freq, now);
            return NoteOnOutcome::Allocated(idx);
        }

        NoteOnOutcome::Dropped
    }

    /// Release every held voice playing `freq`. Returns how many were released.
    pub fn note_off(&mut self, freq: f64) -> usize {
        let now = self.clock;
        self.voices
            .iter_mut()
            .filter(|v| v.plays(freq))
            .map(|v| v.release(now))
            .filter(|&released| released)
            .count()
    }

    /// Release every held voice.
    pub fn all_notes_off(&mut self) -> usize {
        let now = self.clock;
        self.voices
            .iter_mut()
            .map(|v| v.release(now))
            .filter(|&released| released)
            .count()
    }

    /// Render `out.len()` frames and advance the clock by the same amount.
    ///
    /// Realtime-safe: no allocation, no locking, no error path. Every frame
    /// of the call is timed from the clock value at entry.
    pub fn render(&mut self, out: &mut [f32]) {
        let start = self.clock;

        for (offset, sample) in out.iter_mut().enumerate() {
            let t = start + offset as u64;
            let mut mix = 0.0f32;

            for voice in self.voices.iter_mut() {
                mix += voice.next_sample(t, &self.envelope, self.sample_rate);
            }

            *sample = self.clip.apply(mix);
        }

        self.clock = self.clock.wrapping_add(out.len() as u64);
    }

    /// Current sample clock.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn voices(&self) -> &[Voice; MAX_VOICES] {
        &self.voices
    }

    pub fn voice(&self, slot: usize) -> Option<&Voice> {
        self.voices.get(slot)
    }

    /// Number of open slots (sustaining or releasing).
    pub fn open_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_open()).count()
    }

    pub fn is_silent(&self) -> bool {
        self.open_count() == 0
    }

    /// Slot currently sounding `freq`, if any.
    pub fn slot_for(&self, freq: f64) -> Option<usize> {
        self.voices.iter().position(|v| v.plays(freq))
    }

    pub fn state(&self, slot: usize) -> VoiceState {
        self.voices
            .get(slot)
            .map(Voice::state)
            .unwrap_or(VoiceState::Closed)
    }

    /// Envelope level of `slot` at the current clock.
    pub fn amplitude(&self, slot: usize) -> Option<f32> {
        self.voices
            .get(slot)
            .and_then(|v| v.amplitude(self.clock, &self.envelope))
    }

    pub fn envelope(&self) -> &GateEnvelope {
        &self.envelope
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
