use rtrb::{Producer, PushError};

use crate::{keymap, synth::message::SynthMessage};

/// Input-side half of a [`PolySynth`](crate::synth::poly::PolySynth).
///
/// Lives on whatever thread handles key events. Every method is a single
/// non-blocking push into the command ring; nothing here touches voice state.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
}

impl SynthHandle {
    pub(crate) fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx }
    }

    /// Key pressed. Returns whether a note-on was queued.
    pub fn key_down(&mut self, symbol: char) -> bool {
        match keymap::frequency_for(symbol) {
            Some(freq) => self.note_on(freq),
            None => {
                log::trace!("key {symbol:?} is not mapped to a note");
                false
            }
        }
    }

    /// Key released. Returns whether a note-off was queued.
    pub fn key_up(&mut self, symbol: char) -> bool {
        match keymap::frequency_for(symbol) {
            Some(freq) => self.note_off(freq),
            None => false,
        }
    }

    pub fn note_on(&mut self, freq: f64) -> bool {
        self.send(SynthMessage::NoteOn { freq })
    }

    pub fn note_off(&mut self, freq: f64) -> bool {
        self.send(SynthMessage::NoteOff { freq })
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send(SynthMessage::AllNotesOff)
    }

    /// Free space left in the command ring.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(PushError::Full(msg)) => {
                log::warn!("command queue full, dropping {msg:?}");
                false
            }
        }
    }
}
