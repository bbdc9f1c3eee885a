#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Commands sent from the input thread to the audio thread.
///
/// Frequencies travel as the exact `f64` produced by the key map, so the pool
/// can match a note-off to its note-on by equality.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { freq: f64 },
    NoteOff { freq: f64 },
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// A receiver that never has anything to say, for driving the pool offline.
impl MessageReceiver for () {
    fn pop(&mut self) -> Option<SynthMessage> {
        None
    }
}
