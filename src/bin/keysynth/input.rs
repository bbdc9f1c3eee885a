//! Terminal key events → synth commands
//!
//! Terminals that speak the kitty keyboard protocol report real key releases.
//! Everything else only reports presses (plus auto-repeat presses while a key
//! is held), so in that mode each press opens a gate that closes after a fixed
//! time unless another press of the same key extends it.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keysynth::{keymap, synth::SynthHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Key-down and key-up both come from the terminal
    KeyRelease,
    /// Only presses are reported; notes end after the gate time
    Gate(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
}

pub struct KeyInput {
    mode: InputMode,
    /// Open gates: key and the instant its note-off is due
    gates: Vec<(char, Instant)>,
}

impl KeyInput {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            gates: Vec::with_capacity(keymap::KEY_TABLE.len()),
        }
    }

    /// Keys currently held down, as far as the input side knows.
    pub fn held(&self) -> impl Iterator<Item = char> + '_ {
        self.gates.iter().map(|&(key, _)| key)
    }

    pub fn handle(&mut self, key: KeyEvent, synth: &mut SynthHandle, now: Instant) -> InputAction {
        if key.kind == KeyEventKind::Repeat {
            return InputAction::None;
        }

        match key.code {
            KeyCode::Esc => return InputAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return InputAction::Quit
            }
            KeyCode::Char(' ') if key.kind == KeyEventKind::Press => {
                synth.all_notes_off();
                self.gates.clear();
            }
            KeyCode::Char(symbol) if keymap::note_index(symbol).is_some() => {
                match key.kind {
                    KeyEventKind::Press => self.press(symbol, synth, now),
                    KeyEventKind::Release => self.release(symbol, synth),
                    KeyEventKind::Repeat => {}
                }
            }
            _ => {}
        }

        InputAction::None
    }

    fn press(&mut self, symbol: char, synth: &mut SynthHandle, now: Instant) {
        let deadline = match self.mode {
            InputMode::KeyRelease => now,
            InputMode::Gate(gate) => now + gate,
        };

        if let Some(entry) = self.gates.iter_mut().find(|(key, _)| *key == symbol) {
            // Auto-repeat in gate mode: keep the note going
            entry.1 = deadline;
            if self.mode == InputMode::KeyRelease {
                synth.key_down(symbol);
            }
            return;
        }

        if synth.key_down(symbol) {
            self.gates.push((symbol, deadline));
        }
    }

    fn release(&mut self, symbol: char, synth: &mut SynthHandle) {
        self.gates.retain(|&(key, _)| key != symbol);
        synth.key_up(symbol);
    }

    /// Close gates whose time has run out. No-op with real key releases.
    pub fn expire(&mut self, synth: &mut SynthHandle, now: Instant) {
        if self.mode == InputMode::KeyRelease {
            return;
        }
        self.gates.retain(|&(key, deadline)| {
            if deadline <= now {
                synth.key_up(key);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use keysynth::{synth::PolySynth, SynthConfig};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn render(synth: &mut PolySynth<rtrb::Consumer<keysynth::synth::SynthMessage>>) {
        let mut buffer = [0.0f32; 64];
        synth.render_block(&mut buffer);
    }

    #[test]
    fn press_and_release_reach_the_pool() {
        let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
        let mut input = KeyInput::new(InputMode::KeyRelease);
        let now = Instant::now();

        input.handle(event(KeyCode::Char('w'), KeyEventKind::Press), &mut handle, now);
        render(&mut synth);
        assert!(synth.pool().voice(0).unwrap().is_active());

        input.handle(event(KeyCode::Char('w'), KeyEventKind::Release), &mut handle, now);
        render(&mut synth);
        assert!(!synth.pool().voice(0).unwrap().is_active());
        assert_eq!(input.held().count(), 0);
    }

    #[test]
    fn repeats_are_ignored() {
        let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
        let mut input = KeyInput::new(InputMode::KeyRelease);
        let now = Instant::now();

        input.handle(event(KeyCode::Char('e'), KeyEventKind::Press), &mut handle, now);
        render(&mut synth);
        let pressed_at = synth.pool().voice(0).unwrap().press_timestamp();

        input.handle(event(KeyCode::Char('e'), KeyEventKind::Repeat), &mut handle, now);
        render(&mut synth);
        assert_eq!(synth.pool().voice(0).unwrap().press_timestamp(), pressed_at);
    }

    #[test]
    fn gate_closes_after_its_time() {
        let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
        let gate = Duration::from_millis(300);
        let mut input = KeyInput::new(InputMode::Gate(gate));
        let start = Instant::now();

        input.handle(event(KeyCode::Char('q'), KeyEventKind::Press), &mut handle, start);
        input.expire(&mut handle, start + Duration::from_millis(100));
        render(&mut synth);
        assert!(synth.pool().voice(0).unwrap().is_active());

        // A repeat press extends the gate
        input.handle(
            event(KeyCode::Char('q'), KeyEventKind::Press),
            &mut handle,
            start + Duration::from_millis(200),
        );
        input.expire(&mut handle, start + Duration::from_millis(400));
        assert_eq!(input.held().collect::<Vec<_>>(), vec!['q']);

        input.expire(&mut handle, start + Duration::from_millis(500));
        render(&mut synth);
        assert!(!synth.pool().voice(0).unwrap().is_active());
        assert_eq!(synth.pool().open_count(), 1);
    }

    #[test]
    fn escape_quits_and_space_silences() {
        let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
        let mut input = KeyInput::new(InputMode::KeyRelease);
        let now = Instant::now();

        input.handle(event(KeyCode::Char('t'), KeyEventKind::Press), &mut handle, now);
        input.handle(event(KeyCode::Char(' '), KeyEventKind::Press), &mut handle, now);
        render(&mut synth);
        assert!(!synth.pool().voice(0).unwrap().is_active());

        assert_eq!(
            input.handle(event(KeyCode::Esc, KeyEventKind::Press), &mut handle, now),
            InputAction::Quit
        );
    }
}
