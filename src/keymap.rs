/*
Computer Keyboard Note Map
==========================

Two rows of a QWERTY keyboard form a piano-like layout: the lower row of each
pair holds the "white" keys and the row above it the "black" keys. Reading the
table left to right walks up the chromatic scale one semitone per entry.

  2 3   5 6 7   9 0        (upper octave black keys)
 q w e r t y u i o p       (upper octave white keys)
  < a z s x d c v g b h n m k , l . ; /   (lower rows continue upward)

Tuning
------

Index 0 sits at F0 = 261.43 Hz. That is a slightly flat middle C, kept as-is
so recordings made with earlier builds still line up. Each following entry is
one equal-tempered semitone higher:

    freq(i) = F0 * (2^(1/12))^i

The full table spans three octaves (36 semitones), so the top key is just
below 2 * 2 * F0.
*/

/// Reference frequency of the first key in the table (Hz).
pub const REFERENCE_FREQ: f64 = 261.43;

/// Playable symbols, one chromatic semitone per position.
pub const KEY_TABLE: [char; 36] = [
    'q', '2', 'w', '3', 'e', //
    'r', '5', 't', '6', 'y', '7', 'u', //
    'i', '9', 'o', '0', 'p', //
    '<', 'a', 'z', 's', 'x', 'd', 'c', //
    'v', 'g', 'b', 'h', 'n', //
    'm', 'k', ',', 'l', '.', ';', '/',
];

/// Position of `symbol` in [`KEY_TABLE`], if it is playable.
pub fn note_index(symbol: char) -> Option<usize> {
    KEY_TABLE.iter().position(|&k| k == symbol)
}

/// Frequency of the key at table position `index`.
///
/// Indices past the end of the table still follow the same formula; callers
/// that need a real key should go through [`frequency_for`].
#[inline]
pub fn frequency_at(index: usize) -> f64 {
    REFERENCE_FREQ * 2.0_f64.powf(1.0 / 12.0).powi(index as i32)
}

/// Map an input symbol to its fundamental frequency.
///
/// Returns `None` for symbols that are not in the table. That is "no note",
/// not an error: both note-on and note-off treat it as a no-op.
pub fn frequency_for(symbol: char) -> Option<f64> {
    note_index(symbol).map(frequency_at)
}

/// Symbol at table position `index`.
pub fn symbol_at(index: usize) -> Option<char> {
    KEY_TABLE.get(index).copied()
}

/// Reverse lookup: the key whose frequency is exactly `freq`.
///
/// Exact comparison is fine here because every frequency in the synth is
/// produced by [`frequency_at`].
pub fn symbol_for_frequency(freq: f64) -> Option<char> {
    (0..KEY_TABLE.len())
        .find(|&i| frequency_at(i) == freq)
        .and_then(symbol_at)
}
