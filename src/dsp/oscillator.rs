use std::f64::consts::TAU;

/*
Clock-Locked Sine
=================

Most oscillators keep a running phase and add `freq / sample_rate` every
sample. The voices here do not store any phase at all. The phase comes
straight from the shared sample clock:

    s(t) = sin(2π · t · f / sample_rate)

where `t` is the absolute sample index since the engine started.

Consequences
------------

  - A voice needs no per-sample state, so re-triggering or reusing a slot
    can never leave a stale phase behind.
  - Two voices at the same frequency are always in phase. The pool only ever
    holds one voice per frequency, so that never doubles a note.
  - A note does not start at phase zero. It starts wherever the clock is,
    which can click on onset. The release ramp hides it on the way out.

The product `t · f` is computed in f64: after an hour at 44.1 kHz `t` is
already ~1.6e8, far past the 24-bit mantissa of an f32.
*/

/// Sine value at absolute sample index `t` for a tone at `freq` Hz.
#[inline]
pub fn sine_at(t: u64, freq: f64, sample_rate: f64) -> f32 {
    (TAU * t as f64 * freq / sample_rate).sin() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_on_clock_zero() {
        assert_eq!(sine_at(0, 261.43, 44_100.0), 0.0);
    }

    #[test]
    fn quarter_period_peaks() {
        // 441 Hz at 44.1 kHz has a 100-sample period
        let peak = sine_at(25, 441.0, 44_100.0);
        assert!((peak - 1.0).abs() < 1e-6, "got {peak}");
        let trough = sine_at(75, 441.0, 44_100.0);
        assert!((trough + 1.0).abs() < 1e-6, "got {trough}");
    }

    #[test]
    fn same_frequency_is_phase_locked() {
        let a = sine_at(123_456, 329.63, 44_100.0);
        let b = sine_at(123_456, 329.63, 44_100.0);
        assert_eq!(a, b);
    }
}
