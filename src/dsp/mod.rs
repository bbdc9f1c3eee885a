//! Low-level DSP primitives used by the voice pool.
//!
//! Both are plain functions of the sample clock with no hidden state, which is
//! what lets a voice be described by a handful of timestamps.

/// Sustain / linear-release amplitude envelope.
pub mod envelope;
/// Clock-locked sine oscillator.
pub mod oscillator;

pub use envelope::GateEnvelope;
pub use oscillator::sine_at;
