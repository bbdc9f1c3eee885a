//! Benchmarks for the oscillator and envelope primitives.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{sine_at, GateEnvelope};

use crate::BLOCK_SIZES;

pub fn bench_dsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp");
    let env = GateEnvelope::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Late in a session, where the clock is large
        let start = 44_100u64 * 3_600;
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = sine_at(black_box(start + i as u64), 261.43, 44_100.0);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = env.level(false, black_box(i as u64));
                }
            })
        });
    }

    group.finish();
}
