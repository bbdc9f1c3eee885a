//! Benchmarks for full pool renders.
//!
//! The full pool is the worst case the audio callback ever sees: ten open
//! voices, each costing one sine and one envelope evaluation per frame.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{
    keymap::frequency_at,
    synth::{PolySynth, VoicePool},
    SynthConfig, MAX_VOICES,
};

use crate::BLOCK_SIZES;

fn pool_with(voices: usize) -> VoicePool {
    let mut pool = VoicePool::new(&SynthConfig::default());
    for i in 0..voices {
        pool.note_on(frequency_at(i * 3));
    }
    pool
}

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [0, 4, MAX_VOICES] {
            let mut pool = pool_with(voices);
            group.bench_with_input(
                BenchmarkId::new(format!("held_{voices}"), size),
                &size,
                |b, _| b.iter(|| pool.render(black_box(&mut buffer))),
            );
        }

        // Releasing voices: re-release whenever they finish so every
        // iteration measures the release branch
        let mut pool = pool_with(MAX_VOICES);
        group.bench_with_input(BenchmarkId::new("releasing_10", size), &size, |b, _| {
            b.iter(|| {
                if pool.is_silent() {
                    for i in 0..MAX_VOICES {
                        pool.note_on(frequency_at(i * 3));
                    }
                }
                pool.all_notes_off();
                pool.render(black_box(&mut buffer));
            })
        });

        // The full callback path: queue drain + render + snapshot
        let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
        for key in ['q', 'e', 't', 'u', 'o'] {
            handle.key_down(key);
        }
        group.bench_with_input(BenchmarkId::new("callback_5", size), &size, |b, _| {
            b.iter(|| {
                synth.render_block(black_box(&mut buffer));
                black_box(synth.snapshot());
            })
        });
    }

    group.finish();
}
