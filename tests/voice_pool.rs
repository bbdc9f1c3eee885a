use keysynth::{
    keymap::{frequency_at, frequency_for, KEY_TABLE, REFERENCE_FREQ},
    synth::{NoteOnOutcome, VoicePool, VoiceState},
    ClipMode, SynthConfig, MAX_VOICES, RELEASE_SAMPLES,
};

fn default_pool() -> VoicePool {
    VoicePool::new(&SynthConfig::default())
}

/// Tiny deterministic generator so the stress test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn every_key_maps_to_its_semitone() {
    for (i, &key) in KEY_TABLE.iter().enumerate() {
        let expected = 261.43 * 2.0_f64.powf(1.0 / 12.0).powi(i as i32);
        let actual = frequency_for(key).unwrap();
        assert!((actual - expected).abs() < 1e-9, "{key:?}");
    }
    assert_eq!(frequency_for('q'), Some(REFERENCE_FREQ));
    assert_eq!(frequency_for('j'), None);
}

#[test]
fn renders_silence_with_empty_pool() {
    let mut pool = default_pool();
    let mut buffer = [0.5f32; 64];
    pool.render(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 0.0));
}

#[test]
fn clock_advances_by_frames_rendered() {
    let mut pool = default_pool();
    let mut total = 0u64;
    for frames in [64usize, 1, 63, 128, 7] {
        let mut buffer = vec![0.0f32; frames];
        pool.render(&mut buffer);
        total += frames as u64;
        assert_eq!(pool.clock(), total);
    }
}

#[test]
fn random_note_traffic_never_exceeds_pool() {
    let mut pool = default_pool();
    let mut rng = Lcg(7);
    let mut buffer = [0.0f32; 64];

    for _ in 0..5_000 {
        let key = KEY_TABLE[(rng.next() % KEY_TABLE.len() as u64) as usize];
        let freq = frequency_for(key).unwrap();
        match rng.next() % 3 {
            0 => {
                let before = pool.open_count();
                let held = pool.slot_for(freq).is_some();
                match pool.note_on(freq) {
                    NoteOnOutcome::Retriggered(_) => assert_eq!(pool.open_count(), before),
                    NoteOnOutcome::Allocated(_) => {
                        assert!(!held);
                        assert_eq!(pool.open_count(), before + 1);
                    }
                    NoteOnOutcome::Dropped => assert_eq!(before, MAX_VOICES),
                }
            }
            1 => {
                pool.note_off(freq);
            }
            _ => pool.render(&mut buffer),
        }
        assert!(pool.open_count() <= MAX_VOICES);

        // One voice per pitch
        let mut open: Vec<f64> = pool.voices().iter().filter_map(|v| v.base_freq()).collect();
        let count = open.len();
        open.sort_by(f64::total_cmp);
        open.dedup();
        assert_eq!(open.len(), count);
    }
}

#[test]
fn release_decays_to_zero_then_frees_slot() {
    let mut pool = default_pool();
    let freq = frequency_for('q').unwrap();
    assert_eq!(pool.note_on(freq), NoteOnOutcome::Allocated(0));

    // Hold for a while, then release at tick t
    let mut hold = vec![0.0f32; 1_000];
    pool.render(&mut hold);
    let t = pool.clock();
    pool.note_off(freq);
    assert_eq!(pool.voice(0).unwrap().release_timestamp(), Some(t));

    let mut previous = f32::INFINITY;
    let mut one = [0.0f32; 1];
    for tick in 1..=RELEASE_SAMPLES {
        pool.render(&mut one);
        let level = pool.amplitude(0).unwrap();
        assert!(level <= previous, "level rose at t+{tick}");
        previous = level;
    }
    assert_eq!(pool.clock(), t + RELEASE_SAMPLES);
    assert_eq!(pool.amplitude(0), Some(0.0));
    assert_eq!(pool.state(0), VoiceState::Releasing);

    pool.render(&mut one);
    assert_eq!(pool.state(0), VoiceState::Closed);
    assert_eq!(pool.note_on(frequency_at(5)), NoteOnOutcome::Allocated(0));
}

#[test]
fn double_note_off_is_noop() {
    let mut pool = default_pool();
    let freq = frequency_at(9);
    pool.note_on(freq);
    assert_eq!(pool.note_off(freq), 1);

    let mut buffer = [0.0f32; 64];
    pool.render(&mut buffer);
    let level = pool.amplitude(0);

    assert_eq!(pool.note_off(freq), 0);
    assert_eq!(pool.amplitude(0), level);
}

#[test]
fn eleventh_distinct_note_is_silent() {
    let mut pool = default_pool();
    for &key in &KEY_TABLE[..MAX_VOICES] {
        pool.note_on(frequency_for(key).unwrap());
    }
    let eleventh = frequency_for(KEY_TABLE[MAX_VOICES]).unwrap();
    assert_eq!(pool.note_on(eleventh), NoteOnOutcome::Dropped);

    let mut buffer = [0.0f32; 64];
    pool.render(&mut buffer);
    assert!(pool
        .voices()
        .iter()
        .all(|v| v.base_freq() != Some(eleventh)));
}

#[test]
fn release_onset_jumps_to_full_level() {
    let mut pool = default_pool();
    let freq = frequency_at(0);
    pool.note_on(freq);
    assert_eq!(pool.amplitude(0), Some(0.5));
    pool.note_off(freq);
    assert_eq!(pool.amplitude(0), Some(1.0));
}

#[test]
fn release_peak_at_sustain_removes_the_jump() {
    let config = SynthConfig::default().release_peak(0.5);
    let mut pool = VoicePool::new(&config);
    let freq = frequency_at(0);
    pool.note_on(freq);
    pool.note_off(freq);
    assert_eq!(pool.amplitude(0), Some(0.5));
}

#[test]
fn upper_clip_only_by_default() {
    // Ten sustained voices at 0.5 each can sum far past either rail
    let mut pool = default_pool();
    for i in 0..MAX_VOICES {
        pool.note_on(frequency_at(i));
    }
    let mut buffer = vec![0.0f32; 44_100];
    pool.render(&mut buffer);

    let max = buffer.iter().copied().fold(f32::MIN, f32::max);
    let min = buffer.iter().copied().fold(f32::MAX, f32::min);
    assert_eq!(max, 1.0);
    assert!(min < -1.0, "expected negative excursions, min {min}");
}

#[test]
fn symmetric_clip_bounds_both_rails() {
    let config = SynthConfig::default().clip_mode(ClipMode::Symmetric);
    let mut pool = VoicePool::new(&config);
    for i in 0..MAX_VOICES {
        pool.note_on(frequency_at(i));
    }
    let mut buffer = vec![0.0f32; 44_100];
    pool.render(&mut buffer);
    assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[cfg(feature = "rtrb")]
#[test]
fn synth_applies_queued_keys_at_block_start() {
    use keysynth::synth::PolySynth;

    let (mut synth, mut handle) = PolySynth::new(SynthConfig::default()).unwrap();
    let mut buffer = [0.0f32; 64];

    synth.render_block(&mut buffer);
    assert!(handle.key_down('z'));
    assert!(!handle.key_down('j'));
    synth.render_block(&mut buffer);

    let voice = synth.pool().voice(0).unwrap();
    assert_eq!(voice.base_freq(), frequency_for('z'));
    assert_eq!(voice.press_timestamp(), Some(64));
    assert_eq!(synth.pool().open_count(), 1);
}
