#[cfg(feature = "rtrb")]
use rtrb::{Consumer, RingBuffer};

#[cfg(feature = "rtrb")]
use crate::synth::handle::SynthHandle;
use crate::{
    config::SynthConfig,
    error::ConfigError,
    synth::{
        message::{MessageReceiver, SynthMessage},
        pool::VoicePool,
        voice::VoiceState,
    },
    MAX_BLOCK_SIZE, MAX_VOICES,
};

/// Copy-only view of one voice for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoiceSnapshot {
    pub state: VoiceState,
    pub freq: f64,
    pub amplitude: f32,
    pub press_timestamp: u64,
}

/// Copy-only view of the whole pool, cheap to push through a ring buffer
/// from the audio thread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolSnapshot {
    pub clock: u64,
    pub voices: [VoiceSnapshot; MAX_VOICES],
}

impl PoolSnapshot {
    pub fn open_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| v.state != VoiceState::Closed)
            .count()
    }
}

/// Audio-thread half of the synth: the voice pool plus the command queue
/// feeding it.
pub struct PolySynth<R> {
    pool: VoicePool,
    rx: R,
    config: SynthConfig,
    temp_buffer: Vec<f32>,
}

#[cfg(feature = "rtrb")]
impl PolySynth<Consumer<SynthMessage>> {
    /// Build a synth and the handle that plays it.
    ///
    /// Move the synth into the audio callback and keep the handle on the
    /// input thread.
    pub fn new(config: SynthConfig) -> Result<(Self, SynthHandle), ConfigError> {
        config.validate()?;
        let (tx, rx) = RingBuffer::<SynthMessage>::new(config.queue_capacity);
        let synth = Self::with_receiver(config, rx)?;
        Ok((synth, SynthHandle::new(tx)))
    }
}

impl<R: MessageReceiver> PolySynth<R> {
    pub fn with_receiver(config: SynthConfig, rx: R) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "voice pool: {MAX_VOICES} voices @ {} Hz, {}-frame blocks, release {} samples",
            config.sample_rate,
            config.block_size,
            config.release_samples
        );

        Ok(Self {
            pool: VoicePool::new(&config),
            rx,
            temp_buffer: vec![0.0; config.block_size.min(MAX_BLOCK_SIZE)],
            config,
        })
    }

    /// Apply pending commands, then render one block of mono output.
    ///
    /// Commands are applied before the first frame, so every note event in a
    /// block is stamped with the clock value at the start of that block.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.process_messages();
        self.pool.render(out);
    }

    /// Fill an interleaved device buffer, copying the mono mix to every channel.
    ///
    /// The buffer is rendered in chunks of at most one configured block, so a
    /// backend that hands over more frames than asked for still gets note
    /// events applied at block granularity.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(self.temp_buffer.len());

            self.process_messages();
            let block = &mut self.temp_buffer[..frames_to_render];
            self.pool.render(block);

            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                let frame = out_off + i * channels;
                data[frame..frame + channels].fill(s);
            }

            frames_written += frames_to_render;
        }

        // Trailing samples that do not form a whole frame
        data[total_frames * channels..].fill(0.0);
    }

    fn process_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::NoteOn { freq } => {
                    self.pool.note_on(freq);
                }
                SynthMessage::NoteOff { freq } => {
                    self.pool.note_off(freq);
                }
                SynthMessage::AllNotesOff => {
                    self.pool.all_notes_off();
                }
            }
        }
    }

    /// Current state of every slot, evaluated at the pool clock.
    pub fn snapshot(&self) -> PoolSnapshot {
        let mut snapshot = PoolSnapshot {
            clock: self.pool.clock(),
            ..PoolSnapshot::default()
        };
        for (slot, (voice, out)) in self
            .pool
            .voices()
            .iter()
            .zip(snapshot.voices.iter_mut())
            .enumerate()
        {
            *out = VoiceSnapshot {
                state: voice.state(),
                freq: voice.base_freq().unwrap_or(0.0),
                amplitude: self.pool.amplitude(slot).unwrap_or(0.0),
                press_timestamp: voice.press_timestamp().unwrap_or(0),
            };
        }
        snapshot
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }
}
