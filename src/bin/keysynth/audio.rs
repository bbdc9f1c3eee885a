//! cpal output stream driving the synth's render path

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig, SupportedBufferSize};
use rtrb::{Consumer, Producer, PushError};

use keysynth::{
    synth::{PolySynth, PoolSnapshot, SynthMessage},
    SynthConfig,
};

/// Sinks the audio callback publishes to, drained by the UI thread.
pub struct AudioTaps {
    pub scope_tx: Producer<f32>,
    pub snapshot_tx: Producer<PoolSnapshot>,
}

/// A running output stream. Dropping it stops the callback.
pub struct AudioOutput {
    stream: cpal::Stream,
    pub device_name: String,
}

impl AudioOutput {
    pub fn pause(&self) -> EyreResult<()> {
        self.stream.pause().wrap_err("failed to stop output stream")
    }
}

/// Open the default output device with the exact format the synth expects
/// and start rendering into it.
///
/// Any failure here is fatal: there is no fallback device and no retry.
pub fn start(
    mut synth: PolySynth<Consumer<SynthMessage>>,
    config: &SynthConfig,
    taps: AudioTaps,
) -> EyreResult<AudioOutput> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let device_name = device
        .name()
        .unwrap_or_else(|_| String::from("<unnamed device>"));

    check_supported(&device, config)?;

    let stream_config = StreamConfig {
        channels: config.channels,
        sample_rate: SampleRate(config.sample_rate),
        buffer_size: BufferSize::Fixed(config.block_size as u32),
    };
    let channels = config.channels as usize;

    log::info!(
        "opening '{device_name}': {} Hz, {} ch, {}-frame buffers",
        config.sample_rate,
        config.channels,
        config.block_size
    );

    let AudioTaps {
        mut scope_tx,
        mut snapshot_tx,
    } = taps;

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                synth.render_interleaved(data, channels);

                // Push the mono mix to the scope, dropping whatever does not fit
                for frame in data.chunks_exact(channels) {
                    if let Err(PushError::Full(_)) = scope_tx.push(frame[0]) {
                        break;
                    }
                }
                let _ = snapshot_tx.push(synth.snapshot());
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    Ok(AudioOutput {
        stream,
        device_name,
    })
}

fn check_supported(device: &cpal::Device, config: &SynthConfig) -> EyreResult<()> {
    let rate = SampleRate(config.sample_rate);
    let frames = config.block_size as u32;

    let supported = device
        .supported_output_configs()
        .wrap_err("failed to query output configs")?
        .any(|range| {
            let buffer_ok = match range.buffer_size() {
                SupportedBufferSize::Range { min, max } => (*min..=*max).contains(&frames),
                SupportedBufferSize::Unknown => true,
            };
            range.channels() == config.channels
                && range.sample_format() == SampleFormat::F32
                && range.min_sample_rate() <= rate
                && rate <= range.max_sample_rate()
                && buffer_ok
        });

    if supported {
        Ok(())
    } else {
        Err(eyre!(
            "output device does not support f32, {} ch @ {} Hz with {}-frame buffers",
            config.channels,
            config.sample_rate,
            config.block_size
        ))
    }
}
