//! Rompler - application builder and audio plumbing

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, PushError, RingBuffer};
use tracing::{error, info, warn};

use rompler_dsp::{
    voice::{SharedVoice, VoiceHandle},
    Params, SampleRom, SampleSource, SliceId, MAX_BLOCK_SIZE,
};

use super::ui::{UiApp, VIS_BUFFER_SIZE};

/// Capacity in visualization windows for the audio→UI scope ring.
const SCOPE_RING_WINDOWS: usize = 16;

/// Main application builder
pub struct Rompler {
    rom: Arc<SampleRom>,
    params: Params,
}

/// A running output stream and the control side of its voice.
struct Audio {
    // dropping the stream stops playback
    _stream: cpal::Stream,
    handle: VoiceHandle,
    scope_rx: Consumer<f32>,
    sample_rate: f32,
}

impl Rompler {
    pub fn new(rom: SampleRom) -> Self {
        Self {
            rom: Arc::new(rom),
            params: Params::default(),
        }
    }

    pub fn slice(mut self, slice: SliceId) -> Self {
        self.params.slice = slice;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.params.speed = speed;
        self
    }

    pub fn pitch(mut self, semitones: f32) -> Self {
        self.params.pitch = semitones;
        self
    }

    pub fn looping(mut self, looping: bool, ping_pong: bool) -> Self {
        self.params.looping = looping || ping_pong;
        self.params.ping_pong = ping_pong;
        self
    }

    pub fn loop_marker(mut self, marker: f32) -> Self {
        self.params.loop_marker = marker.clamp(0.0, 1.0);
        self
    }

    /// Run with the terminal UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let audio = self.start_audio()?;
        let slice_count = self.rom.slice_count() as SliceId;

        let mut app = UiApp::new(
            self.rom.clone(),
            audio.handle,
            audio.scope_rx,
            self.params,
            slice_count,
            audio.sample_rate,
        );

        let mut terminal = ratatui::init();
        let res = app.run(&mut terminal);
        ratatui::restore();
        res
    }

    /// Hold the gate for `seconds`, then print where the voice ended up.
    pub fn run_headless(self, seconds: f32) -> EyreResult<()> {
        let mut audio = self.start_audio()?;

        let params = Params {
            gate: true,
            ..self.params
        };
        if !audio.handle.send(params) {
            return Err(eyre!("voice parameter queue is full"));
        }

        let deadline = Instant::now() + Duration::from_secs_f32(seconds.max(0.0).min(86_400.0));
        let mut peak = 0.0f32;
        while Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
            while let Ok(sample) = audio.scope_rx.pop() {
                peak = peak.max(sample.abs());
            }

            let failures = self.rom.take_read_failures();
            if failures > 0 {
                warn!(failures, "sample ROM reads failed, played silence instead");
            }
        }

        match audio.handle.status() {
            Some(status) => {
                println!("slice:      {}", status.slice);
                println!("status:     {:?}", status.buffer_status);
                println!("direction:  {:?}", status.direction);
                println!("read_pos:   {}", status.read_pos);
                println!("increment:  {:.4}", status.increment);
                println!("peak:       {:.3}", peak);
            }
            None => println!("no audio was rendered"),
        }

        Ok(())
    }

    fn start_audio(&self) -> EyreResult<Audio> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        info!(
            sample_rate,
            channels,
            slices = self.rom.slice_count(),
            "starting output stream"
        );

        let (mut voice, handle) = SharedVoice::new(self.rom.clone(), sample_rate);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * SCOPE_RING_WINDOWS);

        // Buffer reused by audio callback
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        let block = &mut render_buf[..frames_to_render];
                        voice.render(block);

                        // Copy to output (mono to all channels)
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        // Feed the scope, dropping whatever does not fit
                        for &s in block.iter() {
                            if let Err(PushError::Full(_)) = scope_tx.push(s) {
                                break;
                            }
                        }

                        frames_written += frames_to_render;
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        Ok(Audio {
            _stream: stream,
            handle,
            scope_rx,
            sample_rate,
        })
    }
}
