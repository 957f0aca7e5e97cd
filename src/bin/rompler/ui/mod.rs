//! TUI module for rompler
//!
//! Shows the voice status, the current parameters and an oscilloscope of the
//! output, and turns key presses into parameter snapshots for the audio thread.

mod status;
mod waveform;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use rompler_dsp::{
    dsp::pitch::CUTOFF_OCTAVES, voice::VoiceHandle, Params, SampleRom, SampleSource, SliceId,
    VoiceStatus,
};

use status::{render_params, render_status, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

const PITCH_RANGE: f32 = 48.0;
// one semitone's worth of normalized cutoff
const CUTOFF_STEP: f32 = 1.0 / (CUTOFF_OCTAVES * 12.0);

/// UI application state
pub struct UiApp {
    rom: Arc<SampleRom>,
    /// Failed ROM reads since startup; logging would tear the TUI.
    read_failures: u64,
    handle: VoiceHandle,
    scope_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,

    params: Params,
    /// Set when `params` changed but has not reached the audio thread yet.
    dirty: bool,
    status: Option<VoiceStatus>,

    slice_count: SliceId,
    sample_rate: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        rom: Arc<SampleRom>,
        handle: VoiceHandle,
        scope_rx: Consumer<f32>,
        params: Params,
        slice_count: SliceId,
        sample_rate: f32,
    ) -> Self {
        Self {
            rom,
            read_failures: 0,
            handle,
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            params,
            dirty: true,
            status: None,
            slice_count,
            sample_rate,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.status = self.handle.status();
            self.read_failures += self.rom.take_read_failures();
            self.flush_params();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the newest VIS_BUFFER_SIZE samples from the scope ring
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn flush_params(&mut self) {
        if self.dirty && self.handle.send(self.params) {
            self.dirty = false;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let p = &mut self.params;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => p.gate = !p.gate,
            KeyCode::Char('l') => {
                p.looping = !p.looping;
                if !p.looping {
                    p.ping_pong = false;
                }
            }
            KeyCode::Char('p') => {
                p.ping_pong = !p.ping_pong;
                if p.ping_pong {
                    p.looping = true;
                }
            }
            KeyCode::Char('r') => p.speed = -p.speed,
            KeyCode::Up => p.pitch = (p.pitch + 1.0).min(PITCH_RANGE),
            KeyCode::Down => p.pitch = (p.pitch - 1.0).max(-PITCH_RANGE),
            KeyCode::Right => p.slice = (p.slice + 1) % self.slice_count.max(1),
            KeyCode::Left => {
                p.slice = p.slice.checked_sub(1).unwrap_or(self.slice_count.saturating_sub(1))
            }
            KeyCode::Char('s') => p.slice_lock = !p.slice_lock,
            KeyCode::Char('e') => p.eg_sync = !p.eg_sync,
            KeyCode::Char('f') => p.filter_type = p.filter_type.cycle(),
            KeyCode::Char(']') => p.cutoff = (p.cutoff + CUTOFF_STEP).min(1.0),
            KeyCode::Char('[') => p.cutoff = (p.cutoff - CUTOFF_STEP).max(0.0),
            _ => return,
        }
        self.dirty = true;
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Voice status
                Constraint::Length(4), // Parameters
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(
            frame,
            chunks[0],
            self.status.as_ref(),
            self.read_failures,
            self.sample_rate,
            &stats,
        );
        render_params(frame, chunks[1], &self.params);
        let slice = self.status.map_or(self.params.slice, |s| s.slice);
        render_waveform(
            frame,
            chunks[2],
            &self.audio_buffer,
            &self.params,
            self.status.as_ref(),
            self.rom.slice_len(slice),
        );

        let help = Paragraph::new(
            " [Space] Gate  [L] Loop  [P] Ping-pong  [R] Reverse  [↑↓] Pitch  [←→] Slice  \
             [S] Lock  [E] EG sync  [F] Filter  [[ ]] Cutoff  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
