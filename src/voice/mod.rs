//! The streaming sample voice.
//!
//! A [`Voice`] plays one slice of a [`SampleSource`] at a modulatable rate.
//! Each call to [`Voice::process`] streams only the raw samples the block
//! needs, resamples them with Hermite interpolation and runs them through the
//! amplitude and filter modulation.

mod params;
mod plan;
mod scratch;
#[cfg(feature = "rtrb")]
mod shared;
mod state;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use params::Params;
pub use plan::{Heading, PlanOutcome, ReadPlanner, Segment};
pub use scratch::{ScratchBuffer, GUARD_SAMPLES, SCRATCH_CAPACITY};
#[cfg(feature = "rtrb")]
pub use shared::{SharedVoice, VoiceHandle};
pub use state::{BufferStatus, PlaybackDirection, Region};

use params::Selection;

use crate::dsp::biquad::Biquad;
use crate::dsp::envelope::Envelope;
use crate::dsp::fade::{FadeTable, GUARD_RAMP};
use crate::dsp::filter::SVFilter;
use crate::dsp::interpolate::hermite4;
use crate::dsp::lfo::{bipolar_to_unipolar, SineLfo};
use crate::dsp::pitch::{cutoff_to_hz, semitones_to_ratio};
use crate::rom::{SampleSource, SliceId};

/// Longest block rendered in one pass; longer buffers are split.
pub const MAX_FRAMES_PER_BLOCK: usize = 128;

const MAX_INCREMENT_STEPS: usize = 15;
/// Upper bound of the resampling increment.
pub const MAX_INCREMENT: f32 = MAX_INCREMENT_STEPS as f32;

// worst-case block: every frame advances 15 samples, plus the phase carry
const _: () = assert!(
    MAX_INCREMENT_STEPS * MAX_FRAMES_PER_BLOCK + 1 + GUARD_SAMPLES <= SCRATCH_CAPACITY
);

const ANTI_ALIAS_STAGES: usize = 3;
const ANTI_ALIAS_Q: f32 = 0.5;
/// Post filter cutoff ceiling as a fraction of the sample rate.
const CUTOFF_CEILING: f32 = 0.45;
const MIN_Q: f32 = 1.0;
const MAX_Q: f32 = 20.0;

/// Output frames between the raw sample entering the scratch buffer and the
/// interpolator reaching it as `x0`.
const STREAM_LATENCY: f32 = (GUARD_SAMPLES - 1) as f32;

/// Snapshot of a voice's playback state, for hosts, displays and tests.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceStatus {
    /// Status after the last block.
    pub buffer_status: BufferStatus,
    /// Status the last block was rendered with: `ReadFirst` right after a
    /// trigger, `ReadLast` when its read reached the end of the region.
    pub block_status: BufferStatus,
    /// Heading the next block continues in.
    pub direction: PlaybackDirection,
    pub read_pos: usize,
    pub phase: f32,
    pub increment: f32,
    pub pipo_flip: bool,
    pub slice: SliceId,
}

pub struct Voice {
    store: Arc<dyn SampleSource>,
    sample_rate: f32,

    status: BufferStatus,
    block_status: BufferStatus,
    direction: PlaybackDirection,
    read_pos: usize,
    phase: f32,
    increment: f32,
    pipo_flip: bool,
    gate: bool,
    selection: Selection,

    scratch: ScratchBuffer,
    fades: FadeTable,

    envelope: Envelope,
    lfo: SineLfo,
    last_env: f32,
    last_lfo: f32,

    filter: SVFilter,
    anti_alias: [Biquad; ANTI_ALIAS_STAGES],
}

impl Voice {
    pub fn new(store: Arc<dyn SampleSource>, sample_rate: f32) -> Self {
        let defaults = Params::default();
        let mut voice = Self {
            store,
            sample_rate,

            status: BufferStatus::Stopped,
            block_status: BufferStatus::Stopped,
            direction: PlaybackDirection::Fwd,
            read_pos: 0,
            phase: 0.0,
            increment: 0.0,
            pipo_flip: false,
            gate: false,
            selection: Selection::from(&defaults),

            scratch: ScratchBuffer::new(),
            fades: FadeTable::new(),

            envelope: Envelope::new(sample_rate),
            lfo: SineLfo::new(sample_rate),
            last_env: 0.0,
            last_lfo: 0.0,

            filter: SVFilter::new(defaults.filter_type),
            anti_alias: [Biquad::default(); ANTI_ALIAS_STAGES],
        };
        voice.init(sample_rate);
        voice
    }

    /// Set the sample rate and return to a stopped, cleared state. Allocates
    /// nothing; may be called again whenever the host's rate changes.
    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.lfo.reset();
        self.reset();
    }

    /// Stop playback and clear every piece of carried state.
    pub fn reset(&mut self) {
        self.status = BufferStatus::Stopped;
        self.block_status = BufferStatus::Stopped;
        self.direction = PlaybackDirection::Fwd;
        self.read_pos = 0;
        self.phase = 0.0;
        self.increment = 0.0;
        self.pipo_flip = false;
        self.gate = false;

        self.scratch.clear();
        self.envelope.reset();
        self.last_env = 0.0;
        self.last_lfo = 0.0;
        self.reset_filters();
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn store(&self) -> &Arc<dyn SampleSource> {
        &self.store
    }

    pub fn status(&self) -> VoiceStatus {
        VoiceStatus {
            buffer_status: self.status,
            block_status: self.block_status,
            direction: self.direction,
            read_pos: self.read_pos,
            phase: self.phase,
            increment: self.increment,
            pipo_flip: self.pipo_flip,
            slice: self.selection.slice,
        }
    }

    /// Render `out.len()` frames.
    pub fn process(&mut self, params: &Params, out: &mut [f32]) {
        for block in out.chunks_mut(MAX_FRAMES_PER_BLOCK) {
            self.process_block(params, block);
        }
    }

    fn reset_filters(&mut self) {
        self.filter.reset();
        for stage in &mut self.anti_alias {
            stage.reset();
        }
    }

    fn trigger(&mut self) {
        self.status = BufferStatus::ReadFirst;
        self.phase = 0.0;
        self.pipo_flip = false;
        self.envelope.reset();
        self.reset_filters();
    }

    fn process_block(&mut self, params: &Params, out: &mut [f32]) {
        let frames = out.len();

        if params.gate && !self.gate {
            self.trigger();
        }
        self.gate = params.gate;

        if !params.slice_lock || self.status == BufferStatus::ReadFirst {
            self.selection = Selection::from(params);
        }
        let selection = self.selection;

        let region = if self.store.has_slice(selection.slice)
            && self.status != BufferStatus::Stopped
        {
            Region::compute(
                self.store.slice_len(selection.slice),
                selection.start,
                params.length,
                params.loop_marker,
            )
        } else {
            None
        };
        let Some(region) = region else {
            out.fill(0.0);
            return;
        };

        self.envelope
            .set_adsr(params.attack, params.decay, params.sustain, params.release);
        self.envelope.gate(params.gate);
        self.lfo.set_frequency(params.lfo_speed);

        let semitones = selection.pitch
            + params.tune
            + params.eg_fm * self.last_env
            + params.lfo_fm * self.last_lfo;
        let (increment, backward) = clamp_increment(params.speed * semitones_to_ratio(semitones));
        self.increment = increment;

        let flipped = params.ping_pong && self.pipo_flip;
        let direction = PlaybackDirection::select(params.looping, params.ping_pong, backward ^ flipped);

        let block_status = self.status;
        if block_status == BufferStatus::ReadFirst {
            self.read_pos = if direction.is_backward() {
                region.end
            } else {
                region.start
            };
        }

        let advance = increment * frames as f32 + self.phase;
        let wanted = advance as usize;
        debug_assert!(
            wanted <= ScratchBuffer::max_fresh(),
            "block needs {} samples, scratch holds {}",
            wanted,
            ScratchBuffer::max_fresh()
        );
        let wanted = wanted.min(ScratchBuffer::max_fresh());

        let mut planner = ReadPlanner::new(direction, region, self.read_pos, wanted);
        let words = self.scratch.begin(wanted);
        let mut filled = 0;
        for segment in planner.by_ref() {
            let Some(dst) = words.get_mut(filled..filled + segment.len) else {
                break;
            };
            self.store.read_slice(dst, selection.slice, segment.start);
            if segment.heading == Heading::Down {
                dst.reverse();
            }
            filled += segment.len;
        }

        match planner.outcome() {
            PlanOutcome::Exhausted => {
                out.fill(0.0);
                self.status = BufferStatus::Stopped;
                self.block_status = block_status;
                return;
            }
            PlanOutcome::Last => self.status = BufferStatus::ReadLast,
            PlanOutcome::Running => {}
        }

        self.read_pos = planner.cursor();
        self.direction = direction;
        if planner.turns() % 2 == 1 {
            self.pipo_flip = !self.pipo_flip;
            self.direction = direction.reversed();
        }

        self.scratch.commit(params.bit_reduction);
        if block_status == BufferStatus::ReadFirst {
            self.scratch.ramp_guards(&GUARD_RAMP);
        }

        if increment > 1.0 {
            let cutoff = 0.5 / increment;
            let fresh = self.scratch.fresh_mut();
            for stage in &mut self.anti_alias {
                stage.set_lowpass(cutoff, ANTI_ALIAS_Q);
                stage.render(fresh);
            }
        }

        let gain = params.gain * params.gain;
        for (i, sample) in out.iter_mut().enumerate() {
            let env = self.envelope.next_sample();
            let lfo = self.lfo.next_sample();
            let am = amplitude(env, lfo, params.eg_am, params.lfo_am) * gain;

            let position = self.phase + i as f32 * increment;
            let index = position as usize;
            let frac = position - index as f32;
            *sample = hermite4(self.scratch.window(index), frac) * am;

            self.last_env = env;
            self.last_lfo = lfo;
        }

        if block_status == BufferStatus::ReadFirst {
            self.fades.apply_fade_in(out);
        }
        if self.status == BufferStatus::ReadLast {
            // fade over what is left of the slice, silence after it
            let audible = if increment > 0.0 {
                ((filled as f32 + STREAM_LATENCY - self.phase) / increment).ceil() as usize
            } else {
                frames
            };
            let (tail, rest) = out.split_at_mut(audible.min(frames));
            self.fades.apply_fade_out(tail);
            rest.fill(0.0);
        }

        self.scratch.carry();
        self.phase = advance.fract();

        let cutoff = (params.cutoff
            + params.eg_filter_fm * self.last_env
            + params.lfo_filter_fm * self.last_lfo)
            .clamp(0.0, 1.0);
        self.filter.set_filter_type(params.filter_type);
        self.filter
            .set_cutoff(cutoff_to_hz(cutoff).min(self.sample_rate * CUTOFF_CEILING));
        self.filter.set_q(params.resonance.clamp(MIN_Q, MAX_Q));
        self.filter.render(out, self.sample_rate);

        self.block_status = if self.status == BufferStatus::ReadLast {
            BufferStatus::ReadLast
        } else {
            block_status
        };
        self.status = match self.status {
            BufferStatus::ReadLast | BufferStatus::Stopped => BufferStatus::Stopped,
            BufferStatus::ReadFirst | BufferStatus::Running => BufferStatus::Running,
        };
        if params.eg_sync && self.envelope.is_idle() {
            self.status = BufferStatus::Stopped;
        }
    }
}

/// Split a signed playback rate into a bounded magnitude and a heading.
/// Non-finite rates stop the cursor.
#[inline]
pub fn clamp_increment(raw: f32) -> (f32, bool) {
    if !raw.is_finite() {
        return (0.0, false);
    }
    (raw.abs().min(MAX_INCREMENT), raw < 0.0)
}

/// Amplitude factor for envelope and LFO depths. Zero depth leaves unity; a
/// negative envelope depth inverts the envelope.
#[inline]
fn amplitude(env: f32, lfo: f32, eg_am: f32, lfo_am: f32) -> f32 {
    let mut am = env * eg_am;
    if eg_am < 0.0 {
        am -= eg_am;
    }
    am += 1.0 - eg_am.abs();
    am * (1.0 - bipolar_to_unipolar(lfo) * lfo_am)
}
