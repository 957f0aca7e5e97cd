#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::FilterType;
use crate::rom::SliceId;

/// Everything a voice reads from the control plane, copied once per block.
///
/// Relative positions (`start`, `length`, `loop_marker`) are fractions in
/// [0, 1]; `loop_marker` is relative to the play region, not to the slice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub slice: SliceId,
    /// Signed playback ratio; negative plays backward.
    pub speed: f32,
    /// Semitones.
    pub pitch: f32,
    /// Semitones.
    pub tune: f32,
    pub start: f32,
    pub length: f32,
    /// Linear gain, applied squared.
    pub gain: f32,

    // amplitude envelope, seconds except sustain
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Stop as soon as the envelope has finished its release.
    pub eg_sync: bool,

    /// Normalized cutoff, 0.0 = 20 Hz, 1.0 = 20.48 kHz.
    pub cutoff: f32,
    /// Filter Q, used in [1, 20].
    pub resonance: f32,
    pub filter_type: FilterType,

    pub looping: bool,
    pub ping_pong: bool,
    pub loop_marker: f32,

    /// Hz.
    pub lfo_speed: f32,
    pub lfo_am: f32,
    /// Semitones at full LFO swing.
    pub lfo_fm: f32,
    /// Normalized cutoff at full LFO swing.
    pub lfo_filter_fm: f32,
    pub eg_am: f32,
    /// Semitones at full envelope level.
    pub eg_fm: f32,
    pub eg_filter_fm: f32,

    /// Low bits masked off each PCM word, 0..=14.
    pub bit_reduction: u8,

    pub gate: bool,
    pub slice_lock: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            slice: 0,
            speed: 1.0,
            pitch: 0.0,
            tune: 0.0,
            start: 0.0,
            length: 1.0,
            gain: 1.0,

            attack: 0.0,
            decay: 0.1,
            sustain: 1.0,
            release: 0.1,
            eg_sync: false,

            cutoff: 1.0,
            resonance: 1.0,
            filter_type: FilterType::None,

            looping: false,
            ping_pong: false,
            loop_marker: 0.0,

            lfo_speed: 1.0,
            lfo_am: 0.0,
            lfo_fm: 0.0,
            lfo_filter_fm: 0.0,
            eg_am: 0.0,
            eg_fm: 0.0,
            eg_filter_fm: 0.0,

            bit_reduction: 0,

            gate: false,
            slice_lock: false,
        }
    }
}

/// The part of [`Params`] that slice lock freezes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Selection {
    pub slice: SliceId,
    pub pitch: f32,
    pub start: f32,
}

impl From<&Params> for Selection {
    fn from(params: &Params) -> Self {
        Self {
            slice: params.slice,
            pitch: params.pitch,
            start: params.start,
        }
    }
}
