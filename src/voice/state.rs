#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Buffer Lifecycle
================

    gate ↑           read ok                read hits region end
  ─────────▶ ReadFirst ───────▶ Running ─────────────────────────▶ ReadLast
                 │                 ▲  │                               │
                 │                 └──┘ (loops never leave Running)   │
                 └────────────────────────────────────────────────────┤
                                                                      ▼
                                                                   Stopped

ReadFirst lasts exactly one block: it places the cursor, ramps the guard
samples and fades the output in. ReadLast also lasts one block: it fades the
output out and then becomes Stopped. A rising gate re-enters ReadFirst from
any state.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferStatus {
    #[default]
    Stopped,
    ReadFirst,
    ReadLast,
    Running,
}

impl BufferStatus {
    pub fn is_playing(self) -> bool {
        self != BufferStatus::Stopped
    }
}

/// Loop mode and heading of the read cursor. For the ping-pong modes the
/// `Fwd`/`Bwd` part is the current heading and swaps at every turn.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackDirection {
    #[default]
    Fwd,
    Bwd,
    LoopFwd,
    LoopBwd,
    LoopFwdPingPong,
    LoopBwdPingPong,
}

impl PlaybackDirection {
    pub fn select(looping: bool, ping_pong: bool, backward: bool) -> Self {
        match (looping, ping_pong, backward) {
            (false, _, false) => PlaybackDirection::Fwd,
            (false, _, true) => PlaybackDirection::Bwd,
            (true, false, false) => PlaybackDirection::LoopFwd,
            (true, false, true) => PlaybackDirection::LoopBwd,
            (true, true, false) => PlaybackDirection::LoopFwdPingPong,
            (true, true, true) => PlaybackDirection::LoopBwdPingPong,
        }
    }

    pub fn is_backward(self) -> bool {
        matches!(
            self,
            PlaybackDirection::Bwd | PlaybackDirection::LoopBwd | PlaybackDirection::LoopBwdPingPong
        )
    }

    pub fn is_looping(self) -> bool {
        !matches!(self, PlaybackDirection::Fwd | PlaybackDirection::Bwd)
    }

    pub fn is_ping_pong(self) -> bool {
        matches!(
            self,
            PlaybackDirection::LoopFwdPingPong | PlaybackDirection::LoopBwdPingPong
        )
    }

    /// Same mode, opposite heading.
    pub fn reversed(self) -> Self {
        Self::select(self.is_looping(), self.is_ping_pong(), !self.is_backward())
    }
}

/// Play region inside a slice, in slice-relative samples.
///
/// Always satisfies `start <= loop_pos` and `loop_pos + 1 < end <= slice_len`,
/// so the loop section holds at least two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub loop_pos: usize,
}

impl Region {
    /// `None` for every degenerate region; such a region plays silence.
    pub fn compute(slice_len: usize, start: f32, length: f32, loop_marker: f32) -> Option<Self> {
        let start_pos = fraction_of(start, slice_len).min(slice_len);
        let play_len = fraction_of(length, slice_len).min(slice_len - start_pos);
        let end = (start_pos + play_len).min(slice_len);
        let loop_pos = (start_pos + fraction_of(loop_marker, play_len)).min(end);

        if play_len == 0 || start_pos + 1 >= end || loop_pos + 1 >= end {
            return None;
        }

        Some(Self {
            start: start_pos,
            end,
            loop_pos,
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[inline]
fn fraction_of(fraction: f32, len: usize) -> usize {
    // NaN and negatives land on 0 through the saturating cast
    (fraction.clamp(0.0, 1.0) * len as f32) as usize
}
