use super::state::{PlaybackDirection, Region};

/*
Read Planning
=============

Each block needs `wanted` fresh samples from the slice, in playback order.
The planner turns the cursor, region and direction into the storage reads
that produce them. It does no I/O, so every wrap and turn can be tested on
its own.

The cursor sits BETWEEN samples: heading up, the next sample read is
`cursor`; heading down, it is `cursor - 1`.

  one-shot       read toward the bound, then stop

      start                                end
        |------------------>| cursor ...... |      last read ends at `end`

  loop           on reaching the bound, continue from the other side; the
                 jump happens as soon as the bound is reached, so a looping
                 cursor heading up always stays in [loop_pos, end)

      start      loop_pos                  end
        |---------->|------------------->|
                    ^---------------------'        up:   jump to loop_pos
                    '--------------------v         down: jump to end

  ping-pong      on reaching the bound, turn around

                 loop_pos                  end
                    |-------------------->|
                    |<-------------------'         turn below `end`
                    '-------------------->         turn above `loop_pos`

A turn never re-reads the sample it turns on: heading up, `end - 1` is the
last sample before the turn and `end - 2` the first after it. The bottom turn
mirrors that around `loop_pos`.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
}

/// One contiguous storage read. `Down` segments cover the same
/// `[start, start + len)` range but are played last sample first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub len: usize,
    pub heading: Heading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Every wanted sample was planned.
    Running,
    /// A one-shot read reached the region bound; this block is the last.
    Last,
    /// A one-shot read had nothing left to read.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    OneShot,
    Loop,
    PingPong,
}

pub struct ReadPlanner {
    mode: Mode,
    heading: Heading,
    region: Region,
    cursor: usize,
    remaining: usize,
    planned: usize,
    turns: u32,
    outcome: PlanOutcome,
}

impl ReadPlanner {
    pub fn new(direction: PlaybackDirection, region: Region, cursor: usize, wanted: usize) -> Self {
        let mode = if direction.is_ping_pong() {
            Mode::PingPong
        } else if direction.is_looping() {
            Mode::Loop
        } else {
            Mode::OneShot
        };
        let heading = if direction.is_backward() {
            Heading::Down
        } else {
            Heading::Up
        };

        Self {
            mode,
            heading,
            region,
            cursor: cursor.clamp(region.start, region.end),
            remaining: wanted,
            planned: 0,
            turns: 0,
            outcome: PlanOutcome::Running,
        }
    }

    /// Cursor after the segments produced so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Ping-pong turns taken so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn outcome(&self) -> PlanOutcome {
        self.outcome
    }

    fn finish(&mut self) -> Option<Segment> {
        self.outcome = if self.planned == 0 {
            PlanOutcome::Exhausted
        } else {
            PlanOutcome::Last
        };
        self.remaining = 0;
        None
    }

    fn emit(&mut self, start: usize, len: usize) -> Segment {
        self.remaining -= len;
        self.planned += len;
        Segment {
            start,
            len,
            heading: self.heading,
        }
    }

    fn lower_bound(&self) -> usize {
        match self.mode {
            Mode::OneShot => self.region.start,
            Mode::Loop | Mode::PingPong => self.region.loop_pos,
        }
    }
}

impl Iterator for ReadPlanner {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let Region { end, loop_pos, .. } = self.region;

        while self.remaining > 0 {
            match self.heading {
                Heading::Up => {
                    let available = end - self.cursor;
                    if available == 0 {
                        match self.mode {
                            Mode::OneShot => return self.finish(),
                            Mode::Loop => self.cursor = loop_pos,
                            Mode::PingPong => {
                                self.heading = Heading::Down;
                                self.cursor = end - 1;
                                self.turns += 1;
                            }
                        }
                        continue;
                    }

                    let len = available.min(self.remaining);
                    let segment = self.emit(self.cursor, len);
                    self.cursor += len;
                    if self.cursor == end {
                        match self.mode {
                            Mode::OneShot => {
                                self.outcome = PlanOutcome::Last;
                                self.remaining = 0;
                            }
                            Mode::Loop => self.cursor = loop_pos,
                            Mode::PingPong => {}
                        }
                    }
                    return Some(segment);
                }
                Heading::Down => {
                    let bound = self.lower_bound();
                    let available = self.cursor.saturating_sub(bound);
                    if available == 0 {
                        match self.mode {
                            Mode::OneShot => return self.finish(),
                            Mode::Loop => self.cursor = end,
                            Mode::PingPong => {
                                self.heading = Heading::Up;
                                self.cursor = (loop_pos + 1).min(end);
                                self.turns += 1;
                            }
                        }
                        continue;
                    }

                    let len = available.min(self.remaining);
                    self.cursor -= len;
                    let segment = self.emit(self.cursor, len);
                    if self.cursor == bound {
                        match self.mode {
                            Mode::OneShot => {
                                self.outcome = PlanOutcome::Last;
                                self.remaining = 0;
                            }
                            Mode::Loop => self.cursor = end,
                            Mode::PingPong => {}
                        }
                    }
                    return Some(segment);
                }
            }
        }

        None
    }
}
