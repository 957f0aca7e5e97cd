use crate::dsp::bitcrush;

/// Samples carried from one block to the next for the interpolator.
pub const GUARD_SAMPLES: usize = 4;
/// Total scratch size in samples, guards included.
pub const SCRATCH_CAPACITY: usize = 2048;

/*
Layout of one block:

    index   0   1   2   3   4 ........................ 4 + fresh
          [ g0  g1  g2  g3 | f0  f1  f2 ... f(fresh-1) ]
            carried guards   streamed this block

After the block the last four samples, [fresh, fresh + 4), move to the front
and become the next block's guards.
*/

/// Fixed-capacity working buffer for streamed samples. Allocates once on
/// construction; every accessor is bounds-checked.
pub struct ScratchBuffer {
    samples: Vec<f32>,
    words: Vec<i16>,
    fresh: usize,
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self {
            samples: vec![0.0; SCRATCH_CAPACITY],
            words: vec![0; SCRATCH_CAPACITY - GUARD_SAMPLES],
            fresh: 0,
        }
    }

    /// Largest number of fresh samples a block can hold.
    pub const fn max_fresh() -> usize {
        SCRATCH_CAPACITY - GUARD_SAMPLES
    }

    /// Start a block of `fresh` samples and hand out the zeroed raw word area
    /// to fill. Anything the reads leave untouched stays silent.
    pub fn begin(&mut self, fresh: usize) -> &mut [i16] {
        self.fresh = fresh.min(Self::max_fresh());
        let words = &mut self.words[..self.fresh];
        words.fill(0);
        words
    }

    /// Bit-reduce the raw words and convert them behind the guards.
    pub fn commit(&mut self, bit_reduction: u8) {
        let words = &mut self.words[..self.fresh];
        bitcrush::reduce(words, bit_reduction);
        bitcrush::convert(words, &mut self.samples[GUARD_SAMPLES..GUARD_SAMPLES + self.fresh]);
    }

    pub fn fresh_mut(&mut self) -> &mut [f32] {
        &mut self.samples[GUARD_SAMPLES..GUARD_SAMPLES + self.fresh]
    }

    pub fn guards(&self) -> &[f32] {
        &self.samples[..GUARD_SAMPLES]
    }

    /// Replace the guards with `ramp` scaled by the first fresh sample.
    pub fn ramp_guards(&mut self, ramp: &[f32; GUARD_SAMPLES]) {
        let first = if self.fresh > 0 {
            self.samples[GUARD_SAMPLES]
        } else {
            0.0
        };
        for (guard, &step) in self.samples[..GUARD_SAMPLES].iter_mut().zip(ramp) {
            *guard = first * step;
        }
    }

    /// Four consecutive samples starting at `index`; silence past the end.
    #[inline]
    pub fn window(&self, index: usize) -> [f32; 4] {
        self.samples
            .get(index..index + 4)
            .and_then(|window| window.try_into().ok())
            .unwrap_or([0.0; 4])
    }

    pub fn carry(&mut self) {
        let from = self.fresh;
        self.samples.copy_within(from..from + GUARD_SAMPLES, 0);
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.words.fill(0);
        self.fresh = 0;
    }
}
