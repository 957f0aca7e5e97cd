use std::f32::consts::FRAC_PI_2;

/// Number of output frames covered by a start or end fade.
pub const FADE_LEN: usize = 16;

/// Multipliers for the four guard samples ahead of the first fresh sample of
/// a triggered slice, so the interpolator glides in from silence.
pub const GUARD_RAMP: [f32; 4] = [0.001, 0.01, 0.1, 0.5];

/// Equal-power (quarter sine/cosine) fade curves, built once outside the
/// audio path.
#[derive(Debug, Clone)]
pub struct FadeTable {
    fade_in: [f32; FADE_LEN],
    fade_out: [f32; FADE_LEN],
}

impl Default for FadeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeTable {
    pub fn new() -> Self {
        let mut fade_in = [0.0; FADE_LEN];
        let mut fade_out = [0.0; FADE_LEN];
        let last = (FADE_LEN - 1) as f32;

        for i in 0..FADE_LEN {
            let angle = FRAC_PI_2 * i as f32 / last;
            fade_in[i] = angle.sin();
            fade_out[i] = angle.cos();
        }

        Self { fade_in, fade_out }
    }

    pub fn fade_in(&self) -> &[f32; FADE_LEN] {
        &self.fade_in
    }

    pub fn fade_out(&self) -> &[f32; FADE_LEN] {
        &self.fade_out
    }

    /// Scale the head of `buffer` by the ascending curve.
    pub fn apply_fade_in(&self, buffer: &mut [f32]) {
        Self::apply(&self.fade_in, buffer, 0);
    }

    /// Scale the tail of `buffer` by the descending curve.
    pub fn apply_fade_out(&self, buffer: &mut [f32]) {
        let offset = buffer.len().saturating_sub(FADE_LEN);
        Self::apply(&self.fade_out, buffer, offset);
    }

    fn apply(curve: &[f32; FADE_LEN], buffer: &mut [f32], offset: usize) {
        let span = buffer.len() - offset;
        if span == 0 {
            return;
        }

        for (i, sample) in buffer[offset..].iter_mut().enumerate() {
            // shorter spans stretch the whole curve over what is there
            let index = if span < FADE_LEN {
                (i * (FADE_LEN - 1)) / (span - 1).max(1)
            } else {
                i
            };
            *sample *= curve[index.min(FADE_LEN - 1)];
        }
    }
}
