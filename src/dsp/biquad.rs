use std::f32::consts::TAU;

/*
Anti-Aliasing Biquad
====================

Reading a slice faster than 1:1 squeezes its spectrum upward. Anything that
lands above Nyquist folds back as aliasing, so before interpolation the fresh
samples are low-passed at `0.5 / increment` of the sample rate.

Coefficients follow the RBJ cookbook low-pass, normalized by a0:

    w0    = 2π · f            (f normalized to the sample rate)
    alpha = sin(w0) / (2Q)
    b0 = (1 - cos w0) / 2     b1 = 1 - cos w0     b2 = b0
    a0 = 1 + alpha            a1 = -2 cos w0      a2 = 1 - alpha

The state runs in transposed direct form II, two memories per section.
*/

#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        // unity passthrough until coefficients are set
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }
}

impl Biquad {
    pub fn lowpass(normalized_cutoff: f32, q: f32) -> Self {
        let mut biquad = Self::default();
        biquad.set_lowpass(normalized_cutoff, q);
        biquad
    }

    /// `normalized_cutoff` is a fraction of the sample rate, clamped below Nyquist.
    /// Filter memory is kept so coefficients can change every block.
    pub fn set_lowpass(&mut self, normalized_cutoff: f32, q: f32) {
        let f = normalized_cutoff.clamp(1.0e-5, 0.499);
        let q = q.max(1.0e-3);

        let w0 = TAU * f;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        let a0 = 1.0 + alpha;
        self.b0 = ((1.0 - cos_w0) * 0.5) / a0;
        self.b1 = (1.0 - cos_w0) / a0;
        self.b2 = self.b0;
        self.a1 = (-2.0 * cos_w0) / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak_tail(buffer: &[f32]) -> f32 {
        buffer[buffer.len() / 2..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn test_dc_passes_at_unity() {
        let mut biquad = Biquad::lowpass(0.1, 0.5);
        let mut buffer = vec![1.0; 512];

        biquad.render(&mut buffer);

        assert!((buffer[511] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_attenuates_above_cutoff() {
        let mut biquad = Biquad::lowpass(0.05, 0.5);
        // normalized 0.4: close to Nyquist, far above the cutoff
        let mut buffer: Vec<f32> = (0..512).map(|i| (TAU * 0.4 * i as f32).sin()).collect();

        biquad.render(&mut buffer);

        let peak = peak_tail(&buffer);
        assert!(peak < 0.05, "expected strong attenuation, got {}", peak);
    }

    #[test]
    fn test_reset_clears_memory() {
        let mut biquad = Biquad::lowpass(0.1, 0.5);
        let mut buffer = vec![1.0; 64];
        biquad.render(&mut buffer);

        biquad.reset();

        assert_eq!(biquad.process(0.0), 0.0);
    }

    #[test]
    fn test_default_is_passthrough() {
        let mut biquad = Biquad::default();
        assert_eq!(biquad.process(0.25), 0.25);
        assert_eq!(biquad.process(-0.5), -0.5);
    }
}
