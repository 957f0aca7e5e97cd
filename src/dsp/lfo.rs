//! Sine LFO driving pitch, amplitude and filter modulation of a voice.

use std::f32::consts::TAU;

/*
Control-Rate Modulation
=======================

The voice runs one free-running sine LFO. It is never re-synced on a gate,
so two notes played back to back pick the sweep up wherever it is.

  bipolar         -1.0 to +1.0. Pitch and filter depth use this directly,
                  so the destination moves above AND below its centre.

  unipolar        0.0 to 1.0. Amplitude depth uses this so tremolo only
                  ever pulls the level down:

                      am = 1.0 - unipolar(lfo) * depth

    bipolar   unipolar
    -1.0      0.0
     0.0      0.5
    +1.0      1.0

Phase is kept in cycles (0..1) rather than radians so the wrap is a single
subtraction and precision does not degrade over long sessions.
*/

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

pub struct SineLfo {
    phase: f32,
    increment: f32,
    frequency: f32,
    sample_rate: f32,
}

impl SineLfo {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
            frequency: 0.0,
            sample_rate: sample_rate.max(1.0),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.set_frequency(self.frequency);
    }

    /// Negative or non-finite frequencies freeze the LFO.
    pub fn set_frequency(&mut self, frequency_hz: f32) {
        let frequency = if frequency_hz.is_finite() {
            frequency_hz.max(0.0)
        } else {
            0.0
        };
        self.frequency = frequency;
        self.increment = frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_to_unipolar() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((bipolar_to_unipolar(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sine_lfo_stays_bipolar() {
        let mut lfo = SineLfo::new(48_000.0);
        lfo.set_frequency(7.0);

        for _ in 0..48_000 {
            let value = lfo.next_sample();
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_sine_lfo_quarter_period_peaks() {
        // 1 Hz at 400 Hz sample rate: sample 100 is a quarter cycle in
        let mut lfo = SineLfo::new(400.0);
        lfo.set_frequency(1.0);

        let mut value = 0.0;
        for _ in 0..=100 {
            value = lfo.next_sample();
        }
        assert!((value - 1.0).abs() < 1e-3, "expected peak, got {}", value);
    }

    #[test]
    fn test_zero_frequency_holds_still() {
        let mut lfo = SineLfo::new(48_000.0);
        lfo.set_frequency(f32::NAN);

        for _ in 0..64 {
            assert_eq!(lfo.next_sample(), 0.0);
        }
    }
}
