//! Demo ROM synthesized at startup when no ROM file is given.

use std::f32::consts::TAU;

use rompler_dsp::rom::{RomError, WAVETABLE_LEN};
use rompler_dsp::SampleRom;

const RATE: f32 = 48_000.0;
const FULL_SCALE: f32 = 24_000.0;

fn to_word(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * FULL_SCALE) as i16
}

/// One sine cycle, short enough to count as a wavetable.
fn sine_table() -> Vec<i16> {
    (0..WAVETABLE_LEN)
        .map(|i| to_word((TAU * i as f32 / WAVETABLE_LEN as f32).sin()))
        .collect()
}

/// Two seconds of a sine sweeping 100 Hz to 2 kHz.
fn sine_sweep() -> Vec<i16> {
    let len = (2.0 * RATE) as usize;
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            let freq = 100.0 * 20f32.powf(t);
            phase = (phase + freq / RATE).fract();
            to_word((TAU * phase).sin())
        })
        .collect()
}

/// One second of a 110 Hz saw with a gentle decay.
fn saw() -> Vec<i16> {
    let len = RATE as usize;
    let period = RATE / 110.0;
    (0..len)
        .map(|i| {
            let ramp = (i as f32 % period) / period * 2.0 - 1.0;
            let decay = 1.0 - 0.5 * i as f32 / len as f32;
            to_word(ramp * decay)
        })
        .collect()
}

/// Half a second of white noise falling off exponentially.
fn noise_burst() -> Vec<i16> {
    let len = (0.5 * RATE) as usize;
    let mut seed = 0x1234_5678u32;
    (0..len)
        .map(|i| {
            // xorshift32
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let white = seed as f32 / u32::MAX as f32 * 2.0 - 1.0;
            let decay = (-6.0 * i as f32 / len as f32).exp();
            to_word(white * decay)
        })
        .collect()
}

pub fn demo_rom() -> Result<SampleRom, RomError> {
    SampleRom::from_slices([sine_table(), sine_sweep(), saw(), noise_burst()])
}
