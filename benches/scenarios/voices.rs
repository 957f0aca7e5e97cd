//! Benchmarks for complete streaming voices.
//!
//! Each voice reads from an in-memory ROM so the numbers cover the voice
//! itself rather than disk latency.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use rompler_dsp::dsp::FilterType;
use rompler_dsp::{Params, SampleRom, Voice};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn bench_rom() -> Arc<SampleRom> {
    // one second of a decaying saw, long enough that no case runs out
    let slice: Vec<i16> = (0..48_000)
        .map(|i| {
            let saw = ((i % 110) as f32 / 55.0) - 1.0;
            let decay = 1.0 - i as f32 / 48_000.0;
            (saw * decay * 20_000.0) as i16
        })
        .collect();

    match SampleRom::from_slices([slice]) {
        Ok(rom) => Arc::new(rom),
        Err(e) => panic!("bench ROM: {e}"),
    }
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let rom = bench_rom();

    let looping = Params {
        gate: true,
        looping: true,
        loop_marker: 0.5,
        ..Params::default()
    };

    let cases = [
        // baseline: unity rate, no filter
        ("unity_loop", looping),
        // increment > 1 runs the anti-aliasing cascade
        (
            "octave_up",
            Params {
                pitch: 12.0,
                ..looping
            },
        ),
        // worst case read: every block needs the maximum increment
        (
            "max_increment",
            Params {
                pitch: 48.0,
                ..looping
            },
        ),
        (
            "ping_pong",
            Params {
                ping_pong: true,
                ..looping
            },
        ),
        // full modulation path with the post filter engaged
        (
            "modulated",
            Params {
                filter_type: FilterType::LowPass,
                cutoff: 0.6,
                resonance: 4.0,
                lfo_speed: 5.0,
                lfo_fm: 0.5,
                lfo_am: 0.3,
                eg_am: 1.0,
                eg_filter_fm: 0.3,
                bit_reduction: 4,
                ..looping
            },
        ),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, params) in cases {
            let mut voice = Voice::new(rom.clone(), SAMPLE_RATE);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    voice.process(black_box(&params), black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
