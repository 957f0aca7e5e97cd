//! Benchmarks for the anti-aliasing biquad cascade.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rompler_dsp::dsp::biquad::Biquad;

use crate::BLOCK_SIZES;

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        // up to 15 fresh samples per output frame
        let fresh = size * 15;
        let input: Vec<f32> = (0..fresh).map(|i| ((i * 37) % 200) as f32 / 100.0 - 1.0).collect();

        let mut single = Biquad::lowpass(0.25, 0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                single.render(black_box(&mut buffer));
            })
        });

        let mut cascade = [
            Biquad::lowpass(0.03, 0.5),
            Biquad::lowpass(0.03, 0.5),
            Biquad::lowpass(0.03, 0.5),
        ];
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("cascade_x15", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for stage in cascade.iter_mut() {
                    stage.render(black_box(&mut buffer));
                }
            })
        });
    }

    group.finish();
}
