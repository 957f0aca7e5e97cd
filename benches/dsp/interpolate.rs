//! Benchmarks for 4-point Hermite resampling.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rompler_dsp::dsp::interpolate::hermite4;

use crate::BLOCK_SIZES;

pub fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/interpolate");

    for &size in BLOCK_SIZES {
        let increment = 1.5f32;
        let source_len = (size as f32 * increment) as usize + 4;
        let source: Vec<f32> = (0..source_len).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut out = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("hermite", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in out.iter_mut().enumerate() {
                    let pos = i as f32 * increment;
                    let index = pos as usize;
                    let window = [
                        source[index],
                        source[index + 1],
                        source[index + 2],
                        source[index + 3],
                    ];
                    *sample = hermite4(black_box(window), pos.fract());
                }
                black_box(&out);
            })
        });
    }

    group.finish();
}
