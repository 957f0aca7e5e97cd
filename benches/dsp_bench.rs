//! Benchmarks for DSP primitives and streaming voice scenarios.
//!
//! Run with: cargo bench
//!
//! The voice renders in blocks of at most 128 frames, so these sizes cover
//! every block the audio callback can hand to a primitive.
//!
//! Reference timing at 48kHz sample rate:
//!   - 32 samples  = 0.67ms deadline
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (filter, envelope, interpolation, etc.)
//!   - scenarios/*  Full voices streaming from an in-memory ROM

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Block sizes the voice actually renders with.
pub const BLOCK_SIZES: &[usize] = &[16, 32, 64, 128];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_filter,
    dsp::bench_envelope,
    dsp::bench_biquad,
    dsp::bench_interpolate,
    // Streaming voices
    scenarios::bench_voices,
);
criterion_main!(benches);
