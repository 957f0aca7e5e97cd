//! Benchmarks for low-level DSP primitives.

mod biquad;
mod envelope;
mod filter;
mod interpolate;

pub use biquad::bench_biquad;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use interpolate::bench_interpolate;
