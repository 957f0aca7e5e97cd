//! Streaming voice benchmarks.
//!
//! Each case renders a full voice against an in-memory ROM, including the
//! storage reads, interpolation and post filter.

mod voices;

pub use voices::bench_voices;
