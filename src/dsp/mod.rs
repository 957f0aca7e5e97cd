//! Low-level DSP primitives used by the streaming voice.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math so the voice can layer on orchestration and
//! modulation.

/// RBJ low-pass biquad used for anti-aliasing before resampling.
pub mod biquad;
/// Bit reduction and PCM word conversion.
pub mod bitcrush;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Equal-power fade curves for slice start and end.
pub mod fade;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// 4-point Hermite interpolation.
pub mod interpolate;
/// Sine LFO and bipolar/unipolar helpers.
pub mod lfo;
/// Semitone ratios and exponential cutoff mapping.
pub mod pitch;

pub use envelope::{Envelope, EnvelopeCurve, EnvelopeState};
pub use filter::{FilterType, SVFilter};
