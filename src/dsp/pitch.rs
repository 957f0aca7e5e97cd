/// Lowest post-filter cutoff, at a normalized cutoff of 0.0.
pub const CUTOFF_MIN_HZ: f32 = 20.0;
/// Octaves spanned by the normalized cutoff range.
pub const CUTOFF_OCTAVES: f32 = 10.0;

/// Playback ratio for a pitch offset in semitones.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones / 12.0).exp2()
}

/// Map a normalized cutoff in [0, 1] onto 20 Hz .. 20.48 kHz, one octave per
/// tenth of the range.
#[inline]
pub fn cutoff_to_hz(normalized: f32) -> f32 {
    let normalized = if normalized.is_finite() {
        normalized.clamp(0.0, 1.0)
    } else {
        0.0
    };
    CUTOFF_MIN_HZ * (normalized * CUTOFF_OCTAVES).exp2()
}
