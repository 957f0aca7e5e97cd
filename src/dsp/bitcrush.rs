//! Bit reduction and PCM conversion for the 16-bit words stored in a ROM.

/// Most low bits that may be masked off a 16-bit word.
pub const MAX_REDUCTION: u8 = 14;

/// Scale mapping an `i16` word into [-1, 1].
pub const PCM_SCALE: f32 = 1.0 / 32_767.0;

/// Mask clearing the lowest `bits` bits. `bits` is clamped to `MAX_REDUCTION`.
#[inline]
pub fn reduction_mask(bits: u8) -> i16 {
    let bits = bits.min(MAX_REDUCTION);
    !((1i16 << bits) - 1)
}

/// Mask off low bits in place; 0 bits is a no-op.
pub fn reduce(words: &mut [i16], bits: u8) {
    if bits == 0 {
        return;
    }
    let mask = reduction_mask(bits);
    for word in words.iter_mut() {
        *word &= mask;
    }
}

#[inline]
pub fn pcm_to_f32(word: i16) -> f32 {
    // i16::MIN lands just below -1.0
    (word as f32 * PCM_SCALE).max(-1.0)
}

/// Convert `src` into `dst`, element by element, up to the shorter length.
pub fn convert(src: &[i16], dst: &mut [f32]) {
    for (out, &word) in dst.iter_mut().zip(src) {
        *out = pcm_to_f32(word);
    }
}
