/// Error types for loading and serving a sample ROM.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    #[error("Bad ROM magic: expected 0xDEADFACE, found {0:#010x}")]
    BadMagic(u32),

    #[error("ROM header truncated: need {needed} bytes, have {available}")]
    TruncatedHeader { needed: usize, available: usize },

    #[error("ROM data truncated: need {needed} words, have {available}")]
    TruncatedData { needed: usize, available: usize },

    #[error("Slice offset table is not ascending at slice {0}")]
    InconsistentOffsets(usize),

    #[error("ROM too large: {0} words do not fit 32-bit offsets")]
    TooLarge(usize),

    #[error("Storage busy")]
    StorageBusy,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
