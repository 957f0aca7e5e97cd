pub mod dsp; // Realtime-safe signal primitives
pub mod rom; // Sample ROM index and storage
pub mod voice; // Streaming sample voice

pub use rom::{SampleRom, SampleSource, SliceId};
pub use voice::{BufferStatus, Params, PlaybackDirection, Voice, VoiceStatus};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
