use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Mutex;

use super::error::RomError;
use super::format::decode_words;

/// Backing store for the PCM words of a ROM, addressed in words from the
/// start of the data region.
pub trait RomStorage: Send + Sync {
    /// Fill all of `dst` starting at `word_offset`. On error `dst` may be
    /// partially written and the caller treats the rest as untouched.
    fn read_words(&self, dst: &mut [i16], word_offset: usize) -> Result<(), RomError>;

    /// Number of words available.
    fn word_len(&self) -> usize;
}

/// PCM data held in RAM.
pub struct MemoryStorage {
    words: Vec<i16>,
}

impl MemoryStorage {
    pub fn new(words: Vec<i16>) -> Self {
        Self { words }
    }
}

impl RomStorage for MemoryStorage {
    fn read_words(&self, dst: &mut [i16], word_offset: usize) -> Result<(), RomError> {
        let end = word_offset + dst.len();
        let src = self
            .words
            .get(word_offset..end)
            .ok_or(RomError::TruncatedData {
                needed: end,
                available: self.words.len(),
            })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn word_len(&self) -> usize {
        self.words.len()
    }
}

/// Bytes moved per positioned read, staged on the stack.
const FILE_CHUNK_BYTES: usize = 512;

/// PCM data served straight from a ROM file: the slow path.
///
/// Reads never wait on each other; a read that finds the file handle in use
/// fails with [`RomError::StorageBusy`] and leaves its destination alone.
pub struct FileStorage {
    file: Mutex<File>,
    data_start: u64,
    word_len: usize,
}

impl FileStorage {
    /// `data_start` is the byte position of the first PCM word.
    pub fn new(file: File, data_start: u64, word_len: usize) -> Self {
        Self {
            file: Mutex::new(file),
            data_start,
            word_len,
        }
    }
}

impl RomStorage for FileStorage {
    fn read_words(&self, dst: &mut [i16], word_offset: usize) -> Result<(), RomError> {
        let end = word_offset + dst.len();
        if end > self.word_len {
            return Err(RomError::TruncatedData {
                needed: end,
                available: self.word_len,
            });
        }

        let mut file = self.file.try_lock().map_err(|_| RomError::StorageBusy)?;
        file.seek(SeekFrom::Start(self.data_start + 2 * word_offset as u64))?;

        let mut staging = [0u8; FILE_CHUNK_BYTES];
        for chunk in dst.chunks_mut(FILE_CHUNK_BYTES / 2) {
            let bytes = &mut staging[..chunk.len() * 2];
            file.read_exact(bytes)?;
            decode_words(bytes, chunk);
        }
        Ok(())
    }

    fn word_len(&self) -> usize {
        self.word_len
    }
}
