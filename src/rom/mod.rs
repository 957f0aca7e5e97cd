//! Sample ROM: an index of audio slices over slow backing storage.
//!
//! A ROM is built once, wrapped in an `Arc` and shared read-only by every
//! voice. Loading, mirroring and serializing happen outside the audio thread;
//! the [`SampleSource`] methods are the only part the audio thread touches.

mod error;
mod format;
mod index;
mod storage;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

pub use error::RomError;
pub use format::{header_len, RomHeader, ROM_MAGIC};
pub use index::{SliceId, SliceIndex, SliceInfo, WAVETABLE_LEN};
pub use storage::{FileStorage, MemoryStorage, RomStorage};

use crate::dsp::bitcrush::pcm_to_f32;

/// Read contract between a voice and whatever holds its sample data.
pub trait SampleSource: Send + Sync {
    fn has_slice(&self, id: SliceId) -> bool;

    /// Length in samples, 0 if the slice does not exist.
    fn slice_len(&self, id: SliceId) -> usize;

    fn slice_count(&self) -> usize;

    /// Copy samples `[offset, offset + dst.len())` of a slice into `dst`.
    ///
    /// Only the in-bounds prefix is written; anything past the end of the
    /// slice, or the whole of `dst` if the storage cannot serve the read,
    /// is left untouched. Never blocks on other readers.
    fn read_slice(&self, dst: &mut [i16], id: SliceId, offset: usize);
}

/// RAM copy of the leading slices of a ROM.
struct Mirror {
    words: Vec<i16>,
    slices: usize,
}

pub struct SampleRom {
    index: SliceIndex,
    storage: Box<dyn RomStorage>,
    mirror: Option<Mirror>,
    // failed storage reads since the last `take_read_failures`
    read_failures: AtomicU64,
}

impl SampleRom {
    pub fn new(index: SliceIndex, storage: Box<dyn RomStorage>) -> Result<Self, RomError> {
        let needed = index.total_words();
        let available = storage.word_len();
        if available < needed {
            return Err(RomError::TruncatedData { needed, available });
        }

        Ok(Self {
            index,
            storage,
            mirror: None,
            read_failures: AtomicU64::new(0),
        })
    }

    /// Parse a complete ROM blob held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RomError> {
        let header = RomHeader::parse(bytes)?;
        let index = SliceIndex::from_end_offsets(&header.end_offsets)?;

        let data = &bytes[header.encoded_len()..];
        let mut words = vec![0i16; data.len() / 2];
        format::decode_words(data, &mut words);

        debug!(
            slices = index.len(),
            words = words.len(),
            "parsed in-memory sample ROM"
        );
        Self::new(index, Box::new(MemoryStorage::new(words)))
    }

    /// Open a ROM file. The slice index is read now; sample data stays on
    /// disk and is fetched on demand until [`SampleRom::mirror_in_ram`] is
    /// called.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RomError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = file.metadata()?.len() as usize;

        let mut reader = BufReader::new(file);
        let header = RomHeader::read_from(&mut reader, file_len)?;
        let index = SliceIndex::from_end_offsets(&header.end_offsets)?;

        let data_start = header.encoded_len();
        let word_len = file_len.saturating_sub(data_start) / 2;
        let storage = FileStorage::new(reader.into_inner(), data_start as u64, word_len);

        info!(
            path = %path.display(),
            slices = index.len(),
            data_bytes = header.data_bytes,
            "opened sample ROM"
        );
        Self::new(index, Box::new(storage))
    }

    /// Build an in-memory ROM from raw slices, in order.
    pub fn from_slices<I, S>(slices: I) -> Result<Self, RomError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[i16]>,
    {
        let mut words = Vec::new();
        let mut lengths = Vec::new();
        for slice in slices {
            let slice = slice.as_ref();
            lengths.push(slice.len());
            words.extend_from_slice(slice);
        }

        let index = SliceIndex::from_lengths(lengths)?;
        Self::new(index, Box::new(MemoryStorage::new(words)))
    }

    /// Serialize into the ROM blob format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RomError> {
        let total_words = self.index.total_words();
        let data_bytes =
            u32::try_from(total_words * 2).map_err(|_| RomError::TooLarge(total_words))?;
        let header = RomHeader {
            data_bytes,
            end_offsets: self.index.end_offsets(),
        };

        let mut words = vec![0i16; total_words];
        self.storage.read_words(&mut words, 0)?;

        let mut bytes = Vec::with_capacity(header.encoded_len() + total_words * 2);
        header.write_to(&mut bytes)?;
        format::encode_words(&words, &mut bytes)?;
        Ok(bytes)
    }

    /// Copy as many leading slices as fit in `budget_bytes` into RAM. Reads of
    /// those slices are then served from the copy. Returns how many slices
    /// were mirrored; calling again replaces the previous mirror.
    pub fn mirror_in_ram(&mut self, budget_bytes: usize) -> Result<usize, RomError> {
        let budget_words = budget_bytes / 2;
        let slices = self
            .index
            .iter()
            .take_while(|slice| slice.end() <= budget_words)
            .count();
        let words_len = self
            .index
            .iter()
            .take(slices)
            .last()
            .map_or(0, SliceInfo::end);

        self.mirror = None;
        if slices == 0 {
            info!(budget_bytes, "no slice fits the RAM mirror budget");
            return Ok(0);
        }

        let mut words = vec![0i16; words_len];
        self.storage.read_words(&mut words, 0)?;
        self.mirror = Some(Mirror { words, slices });

        info!(
            slices,
            of = self.index.len(),
            bytes = words_len * 2,
            "mirrored sample ROM slices in RAM"
        );
        Ok(slices)
    }

    pub fn mirrored_slices(&self) -> usize {
        self.mirror.as_ref().map_or(0, |m| m.slices)
    }

    pub fn index(&self) -> &SliceIndex {
        &self.index
    }

    pub fn slice_info(&self, id: SliceId) -> Option<SliceInfo> {
        self.index.get(id).copied()
    }

    /// First slice long enough to be a sample rather than a wavetable.
    pub fn first_sample_slice(&self) -> Option<SliceId> {
        self.index
            .iter()
            .find(|slice| slice.len > WAVETABLE_LEN)
            .map(|slice| slice.id)
    }

    /// Total samples in slices `first..=last`; 0 if the range is empty or
    /// reaches past the index.
    pub fn slice_group_len(&self, first: SliceId, last: SliceId) -> usize {
        if last < first || last as usize >= self.index.len() {
            return 0;
        }
        (first..=last).map(|id| self.slice_len(id)).sum()
    }

    /// Storage reads that failed since the previous call, resetting the
    /// count. Reads run on the audio thread and never log; poll this from a
    /// control thread to report them.
    pub fn take_read_failures(&self) -> u64 {
        self.read_failures.swap(0, Ordering::Relaxed)
    }

    /// Like [`SampleSource::read_slice`], converted to floats in [-1, 1].
    pub fn read_slice_f32(&self, dst: &mut [f32], id: SliceId, offset: usize) {
        const CHUNK: usize = 256;
        let mut staging = [0i16; CHUNK];

        let len = self.slice_len(id);
        let valid = len.saturating_sub(offset).min(dst.len());

        for (i, out) in dst[..valid].chunks_mut(CHUNK).enumerate() {
            let words = &mut staging[..out.len()];
            words.fill(0);
            self.read_slice(words, id, offset + i * CHUNK);
            for (sample, &word) in out.iter_mut().zip(words.iter()) {
                *sample = pcm_to_f32(word);
            }
        }
    }
}

impl SampleSource for SampleRom {
    #[inline]
    fn has_slice(&self, id: SliceId) -> bool {
        self.index.get(id).is_some()
    }

    #[inline]
    fn slice_len(&self, id: SliceId) -> usize {
        self.index.get(id).map_or(0, |slice| slice.len)
    }

    fn slice_count(&self) -> usize {
        self.index.len()
    }

    fn read_slice(&self, dst: &mut [i16], id: SliceId, offset: usize) {
        let Some(slice) = self.index.get(id) else {
            return;
        };
        if offset >= slice.len {
            return;
        }

        let n = dst.len().min(slice.len - offset);
        let start = slice.offset + offset;
        let dst = &mut dst[..n];

        if let Some(mirror) = self.mirror.as_ref().filter(|m| (id as usize) < m.slices) {
            if let Some(src) = mirror.words.get(start..start + n) {
                dst.copy_from_slice(src);
                return;
            }
        }

        if self.storage.read_words(dst, start).is_err() {
            self.read_failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, base: i16) -> Vec<i16> {
        (0..len).map(|i| base.wrapping_add(i as i16)).collect()
    }

    fn demo_rom() -> SampleRom {
        SampleRom::from_slices([ramp(256, 0), ramp(1000, 1000), ramp(300, -500)]).unwrap()
    }

    #[test]
    fn test_slice_queries() {
        let rom = demo_rom();

        assert_eq!(rom.slice_count(), 3);
        assert!(rom.has_slice(2));
        assert!(!rom.has_slice(3));
        assert_eq!(rom.slice_len(1), 1000);
        assert_eq!(rom.slice_len(7), 0);
        assert_eq!(rom.first_sample_slice(), Some(1));
        assert_eq!(rom.slice_group_len(0, 1), 1256);
        assert_eq!(rom.slice_group_len(1, 1), 1000);
        assert_eq!(rom.slice_group_len(2, 1), 0);
        assert_eq!(rom.slice_group_len(0, 3), 0);
    }

    #[test]
    fn test_read_slice_partial_fill() {
        let rom = demo_rom();
        let mut dst = [i16::MAX; 8];

        rom.read_slice(&mut dst, 1, 996);

        assert_eq!(&dst[..4], &[1996, 1997, 1998, 1999]);
        assert_eq!(&dst[4..], &[i16::MAX; 4]);
    }

    #[test]
    fn test_read_missing_slice_leaves_buffer() {
        let rom = demo_rom();
        let mut dst = [7i16; 4];

        rom.read_slice(&mut dst, 9, 0);
        rom.read_slice(&mut dst, 0, 256);

        assert_eq!(dst, [7; 4]);
    }

    #[test]
    fn test_blob_round_trip() {
        let rom = demo_rom();
        let bytes = rom.to_bytes().unwrap();

        assert_eq!(bytes.len(), header_len(3) + 1556 * 2);

        let parsed = SampleRom::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.slice_info(2), rom.slice_info(2));

        let mut a = [0i16; 300];
        let mut b = [0i16; 300];
        rom.read_slice(&mut a, 2, 0);
        parsed.read_slice(&mut b, 2, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_pcm_data_is_rejected() {
        let mut bytes = demo_rom().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 2);

        assert!(matches!(
            SampleRom::from_bytes(&bytes),
            Err(RomError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_mirror_serves_identical_data() {
        let mut rom = demo_rom();
        let mut before = [0i16; 64];
        rom.read_slice(&mut before, 1, 100);

        // slices 0 and 1 fit, slice 2 does not
        let mirrored = rom.mirror_in_ram(1256 * 2 + 10).unwrap();
        assert_eq!(mirrored, 2);
        assert_eq!(rom.mirrored_slices(), 2);

        let mut after = [0i16; 64];
        rom.read_slice(&mut after, 1, 100);
        assert_eq!(before, after);

        assert_eq!(rom.mirror_in_ram(10).unwrap(), 0);
        assert_eq!(rom.mirrored_slices(), 0);
    }

    #[test]
    fn test_read_as_float() {
        let rom = SampleRom::from_slices([vec![0i16, 32767, -32767]]).unwrap();
        let mut dst = [0.5f32; 4];

        rom.read_slice_f32(&mut dst, 0, 0);

        assert_eq!(dst[0], 0.0);
        assert!((dst[1] - 1.0).abs() < 1e-6);
        assert!((dst[2] + 1.0).abs() < 1e-6);
        assert_eq!(dst[3], 0.5);
    }

    struct UnavailableStorage {
        word_len: usize,
    }

    impl RomStorage for UnavailableStorage {
        fn read_words(&self, _dst: &mut [i16], _word_offset: usize) -> Result<(), RomError> {
            Err(RomError::StorageBusy)
        }

        fn word_len(&self) -> usize {
            self.word_len
        }
    }

    #[test]
    fn test_failed_reads_are_counted_not_logged() {
        let index = SliceIndex::from_lengths([1000]).unwrap();
        let rom = SampleRom::new(index, Box::new(UnavailableStorage { word_len: 1000 })).unwrap();

        let mut dst = [7i16; 16];
        rom.read_slice(&mut dst, 0, 0);
        rom.read_slice(&mut dst, 0, 500);

        assert_eq!(dst, [7; 16]);
        assert_eq!(rom.take_read_failures(), 2);
        assert_eq!(rom.take_read_failures(), 0);
    }

    #[test]
    fn test_memory_reads_count_no_failures() {
        let rom = demo_rom();
        let mut dst = [0i16; 32];

        rom.read_slice(&mut dst, 1, 0);
        rom.read_slice(&mut dst, 9, 0);

        assert_eq!(rom.take_read_failures(), 0);
    }
}
