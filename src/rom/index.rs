#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::RomError;

/// Identifier of a slice inside a ROM.
pub type SliceId = u32;

/// Slices up to this many samples are single-cycle wavetables rather than
/// playable samples.
pub const WAVETABLE_LEN: usize = 256;

/// Location of one slice inside the PCM data, in words.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceInfo {
    pub id: SliceId,
    pub offset: usize,
    pub len: usize,
}

impl SliceInfo {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Offset/length table built once from the cumulative end offsets of a ROM
/// header. Read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SliceIndex {
    slices: Vec<SliceInfo>,
}

impl SliceIndex {
    pub fn from_end_offsets(end_offsets: &[u32]) -> Result<Self, RomError> {
        let mut slices = Vec::with_capacity(end_offsets.len());
        let mut start = 0usize;

        for (i, &end) in end_offsets.iter().enumerate() {
            let end = end as usize;
            if end < start {
                return Err(RomError::InconsistentOffsets(i));
            }
            slices.push(SliceInfo {
                id: i as SliceId,
                offset: start,
                len: end - start,
            });
            start = end;
        }

        Ok(Self { slices })
    }

    pub fn from_lengths<I>(lengths: I) -> Result<Self, RomError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut ends = Vec::new();
        let mut total = 0usize;
        for len in lengths {
            total += len;
            let end = u32::try_from(total).map_err(|_| RomError::TooLarge(total))?;
            ends.push(end);
        }
        Self::from_end_offsets(&ends)
    }

    #[inline]
    pub fn get(&self, id: SliceId) -> Option<&SliceInfo> {
        self.slices.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Words covered by every slice together.
    pub fn total_words(&self) -> usize {
        self.slices.last().map_or(0, SliceInfo::end)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SliceInfo> {
        self.slices.iter()
    }

    pub fn end_offsets(&self) -> Vec<u32> {
        self.slices.iter().map(|s| s.end() as u32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_from_cumulative_ends() {
        let index = SliceIndex::from_end_offsets(&[256, 256, 1256]).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(0).map(|s| (s.offset, s.len)), Some((0, 256)));
        assert_eq!(index.get(1).map(|s| (s.offset, s.len)), Some((256, 0)));
        assert_eq!(index.get(2).map(|s| (s.offset, s.len)), Some((256, 1000)));
        assert!(index.get(3).is_none());
        assert_eq!(index.total_words(), 1256);
    }

    #[test]
    fn test_descending_offsets_rejected() {
        let err = SliceIndex::from_end_offsets(&[100, 50]).unwrap_err();
        assert!(matches!(err, RomError::InconsistentOffsets(1)));
    }

    #[test]
    fn test_lengths_build_same_table() {
        let index = SliceIndex::from_lengths([10, 20]).unwrap();
        assert_eq!(index.end_offsets(), vec![10, 30]);
    }
}
