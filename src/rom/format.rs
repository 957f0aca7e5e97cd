use std::io::{self, Read, Write};

use super::error::RomError;

/*
ROM Blob Layout
===============

Everything is little endian.

    offset  size          field
    ------  ------------  ---------------------------------------------
    0       u32           magic, 0xDEADFACE
    4       u32           total size of the PCM data in bytes
    8       u32           slice count N
    12      N x u32       cumulative END offset of each slice, in words
    12+4N   ...           PCM data, i16 words, slices back to back

Slice i therefore starts at end[i-1] (0 for the first slice) and is
end[i] - end[i-1] words long. The header is 12 + 4N bytes.
*/

pub const ROM_MAGIC: u32 = 0xDEAD_FACE;

const FIXED_HEADER_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    pub data_bytes: u32,
    pub end_offsets: Vec<u32>,
}

impl RomHeader {
    pub fn slice_count(&self) -> usize {
        self.end_offsets.len()
    }

    /// Size of the encoded header; the PCM data starts right after it.
    pub fn encoded_len(&self) -> usize {
        header_len(self.slice_count())
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, RomError> {
        let mut reader = bytes;
        Self::read_from(&mut reader, bytes.len())
    }

    /// Read a header from the front of `reader`. `available` is only used to
    /// report how much data there was when the header turns out to be short.
    pub fn read_from<R: Read>(reader: &mut R, available: usize) -> Result<Self, RomError> {
        let truncated = |needed: usize| RomError::TruncatedHeader { needed, available };

        let magic = read_u32(reader).map_err(|e| eof_or(e, truncated(FIXED_HEADER_LEN)))?;
        if magic != ROM_MAGIC {
            return Err(RomError::BadMagic(magic));
        }
        let data_bytes = read_u32(reader).map_err(|e| eof_or(e, truncated(FIXED_HEADER_LEN)))?;
        let count = read_u32(reader).map_err(|e| eof_or(e, truncated(FIXED_HEADER_LEN)))? as usize;

        let needed = header_len(count);
        if available < needed {
            return Err(truncated(needed));
        }

        let mut end_offsets = Vec::with_capacity(count);
        for _ in 0..count {
            end_offsets.push(read_u32(reader).map_err(|e| eof_or(e, truncated(needed)))?);
        }

        Ok(Self {
            data_bytes,
            end_offsets,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&ROM_MAGIC.to_le_bytes())?;
        writer.write_all(&self.data_bytes.to_le_bytes())?;
        writer.write_all(&(self.end_offsets.len() as u32).to_le_bytes())?;
        for end in &self.end_offsets {
            writer.write_all(&end.to_le_bytes())?;
        }
        Ok(())
    }
}

pub fn header_len(slice_count: usize) -> usize {
    FIXED_HEADER_LEN + 4 * slice_count
}

/// Decode little-endian PCM bytes into `dst`, up to the shorter of the two.
pub fn decode_words(bytes: &[u8], dst: &mut [i16]) {
    for (word, pair) in dst.iter_mut().zip(bytes.chunks_exact(2)) {
        *word = i16::from_le_bytes([pair[0], pair[1]]);
    }
}

pub fn encode_words<W: Write>(words: &[i16], writer: &mut W) -> io::Result<()> {
    for word in words {
        writer.write_all(&word.to_le_bytes())?;
    }
    Ok(())
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn eof_or(error: io::Error, truncated: RomError) -> RomError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        truncated
    } else {
        RomError::IoError(error)
    }
}
