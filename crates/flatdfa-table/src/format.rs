// Binary table format: header parsing, validation and writing.

use crate::TableError;

/// Magic number at the start of every table file ("AFDF" read little-endian).
const MAGIC: u32 = 0x4644_4641;

/// The only format version this crate reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Parsed table file header.
///
/// The header occupies the first 24 bytes of a table file, all fields
/// little-endian `u32`:
/// - bytes 0..4: magic number
/// - bytes 4..8: format version
/// - bytes 8..12: alphabet size
/// - bytes 12..16: word length
/// - bytes 16..20: state count
/// - bytes 20..24: reserved (must be zero)
///
/// The header is followed by `state_count * alphabet_size` little-endian `i32`
/// transitions and then by the result bitmap, one bit per transition slot
/// packed into little-endian `u32` words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    pub alphabet_size: u32,
    pub word_length: u32,
    pub state_count: u32,
}

impl TableHeader {
    /// Number of transition slots described by this header.
    pub fn slot_count(&self) -> usize {
        self.state_count as usize * self.alphabet_size as usize
    }

    /// Number of `u32` words in the result bitmap.
    pub fn bitmap_words(&self) -> usize {
        self.slot_count().div_ceil(32)
    }

    /// Total file size in bytes implied by this header.
    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.slot_count() * size_of::<i32>() + self.bitmap_words() * size_of::<u32>()
    }

    /// Encode the header into its 24-byte form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        buf[4..8].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
        buf[8..12].copy_from_slice(&self.alphabet_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.word_length.to_le_bytes());
        buf[16..20].copy_from_slice(&self.state_count.to_le_bytes());
        buf
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Parses and validates the 24-byte table header.
///
/// Only the header itself is checked here; the caller compares
/// [`TableHeader::file_size`] against the data it actually has.
pub fn parse_header(data: &[u8]) -> Result<TableHeader, TableError> {
    if data.len() < HEADER_SIZE {
        return Err(TableError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    if read_u32(data, 0) != MAGIC {
        return Err(TableError::InvalidMagic);
    }

    let version = read_u32(data, 4);
    if version != FORMAT_VERSION {
        return Err(TableError::UnsupportedVersion(version));
    }

    if read_u32(data, 20) != 0 {
        return Err(TableError::ReservedNotZero);
    }

    Ok(TableHeader {
        alphabet_size: read_u32(data, 8),
        word_length: read_u32(data, 12),
        state_count: read_u32(data, 16),
    })
}
