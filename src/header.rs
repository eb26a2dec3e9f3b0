//! Compressed file header.
//!
//! ```text
//! entry_count: u32 (big-endian)
//! entry_count × { byte: u8, frequency: u32 (big-endian) }
//! ```
//!
//! Entries are written in the table's first-occurrence order. There is no
//! magic number, no checksum and no padding length: the decoder learns the
//! symbol count from the sum of frequencies, so a damaged header silently
//! changes the output length. Kept as-is for format compatibility.

use std::io::{self, Read, Write};

use crate::error::{FormatError, InputError, Result};
use crate::frequency::FrequencyTable;

pub const COUNT_LEN: u64 = 4;
pub const ENTRY_LEN: u64 = 5;

/// Encoded size of the header for `table`.
pub fn header_len(table: &FrequencyTable) -> u64 {
    COUNT_LEN + ENTRY_LEN * table.len() as u64
}

pub fn write_header<W: Write>(sink: &mut W, table: &FrequencyTable) -> Result<u64> {
    // validate before writing anything
    let entries = table
        .iter()
        .map(|(byte, count)| {
            u32::try_from(count)
                .map(|freq| (byte, freq))
                .map_err(|_| InputError::FrequencyOverflow { byte, count })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    sink.write_all(&(entries.len() as u32).to_be_bytes())?;
    for (byte, freq) in entries {
        sink.write_all(&[byte])?;
        sink.write_all(&freq.to_be_bytes())?;
    }
    Ok(header_len(table))
}

pub fn read_header<R: Read>(source: &mut R) -> Result<FrequencyTable> {
    let count = match read_array::<4, _>(source)? {
        Some(buf) => u32::from_be_bytes(buf),
        None => {
            return Err(FormatError::TruncatedHeader {
                expected: 1,
                read: 0,
            }
            .into());
        }
    };
    if count > 256 {
        return Err(FormatError::TooManyEntries(count).into());
    }

    let mut table = FrequencyTable::new();
    for read in 0..count {
        let Some(entry) = read_array::<5, _>(source)? else {
            return Err(FormatError::TruncatedHeader {
                expected: count,
                read,
            }
            .into());
        };
        let byte = entry[0];
        let freq = u32::from_be_bytes([entry[1], entry[2], entry[3], entry[4]]);
        if freq == 0 {
            return Err(FormatError::ZeroFrequency(byte).into());
        }
        if !table.insert(byte, u64::from(freq)) {
            return Err(FormatError::DuplicateEntry(byte).into());
        }
    }
    Ok(table)
}

// `None` when the source ends before N bytes.
fn read_array<const N: usize, R: Read>(source: &mut R) -> Result<Option<[u8; N]>> {
    let mut buf = [0u8; N];
    match source.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}
