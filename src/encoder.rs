//! Huffman encoder: header followed by the MSB-first, zero-padded bitstream.

use std::io::{self, Cursor, Read, Seek, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use tracing::debug;

use crate::codes::CodeTable;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::header;
use crate::tree::HuffmanTree;

const READ_CHUNK: usize = 64 * 1024;

/// What one encode call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Input length in bytes
    pub symbols: u64,
    /// Distinct byte values in the input
    pub distinct: usize,
    pub header_bytes: u64,
    pub bitstream_bytes: u64,
}

impl EncodeSummary {
    pub fn output_bytes(&self) -> u64 {
        self.header_bytes + self.bitstream_bytes
    }
}

/// Encode `source` into `sink`, reading the source twice.
///
/// The first pass counts byte frequencies, then the source is rewound and
/// the second pass emits codes MSB-first, zero-padding the final byte.
pub fn encode<R: Read + Seek, W: Write>(mut source: R, sink: W) -> Result<EncodeSummary> {
    let table = FrequencyTable::from_reader(&mut source)?;
    source.rewind()?;
    encode_with_table(&table, source, sink)
}

pub fn encode_bytes<W: Write>(data: &[u8], sink: W) -> Result<EncodeSummary> {
    encode(Cursor::new(data), sink)
}

/// Encode with a table already counted over exactly the bytes `source` yields.
pub fn encode_with_table<R: Read, W: Write>(
    table: &FrequencyTable,
    mut source: R,
    mut sink: W,
) -> Result<EncodeSummary> {
    let header_bytes = header::write_header(&mut sink, table)?;
    let mut summary = EncodeSummary {
        symbols: table.total(),
        distinct: table.len(),
        header_bytes,
        bitstream_bytes: 0,
    };
    if table.is_empty() {
        sink.flush()?;
        return Ok(summary);
    }

    let tree = HuffmanTree::build(table)?;
    let codes = CodeTable::from_tree(&tree);
    debug!(
        distinct = table.len(),
        symbols = table.total(),
        "built code table"
    );

    let mut seen = 0u64;
    {
        let mut writer = BitWriter::endian(&mut sink, BigEndian);
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                for &bit in codes.get(byte)?.bits() {
                    writer.write_bit(bit)?;
                }
            }
            seen += n as u64;
        }
        writer.byte_align()?;
    }
    sink.flush()?;

    if seen != table.total() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "input changed between passes: counted {} bytes, encoded {seen}",
                table.total()
            ),
        )
        .into());
    }

    summary.bitstream_bytes = codes.encoded_bits(table).div_ceil(8);
    Ok(summary)
}
