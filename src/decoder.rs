//! Huffman decoder: rebuilds the tree from the header and walks it bit by bit.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::debug;

use crate::error::{FormatError, Result};
use crate::header;
use crate::tree::{HuffmanTree, Node};

const WRITE_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Bytes written to the sink
    pub symbols: u64,
    pub distinct: usize,
}

/// Decode a header and bitstream from `source` into `sink`.
///
/// Decoding stops as soon as the number of symbols given by the header has
/// been produced; padding bits and anything after them are never read.
pub fn decode<R: Read, W: Write>(mut source: R, mut sink: W) -> Result<DecodeSummary> {
    let table = header::read_header(&mut source)?;
    let expected = table.total();
    let summary = DecodeSummary {
        symbols: expected,
        distinct: table.len(),
    };
    if table.is_empty() {
        sink.flush()?;
        return Ok(summary);
    }

    let tree = HuffmanTree::build(&table)?;
    debug!(distinct = table.len(), expected, "rebuilt tree from header");

    let root = tree.root();
    let mut reader = BitReader::endian(source, BigEndian);
    let mut out = Vec::with_capacity(WRITE_CHUNK.min(expected as usize));
    let mut current = root;
    let mut decoded = 0u64;

    while decoded < expected {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(FormatError::TruncatedBitstream { expected, decoded }.into());
            }
            Err(e) => return Err(e.into()),
        };

        let next = match current {
            // only reachable when the whole tree is one leaf
            Node::Leaf { .. } => {
                if bit {
                    return Err(FormatError::InvalidSingleSymbolCode.into());
                }
                current
            }
            Node::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
        };

        match next {
            Node::Leaf { byte, .. } => {
                out.push(*byte);
                decoded += 1;
                current = root;
                if out.len() >= WRITE_CHUNK {
                    sink.write_all(&out)?;
                    out.clear();
                }
            }
            Node::Internal { .. } => current = next,
        }
    }

    sink.write_all(&out)?;
    sink.flush()?;
    Ok(summary)
}
