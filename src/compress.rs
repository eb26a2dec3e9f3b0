//! Whole-buffer compression helpers and header inspection.

use std::io::Read;

use crate::codes::CodeTable;
use crate::decoder;
use crate::encoder;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::header;
use crate::tree::HuffmanTree;

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encoder::encode_bytes(data, &mut out)?;
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decoder::decode(data, &mut out)?;
    Ok(out)
}

/// Header contents of a compressed stream and the codes it implies.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub table: FrequencyTable,
    /// `None` for an empty stream
    pub codes: Option<CodeTable>,
    pub header_bytes: u64,
    pub bitstream_bits: u64,
}

impl Inspection {
    pub fn bitstream_bytes(&self) -> u64 {
        self.bitstream_bits.div_ceil(8)
    }

    /// Mean code length in bits per input byte.
    pub fn mean_code_len(&self) -> f64 {
        match self.table.total() {
            0 => 0.0,
            total => self.bitstream_bits as f64 / total as f64,
        }
    }
}

/// Read only the header of a compressed stream.
pub fn inspect<R: Read>(mut source: R) -> Result<Inspection> {
    let table = header::read_header(&mut source)?;
    let codes = if table.is_empty() {
        None
    } else {
        Some(CodeTable::from_tree(&HuffmanTree::build(&table)?))
    };
    let bitstream_bits = codes.as_ref().map_or(0, |c| c.encoded_bits(&table));
    Ok(Inspection {
        header_bytes: header::header_len(&table),
        table,
        codes,
        bitstream_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_text() {
        let text = b"Peter Piper picked a peck of pickled peppers".repeat(20);
        let packed = compress(&text).unwrap();
        assert!(packed.len() < text.len());
        assert_eq!(decompress(&packed).unwrap(), text);
    }

    #[test]
    fn round_trips_empty() {
        let packed = compress(&[]).unwrap();
        assert_eq!(packed, vec![0, 0, 0, 0]);
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn round_trips_every_byte_value() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn inspect_reads_header_only() {
        let data = b"aaaabbc";
        let mut packed = compress(data).unwrap();
        packed.truncate(header::header_len(&FrequencyTable::from_bytes(data)) as usize);

        let info = inspect(packed.as_slice()).unwrap();
        assert_eq!(info.table, FrequencyTable::from_bytes(data));
        assert_eq!(info.header_bytes, 4 + 3 * 5);
        // a=1, b=01, c=00: 4 + 4 + 2 bits
        assert_eq!(info.bitstream_bits, 10);
        assert_eq!(info.bitstream_bytes(), 2);
        assert!(info.codes.is_some());
    }

    #[test]
    fn inspect_empty_stream() {
        let info = inspect(&[0u8, 0, 0, 0][..]).unwrap();
        assert!(info.codes.is_none());
        assert_eq!(info.mean_code_len(), 0.0);
    }
}
