//! # hufflock
//!
//! Byte-level Huffman compression with an optional repeating-key XOR layer
//! and recursive folder processing.
//!
//! A compressed file is a frequency-table header followed by the packed
//! code bits:
//!
//! ```text
//! u32 entry_count | entry_count × (u8 byte, u32 frequency) | bitstream
//! ```
//!
//! All integers are big-endian; the bitstream is MSB-first and zero-padded to
//! a whole byte. The decoder stops after `Σ frequency` symbols.
//!
//! ```
//! let packed = hufflock::compress(b"abracadabra")?;
//! assert_eq!(hufflock::decompress(&packed)?, b"abracadabra");
//! # Ok::<(), hufflock::Error>(())
//! ```

pub mod codes;
pub mod compress;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod header;
pub mod logger;
pub mod oplog;
pub mod pipeline;
pub mod tree;
pub mod utils;
pub mod walker;

pub use compress::{compress, decompress, inspect, Inspection};
pub use error::{Error, ErrorKind, Result};
pub use frequency::FrequencyTable;
pub use pipeline::{Operation, Processor, Report};
pub use tree::HuffmanTree;
