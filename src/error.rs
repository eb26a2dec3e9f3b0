//! Error types for the codec and the layers around it.
//!
//! Every failure falls into one of three kinds: the caller handed us
//! something unusable, the underlying I/O failed, or a compressed stream
//! is malformed. None of them is retried inside the crate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before or during encoding
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Source unreadable or sink unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Compressed data does not match the format
    #[error("corrupt compressed data: {0}")]
    Format(#[from] FormatError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Io,
    FormatCorruption,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Io(_) => ErrorKind::Io,
            Error::Format(_) => ErrorKind::FormatCorruption,
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("empty frequency table: cannot build a Huffman tree")]
    EmptyFrequencyTable,

    /// A byte has no code. Cannot happen when the table came from the same tree.
    #[error("no code for byte {0:#04x}")]
    MissingCode(u8),

    #[error("byte {byte:#04x} occurs {count} times, more than a 32-bit header field holds")]
    FrequencyOverflow { byte: u8, count: u64 },

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("unrecognized extension for recovery: {0}")]
    UnrecognizedExtension(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("symbolic link to a directory is not followed: {0}")]
    SymlinkedDirectory(PathBuf),
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("header truncated after {read} of {expected} entries")]
    TruncatedHeader { expected: u32, read: u32 },

    #[error("header declares {0} entries, at most 256 are possible")]
    TooManyEntries(u32),

    #[error("byte {0:#04x} appears twice in the header")]
    DuplicateEntry(u8),

    #[error("byte {0:#04x} has a zero frequency in the header")]
    ZeroFrequency(u8),

    #[error("bitstream ended after {decoded} of {expected} symbols")]
    TruncatedBitstream { expected: u64, decoded: u64 },

    #[error("bit 1 found where the single-symbol code 0 was expected")]
    InvalidSingleSymbolCode,
}

pub type Result<T> = std::result::Result<T, Error>;
