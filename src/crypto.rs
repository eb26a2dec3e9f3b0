//! Repeating-key XOR keystream and the `Read`/`Write` adapters that apply it.

use std::io::{self, Read, Write};

use zeroize::Zeroizing;

use crate::error::{InputError, Result};

/// Repeating-key XOR over the password's UTF-8 bytes.
///
/// Encryption and decryption are the same operation and output length
/// always equals input length. The position carries across calls, so a
/// stream can be transformed in arbitrary pieces.
pub struct XorKeystream {
    key: Zeroizing<Vec<u8>>,
    position: usize,
}

impl XorKeystream {
    pub fn new(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(InputError::EmptyPassword.into());
        }
        Ok(Self {
            key: Zeroizing::new(password.as_bytes().to_vec()),
            position: 0,
        })
    }

    pub fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte ^= self.key[self.position];
            self.position = (self.position + 1) % self.key.len();
        }
    }
}

/// Transform a whole buffer with a fresh keystream.
pub fn xor_bytes(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut keystream = XorKeystream::new(password)?;
    let mut out = data.to_vec();
    keystream.apply(&mut out);
    Ok(out)
}

// Decrypts (or encrypts) everything read through it.
pub struct XorReader<R: Read> {
    reader: R,
    keystream: XorKeystream,
}

impl<R: Read> XorReader<R> {
    pub fn new(reader: R, keystream: XorKeystream) -> Self {
        Self { reader, keystream }
    }
}

impl<R: Read> Read for XorReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes_read = self.reader.read(buf)?;
        self.keystream.apply(&mut buf[..bytes_read]);
        Ok(bytes_read)
    }
}

// Encrypts (or decrypts) everything written through it.
pub struct XorWriter<W: Write> {
    writer: W,
    keystream: XorKeystream,
    scratch: Vec<u8>,
}

impl<W: Write> XorWriter<W> {
    pub fn new(writer: W, keystream: XorKeystream) -> Self {
        Self {
            writer,
            keystream,
            scratch: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Write for XorWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // all or nothing, so the keystream never runs ahead of the sink
        self.scratch.clear();
        self.scratch.extend_from_slice(buf);
        self.keystream.apply(&mut self.scratch);
        self.writer.write_all(&self.scratch)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
