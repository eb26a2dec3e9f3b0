//! Byte frequency table that remembers first-occurrence order.
//!
//! The order is written into the header and breaks ties while building the
//! tree, so encoder and decoder agree on the code for every byte.

use std::io::{self, Read};

const READ_CHUNK: usize = 64 * 1024;

/// Occurrence count per byte value.
///
/// Entries remember the order in which each byte was first seen. That order
/// is what the header stores and what the tree builder uses to break ties,
/// so a table read back from a header rebuilds the exact same tree.
/// Equality ignores that order.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    order: Vec<u8>,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            order: Vec::new(),
        }
    }
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl Eq for FrequencyTable {}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.record(data);
        table
    }

    /// Count every byte the reader yields until EOF.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.record(&buf[..n]);
        }
        Ok(table)
    }

    pub fn record(&mut self, data: &[u8]) {
        for &byte in data {
            let slot = &mut self.counts[byte as usize];
            if *slot == 0 {
                self.order.push(byte);
            }
            *slot += 1;
        }
    }

    /// Insert a complete entry. Returns false, leaving the table unchanged,
    /// if the byte is already present or `count` is zero.
    pub fn insert(&mut self, byte: u8, count: u64) -> bool {
        if count == 0 || self.counts[byte as usize] != 0 {
            return false;
        }
        self.counts[byte as usize] = count;
        self.order.push(byte);
        true
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of distinct byte values.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.order.iter().map(|&b| self.counts[b as usize]).sum()
    }

    /// `(byte, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.order.iter().map(|&b| (b, self.counts[b as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_keeps_first_seen_order() {
        let table = FrequencyTable::from_bytes(b"banana");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(b'b', 1), (b'a', 3), (b'n', 2)]);
        assert_eq!(table.total(), 6);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn reader_matches_slice() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(&data[..]).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
        assert_eq!(from_reader.total(), data.len() as u64);
    }

    #[test]
    fn equality_ignores_order() {
        let mut a = FrequencyTable::new();
        a.insert(1, 5);
        a.insert(2, 7);
        let mut b = FrequencyTable::new();
        b.insert(2, 7);
        b.insert(1, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut table = FrequencyTable::new();
        assert!(table.insert(9, 3));
        assert!(!table.insert(9, 4));
        assert_eq!(table.get(9), 3);
    }

    #[test]
    fn insert_rejects_zero_counts() {
        let mut table = FrequencyTable::new();
        assert!(!table.insert(5, 0));
        assert!(table.is_empty());
        assert!(table.insert(5, 3));
        assert!(!table.insert(5, 3));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(5), 3);
    }
}
