//! Prefix-free code table derived from a [`HuffmanTree`](crate::tree::HuffmanTree).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{InputError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// A variable-length bit code, first bit first. `false` is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte value to code, generated from one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walk the tree depth-first, 0 for left and 1 for right.
    ///
    /// A tree that is a single leaf gets the one-bit code `0`, since an
    /// empty code could not be told apart on decode.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            Node::Leaf { byte, .. } => {
                codes.insert(*byte, Code(vec![false]));
            }
            root => assign(root, Vec::new(), &mut codes),
        }
        Self { codes }
    }

    pub fn get(&self, byte: u8) -> Result<&Code> {
        self.codes
            .get(&byte)
            .ok_or_else(|| InputError::MissingCode(byte).into())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&b, c)| (b, c))
    }

    /// Σ freq × code length over the table, i.e. the bitstream length in bits.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .map(|(byte, freq)| {
                let len = self.codes.get(&byte).map_or(0, Code::len);
                freq * len as u64
            })
            .sum()
    }
}

fn assign(node: &Node, prefix: Vec<bool>, codes: &mut BTreeMap<u8, Code>) {
    match node {
        Node::Leaf { byte, .. } => {
            codes.insert(*byte, Code(prefix));
        }
        Node::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push(false);
            assign(left, left_prefix, codes);

            let mut right_prefix = prefix;
            right_prefix.push(true);
            assign(right, right_prefix, codes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_for(data: &[u8]) -> (FrequencyTable, CodeTable) {
        let table = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::build(&table).unwrap();
        (table, CodeTable::from_tree(&tree))
    }

    #[test]
    fn two_symbols_get_one_bit_each() {
        let (_, codes) = codes_for(&[0x41, 0x41, 0x42, 0x41]);
        assert_eq!(codes.get(0x42).unwrap().to_string(), "0");
        assert_eq!(codes.get(0x41).unwrap().to_string(), "1");
    }

    #[test]
    fn single_symbol_gets_zero() {
        let (_, codes) = codes_for(b"xxxxxxxx");
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(b'x').unwrap().to_string(), "0");
    }

    #[test]
    fn missing_byte_is_invalid_input() {
        let (_, codes) = codes_for(b"abc");
        assert!(codes.get(b'q').is_err());
    }

    #[test]
    fn every_code_is_non_empty_and_prefix_free() {
        let (_, codes) = codes_for(b"it was the best of times, it was the worst of times");
        let all: Vec<_> = codes.iter().collect();
        for (a, code_a) in &all {
            assert!(!code_a.is_empty());
            for (b, code_b) in &all {
                if a != b {
                    assert!(!code_a.is_prefix_of(code_b), "{code_a} prefixes {code_b}");
                }
            }
        }
    }

    #[test]
    fn frequent_bytes_never_get_longer_codes() {
        let (table, codes) = codes_for(b"aaaaaaaaaaaaaaaabbbbbbbbccccdde");
        for (x, fx) in table.iter() {
            for (y, fy) in table.iter() {
                if fx > fy {
                    assert!(codes.get(x).unwrap().len() <= codes.get(y).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn encoded_bits_matches_code_lengths() {
        let (table, codes) = codes_for(&[0x41, 0x41, 0x42, 0x41]);
        assert_eq!(codes.encoded_bits(&table), 4);
    }
}
