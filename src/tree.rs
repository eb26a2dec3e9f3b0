//! Huffman tree construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{InputError, Result};
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

// Queue entry. `seq` is the creation order: leaves take theirs from the
// table's entry order, merged nodes follow in the order they are built.
#[derive(Debug)]
struct Pending {
    node: Node,
    seq: u32,
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so BinaryHeap pops the lowest (freq, seq) first
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman tree over byte values.
///
/// Built by repeatedly merging the two lowest-frequency nodes. Equal
/// frequencies are broken by creation order, and the first node popped
/// becomes the left child, so the same table always yields the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut heap = BinaryHeap::with_capacity(table.len());
        let mut next_seq = 0u32;
        for (byte, freq) in table.iter() {
            heap.push(Pending {
                node: Node::Leaf { byte, freq },
                seq: next_seq,
            });
            next_seq += 1;
        }

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            heap.push(Pending {
                node: Node::Internal {
                    freq: left.node.freq() + right.node.freq(),
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
                seq: next_seq,
            });
            next_seq += 1;
        }

        let root = heap
            .pop()
            .map(|p| p.node)
            .ok_or(InputError::EmptyFrequencyTable)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// True for the degenerate tree of a single distinct byte.
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    fn table(entries: &[(u8, u64)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for &(b, f) in entries {
            t.insert(b, f);
        }
        t
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = HuffmanTree::build(&FrequencyTable::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::EmptyFrequencyTable)
        ));
    }

    #[test]
    fn single_entry_is_a_lone_leaf() {
        let tree = HuffmanTree::build(&table(&[(b'z', 42)])).unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.root(), &Node::Leaf { byte: b'z', freq: 42 });
    }

    #[test]
    fn two_entries_put_lighter_on_the_left() {
        let tree = HuffmanTree::build(&table(&[(0x41, 3), (0x42, 1)])).unwrap();
        match tree.root() {
            Node::Internal { freq, left, right } => {
                assert_eq!(*freq, 4);
                assert_eq!(**left, Node::Leaf { byte: 0x42, freq: 1 });
                assert_eq!(**right, Node::Leaf { byte: 0x41, freq: 3 });
            }
            other => panic!("expected internal root, got {other:?}"),
        }
    }

    #[test]
    fn ties_follow_table_order() {
        let tree = HuffmanTree::build(&table(&[(7, 1), (3, 1)])).unwrap();
        let Node::Internal { left, .. } = tree.root() else {
            panic!("expected internal root");
        };
        assert_eq!(**left, Node::Leaf { byte: 7, freq: 1 });

        let tree = HuffmanTree::build(&table(&[(3, 1), (7, 1)])).unwrap();
        let Node::Internal { left, .. } = tree.root() else {
            panic!("expected internal root");
        };
        assert_eq!(**left, Node::Leaf { byte: 3, freq: 1 });
    }

    #[test]
    fn root_weight_is_total() {
        let t = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let tree = HuffmanTree::build(&t).unwrap();
        assert_eq!(tree.root().freq(), t.total());
        assert_eq!(tree.leaf_count(), t.len());
    }

    #[test]
    fn rebuild_is_deterministic() {
        let t = FrequencyTable::from_bytes(b"abracadabra alakazam");
        assert_eq!(HuffmanTree::build(&t).unwrap(), HuffmanTree::build(&t).unwrap());
    }
}
