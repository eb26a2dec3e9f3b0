//! Property tests for the codec.
//!
//! - compress/decompress is the identity for every input
//! - generated codes are prefix-free and non-empty
//! - the header alone reproduces the frequency table
//! - the tree's expected code length is optimal

use proptest::prelude::*;

use hufflock::codes::CodeTable;
use hufflock::header::read_header;
use hufflock::{compress, decompress, FrequencyTable, HuffmanTree};

/// Inputs biased toward few distinct bytes, so trees get deep and ties are common.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..2048),
        prop::collection::vec(0u8..4, 0..512),
        prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c')], 0..64),
        (any::<u8>(), 1usize..300).prop_map(|(b, n)| vec![b; n]),
    ]
}

/// Σ of merge weights of an independent Huffman run; equals the optimal Σ freq × len.
fn reference_cost(freqs: &[u64]) -> u64 {
    let mut pool: Vec<u64> = freqs.to_vec();
    if pool.len() < 2 {
        return freqs.iter().sum();
    }
    let mut cost = 0;
    while pool.len() > 1 {
        pool.sort_unstable_by(|a, b| b.cmp(a));
        let a = pool.pop().unwrap();
        let b = pool.pop().unwrap();
        cost += a + b;
        pool.push(a + b);
    }
    cost
}

fn tree_cost(table: &FrequencyTable) -> u64 {
    let tree = HuffmanTree::build(table).unwrap();
    CodeTable::from_tree(&tree).encoded_bits(table)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_round_trip(data in skewed_bytes()) {
        let packed = compress(&data).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn prop_codes_prefix_free(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let table = FrequencyTable::from_bytes(&data);
        let codes = CodeTable::from_tree(&HuffmanTree::build(&table).unwrap());
        prop_assert_eq!(codes.len(), table.len());
        let all: Vec<_> = codes.iter().collect();
        for (a, ca) in &all {
            prop_assert!(!ca.is_empty());
            for (b, cb) in &all {
                if a != b {
                    prop_assert!(!ca.is_prefix_of(cb));
                }
            }
        }
    }

    #[test]
    fn prop_header_reproduces_table(data in skewed_bytes()) {
        let packed = compress(&data).unwrap();
        let table = read_header(&mut packed.as_slice()).unwrap();
        prop_assert_eq!(table, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn prop_expected_length_is_optimal(freqs in prop::collection::vec(1u64..1000, 2..40)) {
        let mut table = FrequencyTable::new();
        for (i, &f) in freqs.iter().enumerate() {
            table.insert(i as u8, f);
        }
        prop_assert_eq!(tree_cost(&table), reference_cost(&freqs));
    }
}

#[test]
fn optimal_on_textbook_table() {
    // classic six-symbol example, optimal cost 224
    let mut table = FrequencyTable::new();
    for (b, f) in [(b'a', 45), (b'b', 13), (b'c', 12), (b'd', 16), (b'e', 9), (b'f', 5)] {
        table.insert(b, f);
    }
    assert_eq!(tree_cost(&table), 224);
}

#[test]
fn optimal_on_equal_weights() {
    // 8 equal symbols: every code is 3 bits
    let mut table = FrequencyTable::new();
    for b in 0..8u8 {
        table.insert(b, 10);
    }
    assert_eq!(tree_cost(&table), 8 * 10 * 3);
}

#[test]
fn concrete_two_symbol_scenario() {
    let data = [0x41, 0x41, 0x42, 0x41];
    let packed = compress(&data).unwrap();
    assert_eq!(
        packed,
        [0, 0, 0, 2, 0x41, 0, 0, 0, 3, 0x42, 0, 0, 0, 1, 0b1101_0000]
    );
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn single_symbol_input() {
    let data = vec![b'Z'; 1000];
    let table = FrequencyTable::from_bytes(&data);
    let tree = HuffmanTree::build(&table).unwrap();
    assert!(tree.is_single_leaf());
    let codes = CodeTable::from_tree(&tree);
    assert_eq!(codes.get(b'Z').unwrap().len(), 1);

    let packed = compress(&data).unwrap();
    // 9 header bytes + 1000 bits
    assert_eq!(packed.len(), 9 + 125);
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn empty_input() {
    let packed = compress(&[]).unwrap();
    assert_eq!(packed, [0, 0, 0, 0]);
    assert!(decompress(&packed).unwrap().is_empty());
}
