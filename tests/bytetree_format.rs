//! Wire-format tests for the canonical byte tree.
//!
//! These tests pin the exact serialization down to the byte, verify the
//! round-trip invariant over structured trees, and check that malformed
//! prefixes are rejected with errors rather than panics.

use rand::{rngs::StdRng, Rng, SeedableRng};
use urna_crypto::bytetree::ByteTree;

#[test]
fn test_leaf_abc_exact_bytes() {
    // The canonical vector: a leaf holding "abc".
    let tree = ByteTree::leaf(vec![0x61, 0x62, 0x63]);
    assert_eq!(
        tree.to_bytes(),
        vec![0x01, 0x00, 0x00, 0x00, 0x03, 0x61, 0x62, 0x63]
    );

    let decoded = ByteTree::from_bytes(&tree.to_bytes()).unwrap();
    let mut reader = decoded.reader();
    assert_eq!(reader.remaining(), 3);
    assert_eq!(reader.read().unwrap(), vec![0x61, 0x62, 0x63]);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_round_trip_of_nested_trees() {
    let trees = [
        ByteTree::leaf(Vec::new()),
        ByteTree::node(Vec::new()),
        ByteTree::int_leaf(i32::MIN),
        ByteTree::node(vec![
            ByteTree::string_leaf("outer"),
            ByteTree::node(vec![
                ByteTree::leaf(vec![0xde, 0xad]),
                ByteTree::node(vec![ByteTree::int_leaf(65536)]),
            ]),
            ByteTree::leaf(vec![0u8; 1024]),
        ]),
    ];
    for tree in trees {
        let bytes = tree.to_bytes();
        assert_eq!(
            ByteTree::from_bytes(&bytes).unwrap(),
            tree,
            "tree must round-trip to an identical value"
        );
        // And the encoding itself is stable
        assert_eq!(ByteTree::from_bytes(&bytes).unwrap().to_bytes(), bytes);
    }
}

#[test]
fn test_reader_walks_children_in_order() {
    let tree = ByteTree::node(vec![
        ByteTree::int_leaf(7),
        ByteTree::string_leaf("label"),
        ByteTree::leaf(vec![1, 2, 3]),
    ]);
    let mut reader = tree.reader();
    assert_eq!(reader.remaining(), 3);

    assert_eq!(reader.next_child().unwrap().read_int().unwrap(), 7);
    assert_eq!(
        reader.next_child().unwrap().read_string().unwrap(),
        "label"
    );

    let mut last = reader.next_child().unwrap();
    assert_eq!(last.remaining(), 3);
    assert_eq!(last.read().unwrap(), vec![1, 2, 3]);
    last.close();

    assert_eq!(reader.remaining(), 0);
    assert!(reader.next_child().is_err());
}

#[test]
fn test_mixed_reads_on_one_leaf() {
    let mut payload = 1234i32.to_be_bytes().to_vec();
    payload.extend_from_slice("trailing text".as_bytes());
    let tree = ByteTree::leaf(payload);

    let mut reader = tree.reader();
    assert_eq!(reader.read_int().unwrap(), 1234);
    assert_eq!(reader.read_string().unwrap(), "trailing text");
}

#[test]
fn test_malformed_inputs_error_without_panicking() {
    let cases: Vec<Vec<u8>> = vec![
        vec![],                                  // empty
        vec![0x01],                              // tag only
        vec![0x01, 0x00, 0x00],                  // truncated length
        vec![0x05, 0x00, 0x00, 0x00, 0x00],      // unknown tag
        vec![0x01, 0xff, 0xff, 0xff, 0xff],      // leaf length beyond 31 bits
        vec![0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00], // missing child
    ];
    for bytes in cases {
        assert!(
            ByteTree::from_bytes(&bytes).is_err(),
            "input {:02x?} must be rejected",
            bytes
        );
    }
}

#[test]
fn test_every_truncation_of_a_valid_encoding_fails() {
    let tree = ByteTree::node(vec![
        ByteTree::string_leaf("abc"),
        ByteTree::node(vec![ByteTree::int_leaf(1), ByteTree::int_leaf(2)]),
    ]);
    let bytes = tree.to_bytes();
    for cut in 0..bytes.len() {
        assert!(ByteTree::from_bytes(&bytes[..cut]).is_err());
    }
}

fn random_tree(rng: &mut StdRng, depth: usize) -> ByteTree {
    if depth >= 4 || rng.gen_bool(0.6) {
        let length = rng.gen_range(0..64);
        ByteTree::leaf((0..length).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>())
    } else {
        let count = rng.gen_range(0..5);
        ByteTree::node((0..count).map(|_| random_tree(rng, depth + 1)).collect())
    }
}

#[test]
fn test_randomized_trees_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let tree = random_tree(&mut rng, 0);
        assert_eq!(ByteTree::from_bytes(&tree.to_bytes()).unwrap(), tree);
    }
}

#[test]
fn test_randomized_mutations_never_panic() {
    let mut rng = StdRng::seed_from_u64(43);
    let bytes = ByteTree::node(vec![
        ByteTree::string_leaf("mutation target"),
        ByteTree::node(vec![ByteTree::int_leaf(5), ByteTree::leaf(vec![9; 40])]),
    ])
    .to_bytes();

    for _ in 0..2000 {
        let mut mutated = bytes.clone();
        let flips = rng.gen_range(1..4);
        for _ in 0..flips {
            let position = rng.gen_range(0..mutated.len());
            mutated[position] ^= 1 << rng.gen_range(0..8);
        }
        // Decoding may succeed or fail, but must never panic.
        let _ = ByteTree::from_bytes(&mutated);
    }
}

#[test]
fn test_int_reads_are_rejected_on_short_leaves() {
    let tree = ByteTree::leaf(vec![1, 2, 3]);
    assert!(tree.reader().read_int().is_err());
}

#[test]
fn test_invalid_utf8_string_rejected() {
    let tree = ByteTree::leaf(vec![0xff, 0xfe]);
    assert!(tree.reader().read_string().is_err());
}
