//! Hashfunction behavior tests: the Merkle-Damgard extender against an
//! independent reconstruction, incremental/one-shot equivalence, and the
//! Pedersen compression function.

use sha2::{Digest as _, Sha256};
use urna_crypto::hash::{
    FixedLengthHash, Hashfunction, MerkleDamgard, PedersenHash, Sha2Algorithm, Sha2Hash,
};

mod common;
use common::{deterministic_source, oakley_group_1};

fn md_over_sha256() -> MerkleDamgard {
    MerkleDamgard::new(FixedLengthHash::Sha2(Sha2Hash::new(Sha2Algorithm::Sha256))).unwrap()
}

/// Independent reimplementation of the iterated construction over
/// SHA-256: 64-byte blocks, 32-byte chaining value at offset zero, final
/// block padded with zeros and terminated by the total byte count.
fn reference_md_sha256(input: &[u8]) -> Vec<u8> {
    const BLOCK: usize = 64;
    const CHAIN: usize = 32;

    let mut temp = [0u8; BLOCK];
    let mut index = 0usize;

    for &byte in input {
        temp[index] = byte;
        index += 1;
        if index == BLOCK {
            let chain = Sha256::digest(temp);
            temp[..CHAIN].copy_from_slice(&chain);
            index = CHAIN;
        }
    }

    if BLOCK - index < 8 {
        temp[index..].fill(0);
        let chain = Sha256::digest(temp);
        temp[..CHAIN].copy_from_slice(&chain);
        index = CHAIN;
    }
    temp[index..BLOCK - 8].fill(0);
    temp[BLOCK - 8..].copy_from_slice(&(input.len() as u64).to_be_bytes());
    Sha256::digest(temp).to_vec()
}

#[test]
fn test_empty_input_matches_single_padded_block() {
    // The empty input is one block of zeros whose length field encodes 0.
    let expected = Sha256::digest([0u8; 64]).to_vec();
    assert_eq!(md_over_sha256().hash(&[]).unwrap(), expected);
    assert_eq!(reference_md_sha256(&[]), expected);
}

#[test]
fn test_merkle_damgard_matches_reference_across_sizes() {
    let md = md_over_sha256();
    // Sizes straddling every boundary: block fills, the 8-byte length
    // reserve, and multi-block messages.
    for size in [0, 1, 7, 8, 23, 24, 25, 31, 32, 33, 55, 56, 63, 64, 65, 127, 128, 1000] {
        let data: Vec<u8> = (0..size).map(|i| (i * 31 % 256) as u8).collect();
        assert_eq!(
            md.hash(&data).unwrap(),
            reference_md_sha256(&data),
            "mismatch at input size {}",
            size
        );
    }
}

#[test]
fn test_digest_is_chunking_independent() {
    let md = md_over_sha256();
    let data: Vec<u8> = (0..777u32).map(|i| (i % 253) as u8).collect();
    let expected = md.hash(&data).unwrap();

    // One byte at a time
    let mut digest = md.digest();
    for &byte in &data {
        digest.update(&[byte]);
    }
    assert_eq!(digest.finalize().unwrap(), expected);

    // Uneven chunks
    let mut digest = md.digest();
    let (head, tail) = data.split_at(131);
    digest.update(head);
    digest.update(&[]);
    digest.update(tail);
    assert_eq!(digest.finalize().unwrap(), expected);
}

#[test]
fn test_incremental_equals_oneshot_for_all_variants() {
    let pedersen = PedersenHash::generate(oakley_group_1(), 3, &deterministic_source(7)).unwrap();
    let data: Vec<u8> = (0..150u8).collect();

    let variants = [
        Hashfunction::sha256(),
        Hashfunction::sha384(),
        Hashfunction::sha512(),
        Hashfunction::MerkleDamgard(Box::new(md_over_sha256())),
        Hashfunction::Pedersen(pedersen),
    ];
    for hashfunction in variants {
        let mut digest = hashfunction.digest();
        digest.update(&data[..50]);
        digest.update(&data[50..120]);
        digest.update(&data[120..]);
        assert_eq!(
            digest.finalize().unwrap(),
            hashfunction.hash(&data).unwrap()
        );
    }
}

#[test]
fn test_merkle_damgard_over_pedersen() {
    // The provably-collision-resistant configuration: Pedersen as the
    // compression function under the Merkle-Damgard extender.
    let pedersen = PedersenHash::generate(oakley_group_1(), 3, &deterministic_source(9)).unwrap();
    let md = MerkleDamgard::new(FixedLengthHash::Pedersen(pedersen)).unwrap();

    let a = md.hash(b"first message").unwrap();
    let b = md.hash(b"first message").unwrap();
    let c = md.hash(b"second message").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), md.output_byte_length());

    // Long input spanning several compression blocks
    let long: Vec<u8> = (0..5000u32).map(|i| (i % 241) as u8).collect();
    let mut digest = md.digest();
    for chunk in long.chunks(97) {
        digest.update(chunk);
    }
    assert_eq!(digest.finalize().unwrap(), md.hash(&long).unwrap());
}

#[test]
fn test_narrow_pedersen_cannot_be_extended() {
    // Width one gives fewer input bits than output bits, which the
    // extender must reject.
    let pedersen = PedersenHash::generate(oakley_group_1(), 1, &deterministic_source(3)).unwrap();
    assert!(pedersen.input_bits() <= pedersen.output_bits());
    assert!(MerkleDamgard::new(FixedLengthHash::Pedersen(pedersen)).is_err());
}
