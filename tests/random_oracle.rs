//! Random-oracle construction tests: the exact expansion recipe, output
//! masking, domain separation by output length, and incremental queries.

use urna_crypto::hash::{Hashfunction, RandomOracle};
use urna_crypto::prg::HashCounterPrg;

#[test]
fn test_abc_at_300_bits_exact_construction() {
    // Querying the oracle at 300 bits on "abc" must equal seeding an
    // HC-PRG over SHA-256 with SHA-256(00 00 01 2c || "abc") and reading
    // 38 bytes with the top four bits of byte zero cleared.
    let oracle = RandomOracle::new(Hashfunction::sha256(), 300).unwrap();
    let output = oracle.hash(b"abc").unwrap();
    assert_eq!(output.len(), 38);
    assert_eq!(output[0] & 0xf0, 0, "top four bits must be masked to zero");

    let seed = Hashfunction::sha256()
        .hash(&[0x00, 0x00, 0x01, 0x2c, b'a', b'b', b'c'])
        .unwrap();
    let prg = HashCounterPrg::new(Hashfunction::sha256());
    prg.set_seed(&seed).unwrap();
    let mut expected = vec![0u8; 38];
    prg.get_bytes(&mut expected).unwrap();
    expected[0] &= 0x0f;

    assert_eq!(output, expected);
}

#[test]
fn test_output_lengths_are_domain_separated() {
    // Outputs requested at different lengths must not be prefix-related:
    // the length prefix seeds the expander differently.
    let input = b"domain separation probe";
    for (short_bits, long_bits) in [(128usize, 256usize), (100, 300), (256, 512), (8, 16)] {
        let short = RandomOracle::new(Hashfunction::sha256(), short_bits)
            .unwrap()
            .hash(input)
            .unwrap();
        let long = RandomOracle::new(Hashfunction::sha256(), long_bits)
            .unwrap()
            .hash(input)
            .unwrap();
        assert_ne!(
            &long[..short.len()],
            &short[..],
            "lengths {} and {} produced prefix-related outputs",
            short_bits,
            long_bits
        );
    }
}

#[test]
fn test_distinct_inputs_give_distinct_outputs() {
    let oracle = RandomOracle::new(Hashfunction::sha256(), 200).unwrap();
    assert_ne!(oracle.hash(b"a").unwrap(), oracle.hash(b"b").unwrap());
    assert_ne!(oracle.hash(b"").unwrap(), oracle.hash(b"\x00").unwrap());
}

#[test]
fn test_incremental_query_equals_oneshot() {
    let oracle = RandomOracle::new(Hashfunction::sha512(), 1234).unwrap();
    let data: Vec<u8> = (0..300u16).map(|i| (i % 256) as u8).collect();

    let mut digest = oracle.digest();
    for chunk in data.chunks(41) {
        digest.update(chunk);
    }
    assert_eq!(digest.finalize().unwrap(), oracle.hash(&data).unwrap());
}

#[test]
fn test_long_outputs_span_many_expander_blocks() {
    // 10000 bits is forty SHA-256 blocks of expansion.
    let oracle = RandomOracle::new(Hashfunction::sha256(), 10_000).unwrap();
    let output = oracle.hash(b"stretch").unwrap();
    assert_eq!(output.len(), 1250);

    // Deterministic across queries
    assert_eq!(oracle.hash(b"stretch").unwrap(), output);
}

#[test]
fn test_byte_aligned_output_is_unmasked() {
    let oracle = RandomOracle::new(Hashfunction::sha256(), 256).unwrap();
    // With 2^-8 probability per trial the top byte is zero anyway; over a
    // few inputs at least one must have a nonzero top bit if no mask is
    // applied.
    let any_high_bit = (0..8u8).any(|i| {
        let output = oracle.hash(&[i]).unwrap();
        output[0] & 0x80 != 0
    });
    assert!(any_high_bit, "byte-aligned outputs should not be masked");
}
