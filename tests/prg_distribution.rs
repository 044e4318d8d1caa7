//! Statistical sanity checks on PRG output.
//!
//! These are not security proofs; they catch gross regressions such as a
//! stuck counter, an unmixed seed, or a truncated fold producing biased
//! bytes.

use statrs::distribution::{ChiSquared, ContinuousCDF};
use urna_crypto::hash::Hashfunction;
use urna_crypto::prg::{ElGamalPrg, HashCounterPrg};

mod common;
use common::{safe_prime, OAKLEY_GROUP_1};

/// Chi-square statistic of the byte histogram of `data` against the
/// uniform distribution over 256 cells.
fn chi_square_bytes(data: &[u8]) -> f64 {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }
    let expected = data.len() as f64 / 256.0;
    counts
        .iter()
        .map(|&count| {
            let delta = count as f64 - expected;
            delta * delta / expected
        })
        .sum()
}

/// Accept if the statistic is below the 99.99th percentile of the
/// chi-square distribution with 255 degrees of freedom. The streams are
/// deterministic, so there is no flakiness: the test either always
/// passes or always fails.
fn assert_byte_histogram_uniform(data: &[u8], what: &str) {
    let statistic = chi_square_bytes(data);
    let critical = ChiSquared::new(255.0).unwrap().inverse_cdf(0.9999);
    assert!(
        statistic < critical,
        "{}: chi-square statistic {:.1} exceeds the {:.1} cutoff",
        what,
        statistic,
        critical
    );
}

#[test]
fn test_hash_counter_bytes_look_uniform() {
    let prg = HashCounterPrg::new(Hashfunction::sha256());
    prg.set_seed(&[0xa5u8; 32]).unwrap();
    let mut data = vec![0u8; 1 << 16];
    prg.get_bytes(&mut data).unwrap();
    assert_byte_histogram_uniform(&data, "hash-counter PRG");
}

#[test]
fn test_elgamal_bytes_look_uniform() {
    let prg = ElGamalPrg::from_safe_prime(safe_prime(OAKLEY_GROUP_1), 3, 100).unwrap();
    let seed: Vec<u8> = (0..prg.min_seed_bytes())
        .map(|i| (i * 13 % 256) as u8)
        .collect();
    prg.set_seed(&seed).unwrap();
    let mut data = vec![0u8; 1 << 15];
    prg.get_bytes(&mut data).unwrap();
    assert_byte_histogram_uniform(&data, "ElGamal PRG");
}

#[test]
fn test_first_output_bytes_are_not_degenerate() {
    // An unmixed seed would echo zeros for a zero seed.
    let prg = HashCounterPrg::new(Hashfunction::sha256());
    prg.set_seed(&[0u8; 32]).unwrap();
    let mut data = vec![0u8; 64];
    prg.get_bytes(&mut data).unwrap();
    assert!(data.iter().any(|&b| b != 0));
}
