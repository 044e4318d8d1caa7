//! Common test utilities and shared infrastructure.
//!
//! This module provides the shared fixtures used across the test suite:
//! standardized safe primes, deterministic random sources and group
//! construction helpers.

#![allow(dead_code)] // not every integration test uses every fixture

use num_bigint::BigUint;
use urna_crypto::group::ModGroup;
use urna_crypto::hash::Hashfunction;
use urna_crypto::prg::{HashCounterPrg, Prg};
use urna_crypto::random::RandomSource;

/// 768-bit safe prime from RFC 2409 (Oakley group 1).
pub const OAKLEY_GROUP_1: &str =
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
     020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
     4FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";

/// 1024-bit safe prime from RFC 2409 (Oakley group 2).
pub const OAKLEY_GROUP_2: &str =
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
     020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
     4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
     EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381FFFFFFFFFFFFFFFF";

/// 2048-bit safe prime from RFC 3526 (MODP group 14).
pub const MODP_GROUP_14: &str =
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
     020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
     4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
     EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
     98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
     9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
     E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
     3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF";

/// Parse one of the hex constants above.
pub fn safe_prime(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("fixture hex parses")
}

/// The 768-bit test group.
pub fn oakley_group_1() -> ModGroup {
    ModGroup::from_safe_prime(safe_prime(OAKLEY_GROUP_1)).expect("fixture prime is valid")
}

/// The 1024-bit test group (order above 2^160, as the end-to-end
/// scenarios require).
pub fn oakley_group_2() -> ModGroup {
    ModGroup::from_safe_prime(safe_prime(OAKLEY_GROUP_2)).expect("fixture prime is valid")
}

/// A deterministic random source: a hash-counter PRG over SHA-256 seeded
/// from a single fill byte.
pub fn deterministic_source(fill: u8) -> RandomSource {
    let prg = HashCounterPrg::new(Hashfunction::sha256());
    prg.set_seed(&[fill; 32]).expect("32 bytes seed a SHA-256 PRG");
    RandomSource::Prg(Prg::HashCounter(prg))
}
