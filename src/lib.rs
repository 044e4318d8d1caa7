//! Urna cryptographic core
//!
//! This library provides the number-theoretic primitives and serialization
//! machinery used by the higher-level mix-net and threshold-decryption
//! protocols of the Urna verifiable-election toolkit.
//!
//! ## Main Components
//!
//! - [`bytetree`]: canonical self-describing serialization format
//! - [`marshal`]: class-id envelopes and typed reconstruction
//! - [`random`]: random sources (OS device, XOR combiner, PRGs)
//! - [`hash`]: SHA-2, Merkle-Damgard, random oracle and Pedersen hashing
//! - [`prg`]: hash-with-counter and ElGamal pseudo-random generators
//! - [`group`]: the prime-order group contract and its safe-prime binding
//! - [`naor_yung`]: the CCA2-secure Naor-Yung cryptosystem
//!
//! ## Error Handling
//!
//! This library uses `Result` types for robust error handling. Fallible
//! operations return `Result<T, UrnaCryptoError>`; every error path
//! reachable from attacker-controlled bytes reports a typed error rather
//! than panicking, and [`NaorYungSecretKey::decrypt`] deliberately folds
//! all of its failure modes into a single `None`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use num_bigint::BigUint;
//! use urna_crypto::{
//!     config, marshal, unmarshal_aux, Hashfunction, ModGroup, NaorYungKeyGen,
//!     NaorYungPublicKey, RandomDevice, RandomSource, UrnaCryptoError,
//! };
//!
//! // 768-bit safe prime from RFC 2409 (Oakley group 1).
//! const SAFE_PRIME: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
//!                           020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
//!                           4FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";
//!
//! // 1. Randomness from the OS device, group over a standardized safe prime
//! let rs = RandomSource::Device(RandomDevice::default_device()?);
//! let modulus = BigUint::parse_bytes(SAFE_PRIME.as_bytes(), 16).unwrap();
//! let group = ModGroup::from_safe_prime(modulus)?;
//!
//! // 2. Generate a key pair
//! let keygen = NaorYungKeyGen::new(group, Hashfunction::sha256(), config::DEFAULT_SECPRO_BITS)?;
//! let (public_key, secret_key) = keygen.generate(&rs, config::DEFAULT_STAT_DIST_BITS)?;
//!
//! // 3. Encrypt under a label, decrypt under the same label
//! let ciphertext = public_key.encrypt(b"ballot-box-7", b"hello", &rs, 100)?;
//! assert_eq!(secret_key.decrypt(b"ballot-box-7", &ciphertext), Some(b"hello".to_vec()));
//!
//! // 4. Persist the public key and reconstruct it with validation
//! let tree = marshal(&public_key);
//! let restored: NaorYungPublicKey<ModGroup> =
//!     unmarshal_aux(&tree, &rs, config::DEFAULT_CERTAINTY)?;
//! assert_eq!(restored, public_key);
//! # Ok::<(), UrnaCryptoError>(())
//! ```

pub mod bigint;
pub mod bytetree;
pub mod config;
pub mod error;
pub mod group;
pub mod hash;
pub mod marshal;
pub mod naor_yung;
pub mod prg;
pub mod random;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use bytetree::{ByteTree, ByteTreeReader};
pub use error::{Result, UrnaCryptoError};
pub use group::{CyclicGroup, ModGroup};
pub use hash::{
    FixedLengthHash, HashDigest, Hashfunction, MerkleDamgard, PedersenHash, RandomOracle,
    Sha2Algorithm, Sha2Hash,
};
pub use marshal::{marshal, marshal_hex, unmarshal_aux, unmarshal_hex_aux, Marshalizable};
pub use naor_yung::{NaorYungKeyGen, NaorYungPublicKey, NaorYungSecretKey};
pub use prg::{ElGamalPrg, HashCounterPrg, Prg};
pub use random::{RandomDevice, RandomSource, RandomSourceCombiner};
