//! Hashfunctions and incremental digests.
//!
//! The closed set of hashfunction variants: the platform SHA-2 family,
//! the Merkle-Damgard extender over a fixed-length compression function,
//! the random-oracle extender with arbitrary output bit length, and the
//! algebraic Pedersen hash. Every variant offers a one-shot `hash` and an
//! incremental digest, and the two are equivalent by construction:
//! `hash` is implemented as digest-update-finalize.

pub mod merkle_damgard;
pub mod pedersen;
pub mod random_oracle;
pub mod sha2;

pub use merkle_damgard::{MerkleDamgard, MerkleDamgardDigest};
pub use pedersen::{PedersenDigest, PedersenHash};
pub use random_oracle::{RandomOracle, RandomOracleDigest};
pub use sha2::{Sha2Algorithm, Sha2Digest, Sha2Hash};

use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::marshal::{self, class_id, Marshalizable, UnmarshalAux};

/// A hashfunction over arbitrary-length inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Hashfunction {
    /// Platform SHA-2.
    Sha2(Sha2Hash),
    /// Merkle-Damgard extension of a fixed-length function.
    MerkleDamgard(Box<MerkleDamgard>),
    /// Random oracle with arbitrary output bit length.
    RandomOracle(Box<RandomOracle>),
    /// Pedersen algebraic hash (fixed input length).
    Pedersen(PedersenHash),
}

impl Hashfunction {
    /// SHA-256 as a hashfunction.
    pub fn sha256() -> Self {
        Hashfunction::Sha2(Sha2Hash::new(Sha2Algorithm::Sha256))
    }

    /// SHA-384 as a hashfunction.
    pub fn sha384() -> Self {
        Hashfunction::Sha2(Sha2Hash::new(Sha2Algorithm::Sha384))
    }

    /// SHA-512 as a hashfunction.
    pub fn sha512() -> Self {
        Hashfunction::Sha2(Sha2Hash::new(Sha2Algorithm::Sha512))
    }

    /// Output length in bits.
    pub fn output_bits(&self) -> usize {
        match self {
            Hashfunction::Sha2(hash) => hash.output_bits(),
            Hashfunction::MerkleDamgard(md) => md.output_bits(),
            Hashfunction::RandomOracle(ro) => ro.output_bits(),
            Hashfunction::Pedersen(pedersen) => pedersen.output_bits(),
        }
    }

    /// Output length in whole bytes.
    pub fn output_byte_length(&self) -> usize {
        crate::utils::bytes_for_bits(self.output_bits())
    }

    /// Hash `data` in one shot. Structurally equivalent to feeding the
    /// same bytes through [`Hashfunction::digest`].
    pub fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut digest = self.digest();
        digest.update(data);
        digest.finalize()
    }

    /// A fresh incremental digest. Digests are plain values: callers that
    /// hash concurrently create one digest per thread.
    pub fn digest(&self) -> HashDigest {
        match self {
            Hashfunction::Sha2(hash) => HashDigest::Sha2(hash.digest()),
            Hashfunction::MerkleDamgard(md) => HashDigest::MerkleDamgard(md.digest()),
            Hashfunction::RandomOracle(ro) => HashDigest::RandomOracle(ro.digest()),
            Hashfunction::Pedersen(pedersen) => HashDigest::Pedersen(pedersen.digest()),
        }
    }
}

impl Marshalizable for Hashfunction {
    fn class_id(&self) -> &'static str {
        match self {
            Hashfunction::Sha2(_) => class_id::SHA2,
            Hashfunction::MerkleDamgard(_) => class_id::MERKLE_DAMGARD,
            Hashfunction::RandomOracle(_) => class_id::RANDOM_ORACLE,
            Hashfunction::Pedersen(_) => class_id::PEDERSEN,
        }
    }

    fn to_payload(&self) -> ByteTree {
        match self {
            Hashfunction::Sha2(hash) => ByteTree::string_leaf(hash.algorithm().name()),
            Hashfunction::MerkleDamgard(md) => {
                ByteTree::node(vec![marshal::marshal(md.inner())])
            }
            Hashfunction::RandomOracle(ro) => ByteTree::node(vec![
                marshal::marshal(ro.inner()),
                ByteTree::int_leaf(ro.output_bits() as i32),
            ]),
            Hashfunction::Pedersen(pedersen) => pedersen.to_payload_tree(),
        }
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        match id {
            class_id::SHA2 => {
                let algorithm = parse_algorithm_name(payload)?;
                Ok(Hashfunction::Sha2(Sha2Hash::new(algorithm)))
            }
            class_id::MERKLE_DAMGARD => {
                let children = payload.children_exact(1)?;
                let inner: FixedLengthHash =
                    marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
                Ok(Hashfunction::MerkleDamgard(Box::new(MerkleDamgard::new(
                    inner,
                )?)))
            }
            class_id::RANDOM_ORACLE => {
                let children = payload.children_exact(2)?;
                let inner: Hashfunction =
                    marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
                let output_bits = children[1].int_value()?;
                if output_bits <= 0 {
                    return Err(UrnaCryptoError::Validation(format!(
                        "random oracle output length {} is not positive",
                        output_bits
                    )));
                }
                Ok(Hashfunction::RandomOracle(Box::new(RandomOracle::new(
                    inner,
                    output_bits as usize,
                )?)))
            }
            class_id::PEDERSEN => Ok(Hashfunction::Pedersen(PedersenHash::from_payload_tree(
                payload, aux,
            )?)),
            other => Err(marshal::wrong_abstraction(other, "hashfunction")),
        }
    }
}

/// A fixed-input-length compression function, as consumed by the
/// Merkle-Damgard extender.
#[derive(Debug, Clone, PartialEq)]
pub enum FixedLengthHash {
    /// SHA-2 reused as a fixed-length primitive: the input length is the
    /// internal block length.
    Sha2(Sha2Hash),
    /// The natively fixed-length Pedersen hash.
    Pedersen(PedersenHash),
}

impl FixedLengthHash {
    /// Fixed input length in bits.
    pub fn input_bits(&self) -> usize {
        match self {
            FixedLengthHash::Sha2(hash) => hash.input_bits(),
            FixedLengthHash::Pedersen(pedersen) => pedersen.input_bits(),
        }
    }

    /// Output length in bits.
    pub fn output_bits(&self) -> usize {
        match self {
            FixedLengthHash::Sha2(hash) => hash.output_bits(),
            FixedLengthHash::Pedersen(pedersen) => pedersen.output_bits(),
        }
    }

    /// Compress one input block.
    pub fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            FixedLengthHash::Sha2(hash) => Ok(hash.hash(data)),
            FixedLengthHash::Pedersen(pedersen) => pedersen.hash(data),
        }
    }
}

impl Marshalizable for FixedLengthHash {
    fn class_id(&self) -> &'static str {
        match self {
            FixedLengthHash::Sha2(_) => class_id::SHA2,
            FixedLengthHash::Pedersen(_) => class_id::PEDERSEN,
        }
    }

    fn to_payload(&self) -> ByteTree {
        match self {
            FixedLengthHash::Sha2(hash) => ByteTree::string_leaf(hash.algorithm().name()),
            FixedLengthHash::Pedersen(pedersen) => pedersen.to_payload_tree(),
        }
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        match id {
            class_id::SHA2 => {
                let algorithm = parse_algorithm_name(payload)?;
                Ok(FixedLengthHash::Sha2(Sha2Hash::new(algorithm)))
            }
            class_id::PEDERSEN => Ok(FixedLengthHash::Pedersen(
                PedersenHash::from_payload_tree(payload, aux)?,
            )),
            other => Err(marshal::wrong_abstraction(other, "fixed-length hashfunction")),
        }
    }
}

fn parse_algorithm_name(payload: &ByteTree) -> Result<Sha2Algorithm> {
    let name_bytes = payload.leaf_bytes()?;
    if name_bytes.len() > config::MAX_ALGORITHM_NAME_BYTES {
        return Err(UrnaCryptoError::LengthCapExceeded {
            what: "algorithm name",
            got: name_bytes.len(),
            max: config::MAX_ALGORITHM_NAME_BYTES,
        });
    }
    let name = std::str::from_utf8(name_bytes).map_err(|e| {
        UrnaCryptoError::MalformedTree(format!("algorithm name is not UTF-8: {}", e))
    })?;
    Sha2Algorithm::from_name(name)
}

/// An in-progress digest of any hashfunction variant.
#[derive(Debug)]
pub enum HashDigest {
    Sha2(Sha2Digest),
    MerkleDamgard(MerkleDamgardDigest),
    RandomOracle(RandomOracleDigest),
    Pedersen(PedersenDigest),
}

impl HashDigest {
    /// Absorb `data`.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            HashDigest::Sha2(digest) => digest.update(data),
            HashDigest::MerkleDamgard(digest) => digest.update(data),
            HashDigest::RandomOracle(digest) => digest.update(data),
            HashDigest::Pedersen(digest) => digest.update(data),
        }
    }

    /// Produce the digest over everything absorbed so far.
    pub fn finalize(self) -> Result<Vec<u8>> {
        match self {
            HashDigest::Sha2(digest) => Ok(digest.finalize()),
            HashDigest::MerkleDamgard(digest) => digest.finalize(),
            HashDigest::RandomOracle(digest) => digest.finalize(),
            HashDigest::Pedersen(digest) => digest.finalize(),
        }
    }
}
