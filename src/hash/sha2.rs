//! Platform SHA-2 hashfunctions.
//!
//! Thin wrappers over the `sha2` crate. A fresh underlying digest is
//! instantiated per call, so concurrent hashing through a shared
//! [`Sha2Hash`] is safe.

use sha2::{Digest as _, Sha256, Sha384, Sha512};

use crate::error::{Result, UrnaCryptoError};

/// The supported SHA-2 family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sha2Algorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl Sha2Algorithm {
    /// The canonical algorithm name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Sha2Algorithm::Sha256 => "SHA-256",
            Sha2Algorithm::Sha384 => "SHA-384",
            Sha2Algorithm::Sha512 => "SHA-512",
        }
    }

    /// Resolve a wire-level algorithm name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "SHA-256" => Ok(Sha2Algorithm::Sha256),
            "SHA-384" => Ok(Sha2Algorithm::Sha384),
            "SHA-512" => Ok(Sha2Algorithm::Sha512),
            other => Err(UrnaCryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Digest length in bits.
    pub fn output_bits(self) -> usize {
        match self {
            Sha2Algorithm::Sha256 => 256,
            Sha2Algorithm::Sha384 => 384,
            Sha2Algorithm::Sha512 => 512,
        }
    }

    /// Internal block length in bits. This is the input length when the
    /// function is reused as a fixed-length compression primitive.
    pub fn block_bits(self) -> usize {
        match self {
            Sha2Algorithm::Sha256 => 512,
            Sha2Algorithm::Sha384 | Sha2Algorithm::Sha512 => 1024,
        }
    }
}

/// A platform SHA-2 hashfunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha2Hash {
    algorithm: Sha2Algorithm,
}

impl Sha2Hash {
    pub fn new(algorithm: Sha2Algorithm) -> Self {
        Sha2Hash { algorithm }
    }

    pub fn algorithm(&self) -> Sha2Algorithm {
        self.algorithm
    }

    pub fn output_bits(&self) -> usize {
        self.algorithm.output_bits()
    }

    /// Input length in bits when used as a fixed-length primitive.
    pub fn input_bits(&self) -> usize {
        self.algorithm.block_bits()
    }

    /// One-shot hash of `data`.
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut digest = self.digest();
        digest.update(data);
        digest.finalize()
    }

    /// A fresh incremental digest.
    pub fn digest(&self) -> Sha2Digest {
        match self.algorithm {
            Sha2Algorithm::Sha256 => Sha2Digest::Sha256(Sha256::new()),
            Sha2Algorithm::Sha384 => Sha2Digest::Sha384(Sha384::new()),
            Sha2Algorithm::Sha512 => Sha2Digest::Sha512(Sha512::new()),
        }
    }
}

/// An in-progress SHA-2 digest.
#[derive(Debug, Clone)]
pub enum Sha2Digest {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Sha2Digest {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Sha2Digest::Sha256(d) => d.update(data),
            Sha2Digest::Sha384(d) => d.update(data),
            Sha2Digest::Sha512(d) => d.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Sha2Digest::Sha256(d) => d.finalize().to_vec(),
            Sha2Digest::Sha384(d) => d.finalize().to_vec(),
            Sha2Digest::Sha512(d) => d.finalize().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector_sha256() {
        // FIPS 180 test vector for "abc"
        let hash = Sha2Hash::new(Sha2Algorithm::Sha256);
        assert_eq!(
            hex::encode(hash.hash(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_output_lengths() {
        for (algorithm, bytes) in [
            (Sha2Algorithm::Sha256, 32),
            (Sha2Algorithm::Sha384, 48),
            (Sha2Algorithm::Sha512, 64),
        ] {
            assert_eq!(Sha2Hash::new(algorithm).hash(b"x").len(), bytes);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for algorithm in [
            Sha2Algorithm::Sha256,
            Sha2Algorithm::Sha384,
            Sha2Algorithm::Sha512,
        ] {
            assert_eq!(Sha2Algorithm::from_name(algorithm.name()).unwrap(), algorithm);
        }
        assert!(Sha2Algorithm::from_name("MD5").is_err());
    }
}
