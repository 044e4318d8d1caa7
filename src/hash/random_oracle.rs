//! The random-oracle construction.
//!
//! Produces output of an arbitrary bit length from any hashfunction: the
//! requested output length is prepended to the input as a four-byte
//! big-endian prefix, the inner hashfunction digests the result, and a
//! hash-counter PRG seeded with that digest expands it to the requested
//! length. The length prefix separates the domains of oracles with
//! different output lengths, so their outputs are independent.

use super::{HashDigest, Hashfunction};
use crate::error::{Result, UrnaCryptoError};
use crate::prg::HashCounterPrg;
use crate::utils::{bytes_for_bits, mask_to_bit_length};

/// A random oracle with a fixed output bit length.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomOracle {
    inner: Hashfunction,
    output_bits: usize,
}

impl RandomOracle {
    /// Build an oracle over `inner` producing `output_bits` bits.
    pub fn new(inner: Hashfunction, output_bits: usize) -> Result<Self> {
        if output_bits == 0 {
            return Err(UrnaCryptoError::Validation(
                "random oracle output length must be positive".to_string(),
            ));
        }
        Ok(RandomOracle { inner, output_bits })
    }

    /// The wrapped hashfunction.
    pub fn inner(&self) -> &Hashfunction {
        &self.inner
    }

    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    /// Output length in whole bytes; the leading surplus bits are zero.
    pub fn output_byte_length(&self) -> usize {
        bytes_for_bits(self.output_bits)
    }

    /// One-shot oracle query.
    pub fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut digest = self.digest();
        digest.update(data);
        digest.finalize()
    }

    /// A fresh incremental digest; the length prefix is already fed.
    pub fn digest(&self) -> RandomOracleDigest {
        let mut inner_digest = self.inner.digest();
        inner_digest.update(&(self.output_bits as u32).to_be_bytes());
        RandomOracleDigest {
            inner_digest: Box::new(inner_digest),
            expander: self.inner.clone(),
            output_bits: self.output_bits,
        }
    }
}

/// An in-progress random-oracle query.
#[derive(Debug)]
pub struct RandomOracleDigest {
    inner_digest: Box<HashDigest>,
    expander: Hashfunction,
    output_bits: usize,
}

impl RandomOracleDigest {
    pub fn update(&mut self, data: &[u8]) {
        self.inner_digest.update(data);
    }

    pub fn finalize(self) -> Result<Vec<u8>> {
        let seed = self.inner_digest.finalize()?;
        let prg = HashCounterPrg::new(self.expander);
        prg.set_seed(&seed)?;
        let mut output = vec![0u8; bytes_for_bits(self.output_bits)];
        prg.get_bytes(&mut output)?;
        mask_to_bit_length(&mut output, self.output_bits);
        Ok(output)
    }
}
