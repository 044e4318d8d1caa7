//! The Merkle-Damgard domain extender.
//!
//! Turns a fixed-input-length compression function into a hashfunction
//! over arbitrary-length inputs. The chaining value is written back into
//! the working block at a fixed offset; the final block carries the total
//! input length, so the digest depends only on the concatenated input
//! bytes and their count, never on how updates were chunked.

use super::FixedLengthHash;
use crate::error::{Result, UrnaCryptoError};
use crate::utils::bytes_for_bits;

/// Merkle-Damgard extension of a fixed-length compression function.
#[derive(Debug, Clone, PartialEq)]
pub struct MerkleDamgard {
    inner: FixedLengthHash,
    input_byte_length: usize,
    input_byte_offset: usize,
    output_byte_length: usize,
}

impl MerkleDamgard {
    /// Wrap `inner`, which must compress: its input must be longer than
    /// its output by enough room for the eight-byte length field.
    pub fn new(inner: FixedLengthHash) -> Result<Self> {
        let input_bits = inner.input_bits();
        let output_bits = inner.output_bits();
        if input_bits <= output_bits {
            return Err(UrnaCryptoError::Validation(format!(
                "inner function does not compress: {} input bits, {} output bits",
                input_bits, output_bits
            )));
        }

        let input_byte_length = input_bits / 8;
        // When the inner input length is not byte aligned, the leading
        // byte's high bits are ignored by the inner function; reserve
        // that byte for the chaining value only.
        let input_byte_offset = usize::from(input_bits % 8 != 0);
        let output_byte_length = bytes_for_bits(output_bits);

        let block_length = input_byte_offset + input_byte_length;
        if block_length < input_byte_offset + output_byte_length + 8 {
            return Err(UrnaCryptoError::Validation(format!(
                "inner function block of {} bytes cannot hold a chaining value and length field",
                block_length
            )));
        }

        Ok(MerkleDamgard {
            inner,
            input_byte_length,
            input_byte_offset,
            output_byte_length,
        })
    }

    /// The wrapped compression function.
    pub fn inner(&self) -> &FixedLengthHash {
        &self.inner
    }

    pub fn output_bits(&self) -> usize {
        self.inner.output_bits()
    }

    pub fn output_byte_length(&self) -> usize {
        self.output_byte_length
    }

    /// One-shot hash of `data`.
    pub fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut digest = self.digest();
        digest.update(data);
        digest.finalize()
    }

    /// A fresh incremental digest.
    pub fn digest(&self) -> MerkleDamgardDigest {
        let block_length = self.input_byte_offset + self.input_byte_length;
        MerkleDamgardDigest {
            inner: self.inner.clone(),
            temp: vec![0u8; block_length],
            index: self.input_byte_offset,
            total_bytes: 0,
            input_byte_offset: self.input_byte_offset,
            output_byte_length: self.output_byte_length,
        }
    }
}

/// An in-progress Merkle-Damgard digest.
#[derive(Debug, Clone)]
pub struct MerkleDamgardDigest {
    inner: FixedLengthHash,
    temp: Vec<u8>,
    index: usize,
    total_bytes: u64,
    input_byte_offset: usize,
    output_byte_length: usize,
}

impl MerkleDamgardDigest {
    /// Absorb `data`.
    pub fn update(&mut self, mut data: &[u8]) {
        self.total_bytes += data.len() as u64;
        while !data.is_empty() {
            let free = self.temp.len() - self.index;
            let take = free.min(data.len());
            self.temp[self.index..self.index + take].copy_from_slice(&data[..take]);
            self.index += take;
            data = &data[take..];
            if self.index == self.temp.len() {
                self.compress();
            }
        }
    }

    /// Compress the full working block and write the chaining value back
    /// at the reserved offset.
    fn compress(&mut self) {
        let chain = self
            .inner
            .hash(&self.temp)
            .expect("working block always matches the inner input length");
        let start = self.input_byte_offset;
        self.temp[start..start + self.output_byte_length].copy_from_slice(&chain);
        self.index = start + self.output_byte_length;
    }

    /// Pad, append the total input length, and produce the digest.
    pub fn finalize(mut self) -> Result<Vec<u8>> {
        let block_length = self.temp.len();

        // The length field needs eight bytes at the tail; if the current
        // block cannot hold it, close this block and start another.
        if block_length - self.index < 8 {
            self.temp[self.index..].fill(0);
            self.compress();
        }

        self.temp[self.index..block_length - 8].fill(0);
        self.temp[block_length - 8..].copy_from_slice(&self.total_bytes.to_be_bytes());
        self.inner.hash(&self.temp)
    }
}
