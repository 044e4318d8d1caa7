//! The multiplicative group of squares modulo a safe prime.
//!
//! For a safe prime `p = 2q + 1` the quadratic residues form a cyclic
//! group of prime order `q`. This is the reference binding of the
//! [`CyclicGroup`](super::CyclicGroup) contract: elements are residues,
//! exponents live in `Z_q`, and message bytes are embedded by salting a
//! framed block until it lands on a square.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::CyclicGroup;
use crate::bigint::{from_be_bytes, is_safe_prime, to_fixed_width_be};
use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::marshal::{class_id, wrong_abstraction, Marshalizable, UnmarshalAux};
use crate::random::RandomSource;
use crate::utils::bytes_for_bits;

/// The group of squares modulo a safe prime `p`, of prime order
/// `q = (p - 1) / 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModGroup {
    modulus: BigUint,
    order: BigUint,
    generator: BigUint,
    element_bytes: usize,
    exponent_bytes: usize,
}

impl ModGroup {
    /// Construct the group over `modulus`, validating that it is a safe
    /// prime with error probability at most `2^-certainty`.
    pub fn new(modulus: BigUint, rs: &RandomSource, certainty: u32) -> Result<Self> {
        if !is_safe_prime(&modulus, rs, certainty)? {
            return Err(UrnaCryptoError::NotSafePrime);
        }
        Self::from_safe_prime(modulus)
    }

    /// Construct the group over a modulus the caller already knows to be
    /// a safe prime (for instance a standardized constant). Only cheap
    /// structural checks are performed.
    pub fn from_safe_prime(modulus: BigUint) -> Result<Self> {
        let byte_length = bytes_for_bits(modulus.bits() as usize);
        if byte_length < config::MIN_GROUP_MODULUS_BYTES {
            return Err(UrnaCryptoError::Validation(format!(
                "modulus of {} bytes is below the {}-byte minimum",
                byte_length,
                config::MIN_GROUP_MODULUS_BYTES
            )));
        }
        if byte_length > config::MAX_MODULUS_BYTES {
            return Err(UrnaCryptoError::LengthCapExceeded {
                what: "modulus",
                got: byte_length,
                max: config::MAX_MODULUS_BYTES,
            });
        }
        // Safe primes above 5 are congruent to 3 mod 4.
        if !modulus.bit(0) || !modulus.bit(1) {
            return Err(UrnaCryptoError::Validation(
                "modulus is not congruent to 3 modulo 4".to_string(),
            ));
        }
        let order: BigUint = &modulus >> 1;
        let exponent_bytes = bytes_for_bits(order.bits() as usize);
        Ok(ModGroup {
            modulus,
            order,
            generator: BigUint::from(4u8),
            element_bytes: byte_length,
            exponent_bytes,
        })
    }

    /// The safe prime `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The group order `q = (p - 1) / 2`.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Whether `value` is a group element: a non-zero residue below the
    /// modulus whose order divides `q`.
    pub fn is_member(&self, value: &BigUint) -> bool {
        !value.is_zero()
            && value < &self.modulus
            && value.modpow(&self.order, &self.modulus).is_one()
    }

    /// Message bytes carried per encoded element.
    pub fn message_capacity(&self) -> usize {
        self.element_bytes - 1 - config::ENCODE_HEADER_BYTES
    }

    /// Embed one chunk as a group element: `[salt | len | chunk | 0..]`
    /// with the salt resampled until the block integer is a square.
    fn encode_block(&self, chunk: &[u8], rs: &RandomSource) -> Result<BigUint> {
        debug_assert!(chunk.len() <= self.message_capacity());
        let mut block = vec![0u8; self.element_bytes - 1];
        block[4..8].copy_from_slice(&(chunk.len() as u32).to_be_bytes());
        block[8..8 + chunk.len()].copy_from_slice(chunk);

        for _ in 0..config::MAX_ENCODE_ATTEMPTS {
            rs.get_bytes(&mut block[..4])?;
            let candidate = from_be_bytes(&block);
            if self.is_member(&candidate) {
                return Ok(candidate);
            }
        }
        Err(UrnaCryptoError::Internal(format!(
            "no square found in {} encoding attempts",
            config::MAX_ENCODE_ATTEMPTS
        )))
    }

    fn decode_block(&self, element: &BigUint) -> Result<Vec<u8>> {
        let bytes = to_fixed_width_be(element, self.element_bytes);
        if bytes[0] != 0 {
            return Err(UrnaCryptoError::Validation(
                "encoded element exceeds the message block range".to_string(),
            ));
        }
        let length = u32::from_be_bytes(
            bytes[5..9].try_into().expect("four bytes of length prefix"),
        ) as usize;
        if length > self.message_capacity() {
            return Err(UrnaCryptoError::Validation(format!(
                "encoded length {} exceeds the {}-byte capacity",
                length,
                self.message_capacity()
            )));
        }
        Ok(bytes[9..9 + length].to_vec())
    }
}

impl CyclicGroup for ModGroup {
    type Element = BigUint;
    type Exponent = BigUint;

    fn generator(&self) -> BigUint {
        self.generator.clone()
    }

    fn identity(&self) -> BigUint {
        BigUint::one()
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a * b % &self.modulus
    }

    fn exp(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.modulus)
    }

    fn element_byte_length(&self) -> usize {
        self.element_bytes
    }

    fn element_to_byte_tree(&self, element: &BigUint) -> ByteTree {
        ByteTree::leaf(to_fixed_width_be(element, self.element_bytes))
    }

    fn element_from_byte_tree(&self, tree: &ByteTree) -> Result<BigUint> {
        let bytes = tree.leaf_bytes()?;
        if bytes.len() != self.element_bytes {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "element leaf of {} bytes, expected {}",
                bytes.len(),
                self.element_bytes
            )));
        }
        let value = from_be_bytes(bytes);
        if !self.is_member(&value) {
            return Err(UrnaCryptoError::Validation(
                "value is not a member of the group".to_string(),
            ));
        }
        Ok(value)
    }

    fn encode(&self, message: &[u8], rs: &RandomSource) -> Result<Vec<BigUint>> {
        if message.is_empty() {
            return Ok(vec![self.encode_block(&[], rs)?]);
        }
        message
            .chunks(self.message_capacity())
            .map(|chunk| self.encode_block(chunk, rs))
            .collect()
    }

    fn decode(&self, elements: &[BigUint]) -> Result<Vec<u8>> {
        let mut message = Vec::new();
        for element in elements {
            message.extend_from_slice(&self.decode_block(element)?);
        }
        Ok(message)
    }

    fn random_exponent(&self, rs: &RandomSource, stat_dist: u32) -> Result<BigUint> {
        let mut raw = vec![0u8; bytes_for_bits(self.order.bits() as usize + stat_dist as usize)];
        rs.get_bytes(&mut raw)?;
        Ok(from_be_bytes(&raw) % &self.order)
    }

    fn exponent_from_integer(&self, value: &BigUint) -> BigUint {
        value % &self.order
    }

    fn exponent_from_bytes(&self, bytes: &[u8]) -> BigUint {
        from_be_bytes(bytes) % &self.order
    }

    fn exponent_add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.order
    }

    fn exponent_mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a * b % &self.order
    }

    fn exponent_neg(&self, a: &BigUint) -> BigUint {
        let reduced = a % &self.order;
        if reduced.is_zero() {
            BigUint::zero()
        } else {
            &self.order - reduced
        }
    }

    fn exponent_byte_length(&self) -> usize {
        self.exponent_bytes
    }

    fn exponent_encode_length(&self) -> usize {
        (self.order.bits() as usize - 1) / 8
    }

    fn exponent_to_byte_tree(&self, exponent: &BigUint) -> ByteTree {
        ByteTree::leaf(to_fixed_width_be(exponent, self.exponent_bytes))
    }

    fn exponent_from_byte_tree(&self, tree: &ByteTree) -> Result<BigUint> {
        let bytes = tree.leaf_bytes()?;
        if bytes.len() != self.exponent_bytes {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "exponent leaf of {} bytes, expected {}",
                bytes.len(),
                self.exponent_bytes
            )));
        }
        let value = from_be_bytes(bytes);
        if value >= self.order {
            return Err(UrnaCryptoError::Validation(
                "exponent is not reduced modulo the group order".to_string(),
            ));
        }
        Ok(value)
    }
}

impl Marshalizable for ModGroup {
    fn class_id(&self) -> &'static str {
        class_id::MOD_GROUP
    }

    fn to_payload(&self) -> ByteTree {
        ByteTree::leaf(self.modulus.to_bytes_be())
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        if id != class_id::MOD_GROUP {
            return Err(wrong_abstraction(id, "group"));
        }
        let bytes = payload.leaf_bytes()?;
        if bytes.len() > config::MAX_MODULUS_BYTES {
            return Err(UrnaCryptoError::LengthCapExceeded {
                what: "modulus",
                got: bytes.len(),
                max: config::MAX_MODULUS_BYTES,
            });
        }
        ModGroup::new(from_be_bytes(bytes), aux.random_source, aux.certainty)
    }
}
