//! The cyclic-group seam of the cryptosystem.
//!
//! The Naor-Yung construction is generic over a prime-order group together
//! with its exponent ring `Z_q`. This module defines that contract as a
//! trait and provides one reference binding, [`ModGroup`]: the group of
//! squares modulo a safe prime.

pub mod modp;

pub use modp::ModGroup;

use num_bigint::BigUint;

use crate::bytetree::ByteTree;
use crate::error::Result;
use crate::marshal::Marshalizable;
use crate::random::RandomSource;

/// A cyclic group of prime order `q` with its exponent ring `Z_q`.
///
/// Elements and exponents are plain values; all arithmetic goes through
/// the group so that a single object carries the modulus and derived
/// parameters. Implementations must make `element_from_byte_tree` and
/// `exponent_from_byte_tree` total over attacker-supplied trees: invalid
/// encodings and non-members yield errors, never panics.
pub trait CyclicGroup: Marshalizable + Clone + PartialEq + std::fmt::Debug {
    /// A group element.
    type Element: Clone + PartialEq + std::fmt::Debug;
    /// An exponent in `Z_q`.
    type Exponent: Clone + PartialEq + std::fmt::Debug;

    /// The canonical generator.
    fn generator(&self) -> Self::Element;

    /// The identity element.
    fn identity(&self) -> Self::Element;

    /// Group operation.
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Exponentiation by a ring element.
    fn exp(&self, base: &Self::Element, exponent: &Self::Exponent) -> Self::Element;

    /// Fixed byte length of an encoded element.
    fn element_byte_length(&self) -> usize;

    /// Canonical byte tree of an element (fixed-width leaf).
    fn element_to_byte_tree(&self, element: &Self::Element) -> ByteTree;

    /// Parse an element, rejecting non-members.
    fn element_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Element>;

    /// Encode message bytes as group elements. The number of elements
    /// depends on the group's message capacity; the empty message encodes
    /// as a single element.
    fn encode(&self, message: &[u8], rs: &RandomSource) -> Result<Vec<Self::Element>>;

    /// Recover the message bytes from encoded elements.
    fn decode(&self, elements: &[Self::Element]) -> Result<Vec<u8>>;

    /// Draw an exponent within statistical distance `2^-stat_dist` of
    /// uniform over `Z_q`.
    fn random_exponent(&self, rs: &RandomSource, stat_dist: u32) -> Result<Self::Exponent>;

    /// Reduce a non-negative integer into `Z_q`.
    fn exponent_from_integer(&self, value: &BigUint) -> Self::Exponent;

    /// Reduce a big-endian byte string into `Z_q`.
    fn exponent_from_bytes(&self, bytes: &[u8]) -> Self::Exponent;

    /// Ring addition.
    fn exponent_add(&self, a: &Self::Exponent, b: &Self::Exponent) -> Self::Exponent;

    /// Ring multiplication.
    fn exponent_mul(&self, a: &Self::Exponent, b: &Self::Exponent) -> Self::Exponent;

    /// Additive inverse in the ring.
    fn exponent_neg(&self, a: &Self::Exponent) -> Self::Exponent;

    /// Fixed byte length of an encoded exponent.
    fn exponent_byte_length(&self) -> usize;

    /// Byte length of field values that reduce into `Z_q` without bias;
    /// this is the input chunk size of the Pedersen hashfunction.
    fn exponent_encode_length(&self) -> usize;

    /// Canonical byte tree of an exponent (fixed-width leaf).
    fn exponent_to_byte_tree(&self, exponent: &Self::Exponent) -> ByteTree;

    /// Parse an exponent, rejecting values outside `[0, q)`.
    fn exponent_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Exponent>;
}
