//! The Naor-Yung CCA2-secure public-key cryptosystem.
//!
//! Two ElGamal encryptions under independent bases `g1`, `g2` share one
//! randomness vector, tied together by a non-interactive zero-knowledge
//! proof (Fiat-Shamir over a random oracle) that the same exponents were
//! used with both bases. The proof binds the caller's label into the
//! transcript, so a ciphertext decrypts only under the label it was
//! created with.
//!
//! The construction is generic over any prime-order group implementing
//! [`CyclicGroup`](crate::group::CyclicGroup). Messages of any length are
//! supported by encoding into a vector of group elements and broadcasting
//! the key across the product group.

mod decrypt;
mod encrypt;
mod keys;

pub use keys::{NaorYungKeyGen, NaorYungPublicKey, NaorYungSecretKey};

use num_bigint::BigUint;

use crate::bytetree::ByteTree;
use crate::error::Result;
use crate::group::CyclicGroup;
use crate::hash::{Hashfunction, RandomOracle};

/// Serialize a product-group element as the node of its components.
pub(crate) fn elements_to_tree<G: CyclicGroup>(group: &G, elements: &[G::Element]) -> ByteTree {
    ByteTree::node(
        elements
            .iter()
            .map(|element| group.element_to_byte_tree(element))
            .collect(),
    )
}

/// Serialize a product-ring element as the node of its components.
pub(crate) fn exponents_to_tree<G: CyclicGroup>(group: &G, exponents: &[G::Exponent]) -> ByteTree {
    ByteTree::node(
        exponents
            .iter()
            .map(|exponent| group.exponent_to_byte_tree(exponent))
            .collect(),
    )
}

/// Raise one base to each exponent of a product-ring element.
pub(crate) fn broadcast_exp<G: CyclicGroup>(
    group: &G,
    base: &G::Element,
    exponents: &[G::Exponent],
) -> Vec<G::Element> {
    exponents
        .iter()
        .map(|exponent| group.exp(base, exponent))
        .collect()
}

/// Component-wise product of two product-group elements.
pub(crate) fn pointwise_mul<G: CyclicGroup>(
    group: &G,
    a: &[G::Element],
    b: &[G::Element],
) -> Vec<G::Element> {
    a.iter().zip(b).map(|(x, y)| group.mul(x, y)).collect()
}

/// The Fiat-Shamir challenge: the random oracle applied to the canonical
/// byte tree of the transcript `(label, u1, u2, e, a1, a2)`, interpreted
/// as a non-negative integer and reduced into the exponent field.
///
/// The transcript order and the fixed-width component encodings are
/// normative; both sides must reproduce these bytes exactly.
pub(crate) fn compute_challenge<G: CyclicGroup>(
    group: &G,
    ro_hash: &Hashfunction,
    secpro: usize,
    label: &[u8],
    u1: &[G::Element],
    u2: &[G::Element],
    e: &[G::Element],
    a1: &[G::Element],
    a2: &[G::Element],
) -> Result<G::Exponent> {
    let transcript = ByteTree::node(vec![
        ByteTree::leaf(label.to_vec()),
        elements_to_tree(group, u1),
        elements_to_tree(group, u2),
        elements_to_tree(group, e),
        elements_to_tree(group, a1),
        elements_to_tree(group, a2),
    ]);
    let oracle = RandomOracle::new(ro_hash.clone(), secpro)?;
    let digest = oracle.hash(&transcript.to_bytes())?;
    Ok(group.exponent_from_integer(&BigUint::from_bytes_be(&digest)))
}
