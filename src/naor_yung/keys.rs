//! Key material and key generation for the Naor-Yung cryptosystem.

use tracing::info;

use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::group::CyclicGroup;
use crate::hash::Hashfunction;
use crate::marshal::{self, class_id, Marshalizable, UnmarshalAux};
use crate::random::RandomSource;

/// A Naor-Yung public key: two independent bases `g1`, `g2` and the
/// ElGamal key `h = g1^z`.
#[derive(Debug, Clone, PartialEq)]
pub struct NaorYungPublicKey<G: CyclicGroup> {
    pub(crate) ro_hash: Hashfunction,
    pub(crate) group: G,
    pub(crate) g1: G::Element,
    pub(crate) g2: G::Element,
    pub(crate) h: G::Element,
    pub(crate) secpro: usize,
}

impl<G: CyclicGroup> NaorYungPublicKey<G> {
    /// The underlying group.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// The bit length of the Fiat-Shamir challenge.
    pub fn secpro(&self) -> usize {
        self.secpro
    }
}

/// A Naor-Yung secret key: the discrete logarithm `z` of `h` to the
/// base `g1`, plus everything needed to recompute the proof challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct NaorYungSecretKey<G: CyclicGroup> {
    pub(crate) ro_hash: Hashfunction,
    pub(crate) group: G,
    pub(crate) g1: G::Element,
    pub(crate) g2: G::Element,
    pub(crate) z: G::Exponent,
    pub(crate) secpro: usize,
}

impl<G: CyclicGroup> NaorYungSecretKey<G> {
    /// The underlying group.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// The bit length of the Fiat-Shamir challenge.
    pub fn secpro(&self) -> usize {
        self.secpro
    }
}

/// Generator of Naor-Yung key pairs over a fixed group, random-oracle
/// hashfunction and challenge length.
#[derive(Debug, Clone, PartialEq)]
pub struct NaorYungKeyGen<G: CyclicGroup> {
    group: G,
    ro_hash: Hashfunction,
    secpro: usize,
}

impl<G: CyclicGroup> NaorYungKeyGen<G> {
    /// Build a key generator. `secpro` is the bit length of the proof
    /// challenge, in `[1, 1024]`; [`config::DEFAULT_SECPRO_BITS`] is the
    /// conventional choice.
    pub fn new(group: G, ro_hash: Hashfunction, secpro: usize) -> Result<Self> {
        validate_secpro(secpro)?;
        Ok(NaorYungKeyGen {
            group,
            ro_hash,
            secpro,
        })
    }

    /// Generate a key pair.
    ///
    /// `z` and the base separation exponent are drawn within statistical
    /// distance `2^-stat_dist` of uniform. The relation `h = g1^z` holds
    /// by construction and is never rechecked at decryption time.
    pub fn generate(
        &self,
        rs: &RandomSource,
        stat_dist: u32,
    ) -> Result<(NaorYungPublicKey<G>, NaorYungSecretKey<G>)> {
        let z = self.group.random_exponent(rs, stat_dist)?;
        let r = self.group.random_exponent(rs, stat_dist)?;

        let g1 = self.group.generator();
        let g2 = self.group.exp(&g1, &r);
        let h = self.group.exp(&g1, &z);

        info!(secpro = self.secpro, "generated Naor-Yung key pair");

        let public = NaorYungPublicKey {
            ro_hash: self.ro_hash.clone(),
            group: self.group.clone(),
            g1: g1.clone(),
            g2: g2.clone(),
            h,
            secpro: self.secpro,
        };
        let secret = NaorYungSecretKey {
            ro_hash: self.ro_hash.clone(),
            group: self.group.clone(),
            g1,
            g2,
            z,
            secpro: self.secpro,
        };
        Ok((public, secret))
    }
}

fn validate_secpro(secpro: usize) -> Result<()> {
    if !(config::MIN_SECPRO_BITS..=config::MAX_SECPRO_BITS).contains(&secpro) {
        return Err(UrnaCryptoError::Validation(format!(
            "challenge length of {} bits is outside [{}, {}]",
            secpro,
            config::MIN_SECPRO_BITS,
            config::MAX_SECPRO_BITS
        )));
    }
    Ok(())
}

fn check_key_size(payload: &ByteTree) -> Result<()> {
    let size = payload.encoded_length();
    if size > config::MAX_KEY_BYTES {
        return Err(UrnaCryptoError::LengthCapExceeded {
            what: "key material",
            got: size,
            max: config::MAX_KEY_BYTES,
        });
    }
    Ok(())
}

fn read_secpro(tree: &ByteTree) -> Result<usize> {
    let value = tree.int_value()?;
    if value < 0 {
        return Err(UrnaCryptoError::Validation(
            "negative challenge length".to_string(),
        ));
    }
    let secpro = value as usize;
    validate_secpro(secpro)?;
    Ok(secpro)
}

impl<G: CyclicGroup> Marshalizable for NaorYungPublicKey<G> {
    fn class_id(&self) -> &'static str {
        class_id::PUBLIC_KEY
    }

    fn to_payload(&self) -> ByteTree {
        ByteTree::node(vec![
            marshal::marshal(&self.ro_hash),
            marshal::marshal(&self.group),
            self.group.element_to_byte_tree(&self.g1),
            self.group.element_to_byte_tree(&self.g2),
            self.group.element_to_byte_tree(&self.h),
            ByteTree::int_leaf(self.secpro as i32),
        ])
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        if id != class_id::PUBLIC_KEY {
            return Err(marshal::wrong_abstraction(id, "public key"));
        }
        check_key_size(payload)?;
        let children = payload.children_exact(6)?;
        let ro_hash = marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
        let group: G = marshal::unmarshal_aux(&children[1], aux.random_source, aux.certainty)?;
        let g1 = group.element_from_byte_tree(&children[2])?;
        let g2 = group.element_from_byte_tree(&children[3])?;
        let h = group.element_from_byte_tree(&children[4])?;
        let secpro = read_secpro(&children[5])?;
        Ok(NaorYungPublicKey {
            ro_hash,
            group,
            g1,
            g2,
            h,
            secpro,
        })
    }
}

impl<G: CyclicGroup> Marshalizable for NaorYungSecretKey<G> {
    fn class_id(&self) -> &'static str {
        class_id::SECRET_KEY
    }

    fn to_payload(&self) -> ByteTree {
        ByteTree::node(vec![
            marshal::marshal(&self.ro_hash),
            marshal::marshal(&self.group),
            self.group.element_to_byte_tree(&self.g1),
            self.group.element_to_byte_tree(&self.g2),
            self.group.exponent_to_byte_tree(&self.z),
            ByteTree::int_leaf(self.secpro as i32),
        ])
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        if id != class_id::SECRET_KEY {
            return Err(marshal::wrong_abstraction(id, "secret key"));
        }
        check_key_size(payload)?;
        let children = payload.children_exact(6)?;
        let ro_hash = marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
        let group: G = marshal::unmarshal_aux(&children[1], aux.random_source, aux.certainty)?;
        let g1 = group.element_from_byte_tree(&children[2])?;
        let g2 = group.element_from_byte_tree(&children[3])?;
        let z = group.exponent_from_byte_tree(&children[4])?;
        let secpro = read_secpro(&children[5])?;
        Ok(NaorYungSecretKey {
            ro_hash,
            group,
            g1,
            g2,
            z,
            secpro,
        })
    }
}

impl<G: CyclicGroup> Marshalizable for NaorYungKeyGen<G> {
    fn class_id(&self) -> &'static str {
        class_id::KEY_GEN
    }

    fn to_payload(&self) -> ByteTree {
        ByteTree::node(vec![
            marshal::marshal(&self.group),
            marshal::marshal(&self.ro_hash),
            ByteTree::int_leaf(self.secpro as i32),
        ])
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        if id != class_id::KEY_GEN {
            return Err(marshal::wrong_abstraction(id, "key generator"));
        }
        let children = payload.children_exact(3)?;
        let group: G = marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
        let ro_hash = marshal::unmarshal_aux(&children[1], aux.random_source, aux.certainty)?;
        let secpro = read_secpro(&children[2])?;
        NaorYungKeyGen::new(group, ro_hash, secpro)
    }
}
