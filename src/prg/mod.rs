//! Seeded pseudo-random generators.
//!
//! PRGs extend the random-source contract with seeding: output is fully
//! determined by the seed, so two instances seeded identically produce
//! identical byte streams. The closed variant set is the heuristic
//! hash-with-counter PRG and the DDH-based ElGamal PRG.

pub mod elgamal;
pub mod hash_counter;

pub use elgamal::ElGamalPrg;
pub use hash_counter::HashCounterPrg;

use num_traits::ToPrimitive;

use crate::bigint::from_be_bytes;
use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::marshal::{self, class_id, Marshalizable, UnmarshalAux};

/// A seeded pseudo-random generator.
#[derive(Debug, PartialEq)]
pub enum Prg {
    /// Hash-with-counter construction.
    HashCounter(HashCounterPrg),
    /// ElGamal construction over a safe-prime group.
    ElGamal(ElGamalPrg),
}

impl Prg {
    /// Minimum number of seed bytes accepted by [`Prg::set_seed`].
    pub fn min_seed_bytes(&self) -> usize {
        match self {
            Prg::HashCounter(prg) => prg.min_seed_bytes(),
            Prg::ElGamal(prg) => prg.min_seed_bytes(),
        }
    }

    /// Install a seed, atomically replacing any previous state.
    pub fn set_seed(&self, seed: &[u8]) -> Result<()> {
        match self {
            Prg::HashCounter(prg) => prg.set_seed(seed),
            Prg::ElGamal(prg) => prg.set_seed(seed),
        }
    }

    /// Fill `dest` with the next output bytes.
    ///
    /// # Panics
    ///
    /// Panics if the PRG has never been seeded.
    pub fn get_bytes(&self, dest: &mut [u8]) -> Result<()> {
        match self {
            Prg::HashCounter(prg) => prg.get_bytes(dest),
            Prg::ElGamal(prg) => prg.get_bytes(dest),
        }
    }
}

impl Marshalizable for Prg {
    fn class_id(&self) -> &'static str {
        match self {
            Prg::HashCounter(_) => class_id::HASH_COUNTER_PRG,
            Prg::ElGamal(_) => class_id::ELGAMAL_PRG,
        }
    }

    fn to_payload(&self) -> ByteTree {
        match self {
            Prg::HashCounter(prg) => marshal::marshal(prg.hashfunction()),
            Prg::ElGamal(prg) => ByteTree::node(vec![
                ByteTree::leaf(prg.modulus().to_bytes_be()),
                ByteTree::int_leaf(prg.width() as i32),
                ByteTree::int_leaf(prg.stat_dist() as i32),
            ]),
        }
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        match id {
            class_id::HASH_COUNTER_PRG => {
                let hashfunction =
                    marshal::unmarshal_aux(payload, aux.random_source, aux.certainty)?;
                Ok(Prg::HashCounter(HashCounterPrg::new(hashfunction)))
            }
            class_id::ELGAMAL_PRG => {
                let children = payload.children_exact(3)?;
                let modulus_bytes = children[0].leaf_bytes()?;
                if modulus_bytes.len() > config::MAX_MODULUS_BYTES {
                    return Err(UrnaCryptoError::LengthCapExceeded {
                        what: "modulus",
                        got: modulus_bytes.len(),
                        max: config::MAX_MODULUS_BYTES,
                    });
                }
                let width = children[1].int_value()?;
                let stat_dist = children[2].int_value()?;
                let width = width.to_usize().ok_or(UrnaCryptoError::WidthOutOfRange {
                    width: 0,
                    min: config::MIN_PRG_WIDTH,
                    max: config::MAX_PRG_WIDTH,
                })?;
                let stat_dist = stat_dist.to_u32().ok_or_else(|| {
                    UrnaCryptoError::Validation("negative statistical distance".to_string())
                })?;
                Ok(Prg::ElGamal(ElGamalPrg::new(
                    from_be_bytes(modulus_bytes),
                    width,
                    stat_dist,
                    aux.random_source,
                    aux.certainty,
                )?))
            }
            other => Err(marshal::wrong_abstraction(other, "PRG")),
        }
    }
}
