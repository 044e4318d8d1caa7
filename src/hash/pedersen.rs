//! The Pedersen fixed-length hashfunction.
//!
//! An algebraic compression function over the safe-prime group: the input
//! is split into field-sized chunks `e_1 .. e_k` and compressed to
//! `g_1^e_1 * ... * g_k^e_k`. Collision resistance reduces to the
//! discrete logarithm problem among the generators.

use num_bigint::BigUint;

use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::group::{CyclicGroup, ModGroup};
use crate::marshal::{self, UnmarshalAux};
use crate::random::RandomSource;

/// Pedersen hash over the squares modulo a safe prime.
#[derive(Debug, Clone, PartialEq)]
pub struct PedersenHash {
    group: ModGroup,
    generators: Vec<BigUint>,
}

impl PedersenHash {
    /// Build the hash from `generators`, each of which must be a group
    /// member. The width is the number of generators, capped at
    /// [`config::MAX_PEDERSEN_WIDTH`].
    pub fn new(group: ModGroup, generators: Vec<BigUint>) -> Result<Self> {
        if generators.is_empty() || generators.len() > config::MAX_PEDERSEN_WIDTH {
            return Err(UrnaCryptoError::WidthOutOfRange {
                width: generators.len(),
                min: 1,
                max: config::MAX_PEDERSEN_WIDTH,
            });
        }
        for generator in &generators {
            if !group.is_member(generator) {
                return Err(UrnaCryptoError::Validation(
                    "Pedersen generator is not a member of the group".to_string(),
                ));
            }
        }
        Ok(PedersenHash { group, generators })
    }

    /// Derive `width` independent generators from a random source.
    pub fn generate(group: ModGroup, width: usize, rs: &RandomSource) -> Result<Self> {
        if width == 0 || width > config::MAX_PEDERSEN_WIDTH {
            return Err(UrnaCryptoError::WidthOutOfRange {
                width,
                min: 1,
                max: config::MAX_PEDERSEN_WIDTH,
            });
        }
        let g = group.generator();
        let generators = (0..width)
            .map(|_| {
                let exponent = group.random_exponent(rs, config::DEFAULT_STAT_DIST_BITS)?;
                Ok(group.exp(&g, &exponent))
            })
            .collect::<Result<Vec<_>>>()?;
        PedersenHash::new(group, generators)
    }

    /// Number of generators.
    pub fn width(&self) -> usize {
        self.generators.len()
    }

    /// Fixed input length in bits: one field encoding per generator.
    pub fn input_bits(&self) -> usize {
        8 * self.generators.len() * self.group.exponent_encode_length()
    }

    /// Output length in bits: one encoded group element.
    pub fn output_bits(&self) -> usize {
        8 * self.group.element_byte_length()
    }

    /// Compress `data` to an encoded group element.
    ///
    /// The input is parsed as consecutive big-endian integers of the
    /// field encoding length; a missing trailing chunk contributes the
    /// zero exponent. Inputs longer than the fixed input length are
    /// rejected.
    pub fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > self.input_bits() / 8 {
            return Err(UrnaCryptoError::LengthCapExceeded {
                what: "Pedersen input",
                got: data.len(),
                max: self.input_bits() / 8,
            });
        }
        let chunk_length = self.group.exponent_encode_length();
        let mut accumulator = self.group.identity();
        for (generator, chunk) in self.generators.iter().zip(data.chunks(chunk_length)) {
            let exponent = self.group.exponent_from_bytes(chunk);
            accumulator = self
                .group
                .mul(&accumulator, &self.group.exp(generator, &exponent));
        }
        let tree = self.group.element_to_byte_tree(&accumulator);
        tree.leaf_bytes().map(<[u8]>::to_vec)
    }

    /// A fresh incremental digest that buffers input until finalized.
    pub fn digest(&self) -> PedersenDigest {
        PedersenDigest {
            hash: self.clone(),
            buffer: Vec::new(),
        }
    }

    pub(crate) fn to_payload_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            marshal::marshal(&self.group),
            ByteTree::node(
                self.generators
                    .iter()
                    .map(|g| self.group.element_to_byte_tree(g))
                    .collect(),
            ),
        ])
    }

    pub(crate) fn from_payload_tree(payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        let children = payload.children_exact(2)?;
        let group: ModGroup =
            marshal::unmarshal_aux(&children[0], aux.random_source, aux.certainty)?;
        let generator_trees = children[1].children()?;
        if generator_trees.is_empty() || generator_trees.len() > config::MAX_PEDERSEN_WIDTH {
            return Err(UrnaCryptoError::WidthOutOfRange {
                width: generator_trees.len(),
                min: 1,
                max: config::MAX_PEDERSEN_WIDTH,
            });
        }
        let generators = generator_trees
            .iter()
            .map(|tree| group.element_from_byte_tree(tree))
            .collect::<Result<Vec<_>>>()?;
        PedersenHash::new(group, generators)
    }
}

/// An in-progress Pedersen digest.
#[derive(Debug, Clone)]
pub struct PedersenDigest {
    hash: PedersenHash,
    buffer: Vec<u8>,
}

impl PedersenDigest {
    pub fn update(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn finalize(self) -> Result<Vec<u8>> {
        self.hash.hash(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Hashfunction;
    use crate::prg::{HashCounterPrg, Prg};

    /// 768-bit safe prime from RFC 2409 (Oakley group 1).
    const OAKLEY_1: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                            020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                            4FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";

    fn group() -> ModGroup {
        let modulus = BigUint::parse_bytes(OAKLEY_1.as_bytes(), 16).unwrap();
        ModGroup::from_safe_prime(modulus).unwrap()
    }

    fn source() -> RandomSource {
        let prg = HashCounterPrg::new(Hashfunction::sha256());
        prg.set_seed(&[11u8; 32]).unwrap();
        RandomSource::Prg(Prg::HashCounter(prg))
    }

    #[test]
    fn test_deterministic_and_collision_free_on_samples() {
        let pedersen = PedersenHash::generate(group(), 2, &source()).unwrap();
        let a = pedersen.hash(b"one input").unwrap();
        let b = pedersen.hash(b"one input").unwrap();
        let c = pedersen.hash("другой".as_bytes()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), pedersen.output_bits() / 8);
    }

    #[test]
    fn test_oversize_input_rejected() {
        let pedersen = PedersenHash::generate(group(), 2, &source()).unwrap();
        let too_long = vec![1u8; pedersen.input_bits() / 8 + 1];
        assert!(pedersen.hash(&too_long).is_err());
    }

    #[test]
    fn test_width_bounds() {
        assert!(PedersenHash::generate(group(), 0, &source()).is_err());
        assert!(
            PedersenHash::generate(group(), config::MAX_PEDERSEN_WIDTH + 1, &source()).is_err()
        );
    }

    #[test]
    fn test_digest_matches_hash() {
        let pedersen = PedersenHash::generate(group(), 3, &source()).unwrap();
        let data = vec![0x5au8; 100];
        let mut digest = pedersen.digest();
        digest.update(&data[..40]);
        digest.update(&data[40..]);
        assert_eq!(digest.finalize().unwrap(), pedersen.hash(&data).unwrap());
    }

    #[test]
    fn test_non_member_generator_rejected() {
        let group = group();
        let non_member = group.modulus() - BigUint::from(4u8);
        assert!(PedersenHash::new(group, vec![non_member]).is_err());
    }
}
