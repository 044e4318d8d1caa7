//! Encryption with a non-interactive proof of plaintext equality.

use tracing::debug;

use super::keys::NaorYungPublicKey;
use super::{broadcast_exp, compute_challenge, elements_to_tree, exponents_to_tree, pointwise_mul};
use crate::bytetree::ByteTree;
use crate::error::{Result, UrnaCryptoError};
use crate::group::CyclicGroup;
use crate::random::RandomSource;

impl<G: CyclicGroup> NaorYungPublicKey<G> {
    /// Encrypt `message` under `label`.
    ///
    /// The message is encoded as a vector of `w` group elements and both
    /// ElGamal legs are computed component-wise over the product group
    /// with a shared randomness vector `r`. The Fiat-Shamir proof
    /// certifies that `u1` and `u2` use the same `r` relative to `g1`
    /// and `g2`, which is what makes the scheme CCA2 secure. The label
    /// is bound into the proof transcript: decryption under any other
    /// label fails.
    ///
    /// Returns the serialized ciphertext
    /// `Node(w, u1, u2, e, a1, a2, d)`.
    pub fn encrypt(
        &self,
        label: &[u8],
        message: &[u8],
        rs: &RandomSource,
        stat_dist: u32,
    ) -> Result<Vec<u8>> {
        let encoded = self.group.encode(message, rs)?;
        let width = encoded.len();
        if width > i32::MAX as usize {
            return Err(UrnaCryptoError::Validation(
                "message encodes to too many group elements".to_string(),
            ));
        }

        let r = self.random_exponents(width, rs, stat_dist)?;
        let s = self.random_exponents(width, rs, stat_dist)?;

        let u1 = broadcast_exp(&self.group, &self.g1, &r);
        let u2 = broadcast_exp(&self.group, &self.g2, &r);
        let h_r = broadcast_exp(&self.group, &self.h, &r);
        let e = pointwise_mul(&self.group, &h_r, &encoded);
        let a1 = broadcast_exp(&self.group, &self.g1, &s);
        let a2 = broadcast_exp(&self.group, &self.g2, &s);

        let c = compute_challenge(
            &self.group,
            &self.ro_hash,
            self.secpro,
            label,
            &u1,
            &u2,
            &e,
            &a1,
            &a2,
        )?;

        // d = r * c + s, component-wise in the exponent ring
        let d: Vec<G::Exponent> = r
            .iter()
            .zip(&s)
            .map(|(r_j, s_j)| {
                self.group
                    .exponent_add(&self.group.exponent_mul(r_j, &c), s_j)
            })
            .collect();

        debug!(width, label_bytes = label.len(), "encrypted message");

        let ciphertext = ByteTree::node(vec![
            ByteTree::int_leaf(width as i32),
            elements_to_tree(&self.group, &u1),
            elements_to_tree(&self.group, &u2),
            elements_to_tree(&self.group, &e),
            elements_to_tree(&self.group, &a1),
            elements_to_tree(&self.group, &a2),
            exponents_to_tree(&self.group, &d),
        ]);
        Ok(ciphertext.to_bytes())
    }

    fn random_exponents(
        &self,
        width: usize,
        rs: &RandomSource,
        stat_dist: u32,
    ) -> Result<Vec<G::Exponent>> {
        (0..width)
            .map(|_| self.group.random_exponent(rs, stat_dist))
            .collect()
    }
}
