//! Decryption with proof verification.

use super::keys::NaorYungSecretKey;
use super::{broadcast_exp, compute_challenge};
use crate::bytetree::ByteTree;
use crate::error::{Result, UrnaCryptoError};
use crate::group::CyclicGroup;

impl<G: CyclicGroup> NaorYungSecretKey<G> {
    /// Decrypt `ciphertext` under `label`.
    ///
    /// The empty ciphertext decrypts to the empty message by convention.
    /// Every failure mode — malformed bytes, components outside the
    /// group, a proof that does not verify, an undecodable plaintext —
    /// collapses into `None`. Callers cannot distinguish among them;
    /// a finer-grained result would hand an attacker a decryption
    /// oracle.
    pub fn decrypt(&self, label: &[u8], ciphertext: &[u8]) -> Option<Vec<u8>> {
        if ciphertext.is_empty() {
            return Some(Vec::new());
        }
        self.try_decrypt(label, ciphertext).ok()
    }

    fn try_decrypt(&self, label: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let tree = ByteTree::from_bytes(ciphertext)?;
        let children = tree.children_exact(7)?;

        let declared = children[0].int_value()?;
        if declared <= 0 {
            return Err(UrnaCryptoError::Validation(
                "ciphertext width must be positive".to_string(),
            ));
        }
        let width = declared as usize;

        let u1 = self.parse_elements(&children[1], width)?;
        let u2 = self.parse_elements(&children[2], width)?;
        let e = self.parse_elements(&children[3], width)?;
        let a1 = self.parse_elements(&children[4], width)?;
        let a2 = self.parse_elements(&children[5], width)?;
        let d = self.parse_exponents(&children[6], width)?;

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

        // Accept iff u1^c * a1 == g1^d and u2^c * a2 == g2^d,
        // component-wise.
        let g1_d = broadcast_exp(&self.group, &self.g1, &d);
        let g2_d = broadcast_exp(&self.group, &self.g2, &d);
        for j in 0..width {
            let lhs1 = self.group.mul(&self.group.exp(&u1[j], &c), &a1[j]);
            let lhs2 = self.group.mul(&self.group.exp(&u2[j], &c), &a2[j]);
            if lhs1 != g1_d[j] || lhs2 != g2_d[j] {
                return Err(UrnaCryptoError::Validation(
                    "plaintext equality proof rejected".to_string(),
                ));
            }
        }

        // m = e * u1^(-z)
        let neg_z = self.group.exponent_neg(&self.z);
        let plaintext: Vec<G::Element> = e
            .iter()
            .zip(&u1)
            .map(|(e_j, u1_j)| self.group.mul(e_j, &self.group.exp(u1_j, &neg_z)))
            .collect();

        self.group.decode(&plaintext)
    }

    fn parse_elements(&self, tree: &ByteTree, width: usize) -> Result<Vec<G::Element>> {
        tree.children_exact(width)?
            .iter()
            .map(|child| self.group.element_from_byte_tree(child))
            .collect()
    }

    fn parse_exponents(&self, tree: &ByteTree, width: usize) -> Result<Vec<G::Exponent>> {
        tree.children_exact(width)?
            .iter()
            .map(|child| self.group.exponent_from_byte_tree(child))
            .collect()
    }
}
