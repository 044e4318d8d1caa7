//! The ElGamal PRG: provably secure pseudo-randomness under DDH.
//!
//! Works in the group of squares modulo a safe prime `p = 2q + 1`. The
//! seed supplies a secret exponent `r` and generators `g_0 .. g_{k-1}`.
//! Each block computes `l_i = g_i^r mod p`, folds values above `q` back
//! into `[0, q)` by the symmetry of squares, emits the truncated byte
//! form of `l_1 .. l_{k-1}`, and replaces `r` with `l_0` for the next
//! block. Widths above two stretch the user seed through a width-two
//! bootstrap instance over the same modulus.

use std::sync::Mutex;

use num_bigint::BigUint;

use crate::bigint::{from_be_bytes, is_safe_prime, to_fixed_width_be, FixedBaseTable};
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::random::RandomSource;
use crate::utils::bytes_for_bits;

/// The ElGamal PRG over a safe-prime group of squares.
///
/// Fixed-base exponentiation tables for the generators live in the seeded
/// state and are released when the PRG is dropped or reseeded.
#[derive(Debug)]
pub struct ElGamalPrg {
    modulus: BigUint,
    group_order: BigUint,
    width: usize,
    stat_dist: u32,
    chunk_bytes: usize,
    output_width: usize,
    state: Mutex<ElGamalState>,
}

#[derive(Debug)]
struct ElGamalState {
    exponent: BigUint,
    tables: Vec<FixedBaseTable>,
    buffer: Vec<u8>,
    position: usize,
    seeded: bool,
}

impl ElGamalPrg {
    /// Build a PRG over `modulus`, validating that it is a safe prime
    /// with error probability at most `2^-certainty`.
    pub fn new(
        modulus: BigUint,
        width: usize,
        stat_dist: u32,
        rs: &RandomSource,
        certainty: u32,
    ) -> Result<Self> {
        if !is_safe_prime(&modulus, rs, certainty)? {
            return Err(UrnaCryptoError::NotSafePrime);
        }
        Self::from_safe_prime(modulus, width, stat_dist)
    }

    /// Build a PRG over a modulus the caller already knows to be a safe
    /// prime. Only cheap structural checks are performed.
    pub fn from_safe_prime(modulus: BigUint, width: usize, stat_dist: u32) -> Result<Self> {
        if !(config::MIN_PRG_WIDTH..=config::MAX_PRG_WIDTH).contains(&width) {
            return Err(UrnaCryptoError::WidthOutOfRange {
                width,
                min: config::MIN_PRG_WIDTH,
                max: config::MAX_PRG_WIDTH,
            });
        }
        if stat_dist == 0 || stat_dist > config::MAX_STAT_DIST_BITS {
            return Err(UrnaCryptoError::Validation(format!(
                "statistical distance of {} bits is outside [1, {}]",
                stat_dist,
                config::MAX_STAT_DIST_BITS
            )));
        }
        let modulus_bits = modulus.bits() as usize;
        let modulus_bytes = bytes_for_bits(modulus_bits);
        if modulus_bytes > config::MAX_MODULUS_BYTES {
            return Err(UrnaCryptoError::LengthCapExceeded {
                what: "modulus",
                got: modulus_bytes,
                max: config::MAX_MODULUS_BYTES,
            });
        }
        let sigma_bytes = bytes_for_bits(stat_dist as usize);
        if modulus_bits / 8 <= sigma_bytes {
            return Err(UrnaCryptoError::Validation(format!(
                "modulus of {} bits is too small for a statistical distance of {} bits",
                modulus_bits, stat_dist
            )));
        }

        Ok(ElGamalPrg {
            group_order: &modulus >> 1,
            chunk_bytes: bytes_for_bits(modulus_bits + stat_dist as usize),
            output_width: modulus_bits / 8 - sigma_bytes,
            modulus,
            width,
            stat_dist,
            state: Mutex::new(ElGamalState {
                exponent: BigUint::from(0u8),
                tables: Vec::new(),
                buffer: Vec::new(),
                position: 0,
                seeded: false,
            }),
        })
    }

    /// The safe prime modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The number of generators.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The statistical distance parameter in bits.
    pub fn stat_dist(&self) -> u32 {
        self.stat_dist
    }

    /// Minimum seed length: one exponent chunk plus the two generator
    /// chunks of the width-two layout. Larger widths stretch the seed
    /// through a bootstrap instance, so the minimum does not grow.
    pub fn min_seed_bytes(&self) -> usize {
        3 * self.chunk_bytes
    }

    /// Install `seed`, replacing any previous state and its tables.
    pub fn set_seed(&self, seed: &[u8]) -> Result<()> {
        if seed.len() < self.min_seed_bytes() {
            return Err(UrnaCryptoError::SeedTooShort {
                got: seed.len(),
                need: self.min_seed_bytes(),
            });
        }

        let (exponent, generators) = if self.width == config::MIN_PRG_WIDTH {
            self.parse_direct_seed(seed)
        } else {
            self.stretch_seed(seed)?
        };

        let table_bits = (8 * self.chunk_bytes) as u64;
        let tables = generators
            .iter()
            .map(|g| FixedBaseTable::new(g, &self.modulus, table_bits))
            .collect();

        let mut state = self.lock()?;
        state.exponent = exponent;
        state.tables = tables;
        state.buffer.clear();
        state.position = 0;
        state.seeded = true;
        Ok(())
    }

    /// Width-two layout: the seed is the exponent chunk followed by two
    /// generator chunks.
    fn parse_direct_seed(&self, seed: &[u8]) -> (BigUint, Vec<BigUint>) {
        let exponent = from_be_bytes(&seed[..self.chunk_bytes]);
        let generators = (0..2)
            .map(|i| {
                let start = (1 + i) * self.chunk_bytes;
                self.derive_generator(&seed[start..start + self.chunk_bytes])
            })
            .collect();
        (exponent, generators)
    }

    /// Widths above two: seed a width-two bootstrap instance over the
    /// same modulus and draw the exponent and all generators from it.
    /// Its exponentiation tables are released when it goes out of scope.
    fn stretch_seed(&self, seed: &[u8]) -> Result<(BigUint, Vec<BigUint>)> {
        let bootstrap =
            Self::from_safe_prime(self.modulus.clone(), config::MIN_PRG_WIDTH, self.stat_dist)?;
        bootstrap.set_seed(seed)?;

        let mut chunk = vec![0u8; self.chunk_bytes];
        bootstrap.get_bytes(&mut chunk)?;
        let exponent = from_be_bytes(&chunk);

        let mut generators = Vec::with_capacity(self.width);
        for _ in 0..self.width {
            bootstrap.get_bytes(&mut chunk)?;
            generators.push(self.derive_generator(&chunk));
        }
        Ok((exponent, generators))
    }

    /// Reduce a chunk modulo `p` and square it so the generator lies in
    /// the group of squares.
    fn derive_generator(&self, chunk: &[u8]) -> BigUint {
        let reduced = from_be_bytes(chunk) % &self.modulus;
        &reduced * &reduced % &self.modulus
    }

    /// Fill `dest` with the next output bytes.
    ///
    /// # Panics
    ///
    /// Panics if the PRG has never been seeded; that is a programming
    /// error, not a recoverable condition.
    pub fn get_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let mut state = self.lock()?;
        assert!(state.seeded, "get_bytes called on an unseeded PRG");

        let mut written = 0;
        while written < dest.len() {
            if state.position == state.buffer.len() {
                self.iterate(&mut state);
            }
            let take = (dest.len() - written).min(state.buffer.len() - state.position);
            dest[written..written + take]
                .copy_from_slice(&state.buffer[state.position..state.position + take]);
            state.position += take;
            written += take;
        }
        Ok(())
    }

    /// One block step: exponentiate every generator by the current secret
    /// exponent, fold into `[0, q)`, emit the tail generators and keep
    /// the first as the next exponent.
    fn iterate(&self, state: &mut ElGamalState) {
        state.buffer.clear();
        state.position = 0;

        let mut next_exponent = state.exponent.clone();
        for (i, table) in state.tables.iter().enumerate() {
            let mut value = table.pow(&state.exponent);
            if value > self.group_order {
                value = (&self.modulus - &value) % &self.group_order;
            }
            if i == 0 {
                next_exponent = value;
            } else {
                state
                    .buffer
                    .extend_from_slice(&to_fixed_width_be(&value, self.output_width));
            }
        }
        state.exponent = next_exponent;
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ElGamalState>> {
        self.state
            .lock()
            .map_err(|_| UrnaCryptoError::Internal("PRG lock poisoned".to_string()))
    }
}

impl PartialEq for ElGamalPrg {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
            && self.width == other.width
            && self.stat_dist == other.stat_dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 768-bit safe prime from RFC 2409 (Oakley group 1).
    const OAKLEY_1: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                            020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                            4FE1356D6D51C245E485B576625E7EC6F44C42E9A63A3620FFFFFFFFFFFFFFFF";

    fn modulus() -> BigUint {
        BigUint::parse_bytes(OAKLEY_1.as_bytes(), 16).unwrap()
    }

    fn seeded(width: usize, fill: u8) -> ElGamalPrg {
        let prg = ElGamalPrg::from_safe_prime(modulus(), width, 100).unwrap();
        let seed = vec![fill; prg.min_seed_bytes()];
        prg.set_seed(&seed).unwrap();
        prg
    }

    #[test]
    fn test_same_seed_same_stream() {
        for width in [2, 3, 5] {
            let mut a = vec![0u8; 700];
            let mut b = vec![0u8; 700];
            seeded(width, 0x17).get_bytes(&mut a).unwrap();
            seeded(width, 0x17).get_bytes(&mut b).unwrap();
            assert_eq!(a, b, "width {} streams diverged", width);
        }
    }

    #[test]
    fn test_chunked_reads_match_bulk_read() {
        let mut bulk = vec![0u8; 600];
        seeded(2, 0x23).get_bytes(&mut bulk).unwrap();

        let prg = seeded(2, 0x23);
        let mut pieces = vec![0u8; 600];
        let mut offset = 0;
        for size in [1usize, 9, 90, 500] {
            prg.get_bytes(&mut pieces[offset..offset + size]).unwrap();
            offset += size;
        }
        assert_eq!(pieces, bulk);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = vec![0u8; 128];
        let mut b = vec![0u8; 128];
        seeded(2, 1).get_bytes(&mut a).unwrap();
        seeded(2, 2).get_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seed_length_enforced() {
        let prg = ElGamalPrg::from_safe_prime(modulus(), 2, 100).unwrap();
        let short = vec![0u8; prg.min_seed_bytes() - 1];
        assert!(matches!(
            prg.set_seed(&short),
            Err(UrnaCryptoError::SeedTooShort { .. })
        ));
    }

    #[test]
    fn test_width_bounds_enforced() {
        assert!(ElGamalPrg::from_safe_prime(modulus(), 1, 100).is_err());
        assert!(
            ElGamalPrg::from_safe_prime(modulus(), config::MAX_PRG_WIDTH + 1, 100).is_err()
        );
    }

    #[test]
    #[should_panic(expected = "unseeded")]
    fn test_unseeded_get_bytes_panics() {
        let prg = ElGamalPrg::from_safe_prime(modulus(), 2, 100).unwrap();
        let mut buf = [0u8; 1];
        let _ = prg.get_bytes(&mut buf);
    }
}
