//! Large-integer helpers for the safe-prime group and the ElGamal PRG.
//!
//! Everything here is deterministic plumbing over `num_bigint::BigUint`:
//! fixed-width big-endian conversion, fixed-base exponentiation tables, and
//! a PRG-driven Miller-Rabin safe-prime test whose error probability is
//! bounded by the caller's certainty parameter.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::Result;
use crate::hash::Hashfunction;
use crate::prg::HashCounterPrg;
use crate::random::RandomSource;

/// Convert `value` to exactly `width` big-endian bytes.
///
/// Short values are left-padded with zeros; long values are truncated to
/// their `width` least significant bytes.
pub fn to_fixed_width_be(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() >= width {
        bytes[bytes.len() - width..].to_vec()
    } else {
        let mut out = vec![0u8; width - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    }
}

/// A precomputed table of square powers of a fixed base modulo a fixed
/// modulus.
///
/// The ElGamal PRG exponentiates the same small set of generators once per
/// output block; precomputing `base^(2^i)` for every bit position turns
/// each exponentiation into at most one modular multiplication per set
/// exponent bit. Tables are owned by their PRG state and freed with it.
#[derive(Debug, Clone)]
pub struct FixedBaseTable {
    modulus: BigUint,
    powers: Vec<BigUint>,
}

impl FixedBaseTable {
    /// Precompute powers of `base` modulo `modulus` for exponents of up to
    /// `max_exponent_bits` bits.
    pub fn new(base: &BigUint, modulus: &BigUint, max_exponent_bits: u64) -> Self {
        let mut powers = Vec::with_capacity(max_exponent_bits as usize);
        let mut current = base % modulus;
        for _ in 0..max_exponent_bits {
            powers.push(current.clone());
            current = &current * &current % modulus;
        }
        FixedBaseTable {
            modulus: modulus.clone(),
            powers,
        }
    }

    /// Compute `base^exponent mod modulus` from the table.
    ///
    /// Exponents wider than the table fall back to a plain modular
    /// exponentiation.
    pub fn pow(&self, exponent: &BigUint) -> BigUint {
        if exponent.bits() > self.powers.len() as u64 {
            let base = match self.powers.first() {
                Some(first) => first.clone(),
                None => return BigUint::one() % &self.modulus,
            };
            return base.modpow(exponent, &self.modulus);
        }
        let mut accumulator = BigUint::one();
        for i in 0..exponent.bits() {
            if exponent.bit(i) {
                accumulator = accumulator * &self.powers[i as usize] % &self.modulus;
            }
        }
        accumulator
    }
}

/// Test whether `candidate` is a safe prime, i.e. an odd prime `p` such
/// that `(p - 1) / 2` is also prime.
///
/// Both primality tests are Miller-Rabin with bases drawn from a
/// hash-counter PRG seeded from `rs`, using enough rounds that a composite
/// is accepted with probability at most `2^-certainty`.
pub fn is_safe_prime(candidate: &BigUint, rs: &RandomSource, certainty: u32) -> Result<bool> {
    let five = BigUint::from(5u8);
    if candidate < &five || !candidate.bit(0) {
        return Ok(false);
    }

    let prg = HashCounterPrg::new(Hashfunction::sha256());
    let mut seed = vec![0u8; prg.min_seed_bytes()];
    rs.get_bytes(&mut seed)?;
    prg.set_seed(&seed)?;

    // Each Miller-Rabin round rejects a composite with probability at
    // least 3/4, so ceil(certainty / 2) rounds suffice.
    let rounds = certainty.div_ceil(2).max(1);

    let sub_order = candidate >> 1;
    Ok(miller_rabin(candidate, &prg, rounds)? && miller_rabin(&sub_order, &prg, rounds)?)
}

/// Miller-Rabin primality test with PRG-chosen bases.
fn miller_rabin(n: &BigUint, prg: &HashCounterPrg, rounds: u32) -> Result<bool> {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let three = BigUint::from(3u8);

    if *n == two || *n == three {
        return Ok(true);
    }
    if n < &two || !n.bit(0) {
        return Ok(false);
    }

    // n - 1 = 2^s * d with d odd
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // Sample bases in [2, n - 2] with negligible bias.
    let base_range = n - &three;
    let draw_bytes = ((n.bits() + 64) / 8 + 1) as usize;
    let mut raw = vec![0u8; draw_bytes];

    for _ in 0..rounds {
        prg.get_bytes(&mut raw)?;
        let base = BigUint::from_bytes_be(&raw) % &base_range + &two;

        let mut x = base.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        let mut witness = true;
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                witness = false;
                break;
            }
        }
        if witness {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Parse a non-empty big-endian byte string as a non-negative integer.
pub fn from_be_bytes(bytes: &[u8]) -> BigUint {
    if bytes.is_empty() {
        BigUint::zero()
    } else {
        BigUint::from_bytes_be(bytes)
    }
}
