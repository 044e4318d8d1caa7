//! Centralized configuration for the Urna cryptographic core.
//!
//! This module contains constants and default parameters used throughout the
//! library to ensure consistency and ease of modification.

// --- Byte Tree Limits ---

/// Maximum nesting depth accepted when decoding a byte tree.
/// Bounds stack use when parsing attacker-supplied bytes.
pub const MAX_BYTE_TREE_DEPTH: usize = 100;

/// Maximum value of a wire-level length field (children or bytes).
/// The wire format stores lengths as signed 32-bit integers.
pub const MAX_WIRE_LENGTH: usize = i32::MAX as usize;

/// Smallest possible encoding of a byte tree: tag byte plus length field.
/// Used to bound a declared child count against the remaining input.
pub const MIN_ENCODED_TREE_BYTES: usize = 5;

// --- Marshalling Caps ---

/// Maximum byte length of a class id or algorithm name
pub const MAX_ALGORITHM_NAME_BYTES: usize = 100;

/// Maximum byte length of marshalled key material
pub const MAX_KEY_BYTES: usize = 100 * 1024;

/// Maximum byte length of a modulus
pub const MAX_MODULUS_BYTES: usize = 50 * 1024;

/// Maximum byte length of a random device path
pub const MAX_DEVICE_PATH_BYTES: usize = 4096;

/// Maximum number of children of a random source combiner
pub const MAX_COMBINER_CHILDREN: usize = 50;

/// Maximum number of generators of a Pedersen hashfunction
pub const MAX_PEDERSEN_WIDTH: usize = 10;

// --- PRG Parameters ---

/// Minimum width of the ElGamal PRG. Width two is the base case: one
/// generator refreshes the hidden exponent and one produces output.
pub const MIN_PRG_WIDTH: usize = 2;

/// Maximum width of the ElGamal PRG
pub const MAX_PRG_WIDTH: usize = 10;

/// Maximum statistical distance parameter accepted for seed derivation
pub const MAX_STAT_DIST_BITS: u32 = 1024;

/// Default statistical distance parameter (bits above the modulus length
/// drawn before reduction, bounding the bias at 2^-100)
pub const DEFAULT_STAT_DIST_BITS: u32 = 100;

// --- Cryptosystem Parameters ---

/// Minimum bit length of the Fiat-Shamir challenge
pub const MIN_SECPRO_BITS: usize = 1;

/// Maximum bit length of the Fiat-Shamir challenge. Caps the work an
/// adversarial key can demand from the random oracle.
pub const MAX_SECPRO_BITS: usize = 1024;

/// Default bit length of the Fiat-Shamir challenge
pub const DEFAULT_SECPRO_BITS: usize = 256;

// --- Validation Parameters ---

/// Default certainty for probabilistic parameter validation: an invalid
/// input is accepted with probability at most 2^-DEFAULT_CERTAINTY.
pub const DEFAULT_CERTAINTY: u32 = 50;

/// Number of attempts at finding a square when encoding message bytes as
/// a group element before giving up. Each attempt succeeds with
/// probability 1/2, so reaching the cap indicates a broken random source.
pub const MAX_ENCODE_ATTEMPTS: usize = 128;

// --- Group Parameters ---

/// Minimum byte length of a group modulus. The message encoding needs one
/// byte of headroom below the modulus plus an eight-byte block header, so
/// smaller moduli cannot carry any message bytes at all.
pub const MIN_GROUP_MODULUS_BYTES: usize = 10;

/// Per-element encoding overhead: four bytes of salt and a four-byte
/// big-endian length prefix.
pub const ENCODE_HEADER_BYTES: usize = 8;

// --- Environment ---

/// Default OS random device
pub const DEFAULT_DEVICE_PATH: &str = "/dev/urandom";
