//! Marshalling: the class-id envelope around persistable objects.
//!
//! A marshalled object is the byte tree `Node(Leaf(class_id), payload)`.
//! The class id is a stable textual identifier chosen once per persistable
//! type; reconstruction dispatches on it, and a read-only registry of known
//! ids distinguishes "unknown type" from "wrong payload shape" in error
//! reports. Reconstruction takes an auxiliary random source and certainty
//! so embedded parameters (moduli, group elements) can be validated with
//! error probability at most `2^-certainty`.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use tracing::debug;

use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::random::RandomSource;

/// Stable class ids of every persistable type.
pub mod class_id {
    /// Platform SHA-2 hashfunction
    pub const SHA2: &str = "urna.hash.Sha2";
    /// Merkle-Damgard domain extender
    pub const MERKLE_DAMGARD: &str = "urna.hash.MerkleDamgard";
    /// Random-oracle extender
    pub const RANDOM_ORACLE: &str = "urna.hash.RandomOracle";
    /// Pedersen fixed-length hashfunction
    pub const PEDERSEN: &str = "urna.hash.Pedersen";
    /// OS random device
    pub const DEVICE: &str = "urna.random.Device";
    /// XOR combiner of random sources
    pub const COMBINER: &str = "urna.random.Combiner";
    /// Hash-with-counter PRG
    pub const HASH_COUNTER_PRG: &str = "urna.prg.HashCounter";
    /// ElGamal PRG over the squares modulo a safe prime
    pub const ELGAMAL_PRG: &str = "urna.prg.ElGamal";
    /// Multiplicative group of squares modulo a safe prime
    pub const MOD_GROUP: &str = "urna.group.ModGroup";
    /// Naor-Yung public key
    pub const PUBLIC_KEY: &str = "urna.pkc.PublicKey";
    /// Naor-Yung secret key
    pub const SECRET_KEY: &str = "urna.pkc.SecretKey";
    /// Naor-Yung key generator
    pub const KEY_GEN: &str = "urna.pkc.KeyGen";
}

/// The set of class ids this build can reconstruct. Populated once and
/// read-only thereafter.
static REGISTRY: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    BTreeSet::from([
        class_id::SHA2,
        class_id::MERKLE_DAMGARD,
        class_id::RANDOM_ORACLE,
        class_id::PEDERSEN,
        class_id::DEVICE,
        class_id::COMBINER,
        class_id::HASH_COUNTER_PRG,
        class_id::ELGAMAL_PRG,
        class_id::MOD_GROUP,
        class_id::PUBLIC_KEY,
        class_id::SECRET_KEY,
        class_id::KEY_GEN,
    ])
});

/// Whether `id` names a type this build can reconstruct.
pub fn is_registered(id: &str) -> bool {
    REGISTRY.contains(id)
}

/// Auxiliary inputs threaded through reconstruction for probabilistic
/// validation of embedded parameters.
pub struct UnmarshalAux<'a> {
    /// Source of randomness for primality and membership checks.
    pub random_source: &'a RandomSource,
    /// An invalid parameter is accepted with probability at most
    /// `2^-certainty`.
    pub certainty: u32,
}

/// A type that can persist itself as a byte tree and be reconstructed
/// from one.
pub trait Marshalizable: Sized {
    /// The stable class id of this value's concrete variant.
    fn class_id(&self) -> &'static str;

    /// The payload byte tree, without the class-id envelope.
    fn to_payload(&self) -> ByteTree;

    /// Reconstruct from a class id and payload.
    ///
    /// Implementations dispatch on `class_id` over their closed variant
    /// set and use `aux` for any probabilistic subchecks.
    fn from_parts(class_id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self>;
}

/// Wrap `obj` in its canonical class-id envelope.
pub fn marshal<T: Marshalizable>(obj: &T) -> ByteTree {
    ByteTree::node(vec![
        ByteTree::string_leaf(obj.class_id()),
        obj.to_payload(),
    ])
}

/// The human line form: `class_id::HEX(bytes of the envelope)`.
pub fn marshal_hex<T: Marshalizable>(obj: &T) -> String {
    format!("{}::{}", obj.class_id(), hex::encode(marshal(obj).to_bytes()))
}

/// Reconstruct a `T` from its marshalled envelope.
///
/// `rs` and `certainty` are passed down to any probabilistic validation of
/// embedded parameters.
pub fn unmarshal_aux<T: Marshalizable>(
    tree: &ByteTree,
    rs: &RandomSource,
    certainty: u32,
) -> Result<T> {
    let (id, payload) = split_envelope(tree)?;
    debug!(class_id = %id, "unmarshalling");
    if !is_registered(&id) {
        return Err(UrnaCryptoError::UnknownClassId(id));
    }
    let aux = UnmarshalAux {
        random_source: rs,
        certainty,
    };
    T::from_parts(&id, payload, &aux)
}

/// Reconstruct a `T` from the human line form produced by [`marshal_hex`].
pub fn unmarshal_hex_aux<T: Marshalizable>(
    line: &str,
    rs: &RandomSource,
    certainty: u32,
) -> Result<T> {
    let (name, hex_bytes) = line.split_once("::").ok_or_else(|| {
        UrnaCryptoError::MalformedTree("hex line is missing the '::' separator".to_string())
    })?;
    let bytes = hex::decode(hex_bytes.trim())
        .map_err(|e| UrnaCryptoError::MalformedTree(format!("invalid hex: {}", e)))?;
    let tree = ByteTree::from_bytes(&bytes)?;
    let (embedded, _) = split_envelope(&tree)?;
    if embedded != name {
        return Err(UrnaCryptoError::MalformedTree(format!(
            "hex line names {} but the envelope carries {}",
            name, embedded
        )));
    }
    unmarshal_aux(&tree, rs, certainty)
}

/// Split `Node(Leaf(class_id), payload)` into its parts.
fn split_envelope(tree: &ByteTree) -> Result<(String, &ByteTree)> {
    let children = tree.children_exact(2)?;
    let id_bytes = children[0].leaf_bytes()?;
    if id_bytes.len() > config::MAX_ALGORITHM_NAME_BYTES {
        return Err(UrnaCryptoError::LengthCapExceeded {
            what: "class id",
            got: id_bytes.len(),
            max: config::MAX_ALGORITHM_NAME_BYTES,
        });
    }
    let id = String::from_utf8(id_bytes.to_vec())
        .map_err(|e| UrnaCryptoError::MalformedTree(format!("class id is not UTF-8: {}", e)))?;
    Ok((id, &children[1]))
}

/// Build the error for a registered class id handed to the wrong
/// abstraction's reconstruction.
pub(crate) fn wrong_abstraction(class_id: &str, expected: &'static str) -> UrnaCryptoError {
    UrnaCryptoError::MalformedTree(format!(
        "class id {} cannot be reconstructed as a {}",
        class_id, expected
    ))
}
