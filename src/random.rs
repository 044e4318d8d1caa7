//! Random sources: an abstract supply of random bytes.
//!
//! A random source delivers bytes on demand. The closed set of variants is
//! an OS device, an XOR combiner of other sources, and the seeded PRGs of
//! [`crate::prg`]. Calls on any one source are internally serialized:
//! concurrent callers observe mutual exclusion, and every call returns a
//! contiguous slice of the source's conceptual output stream.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::bytetree::ByteTree;
use crate::config;
use crate::error::{Result, UrnaCryptoError};
use crate::marshal::{self, class_id, Marshalizable, UnmarshalAux};
use crate::prg::Prg;
use crate::utils::xor_into;

/// A source of random bytes.
#[derive(Debug)]
pub enum RandomSource {
    /// An OS random device such as `/dev/urandom`.
    Device(RandomDevice),
    /// The XOR of several independent sources.
    Combiner(RandomSourceCombiner),
    /// A seeded pseudo-random generator.
    Prg(Prg),
}

impl RandomSource {
    /// Fill `dest` with the next bytes of this source.
    ///
    /// The buffer is always filled completely; a short read from a device
    /// is an error, never silently padded.
    pub fn get_bytes(&self, dest: &mut [u8]) -> Result<()> {
        match self {
            RandomSource::Device(device) => device.get_bytes(dest),
            RandomSource::Combiner(combiner) => combiner.get_bytes(dest),
            RandomSource::Prg(prg) => prg.get_bytes(dest),
        }
    }
}

impl PartialEq for RandomSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RandomSource::Device(a), RandomSource::Device(b)) => a.path() == b.path(),
            (RandomSource::Combiner(a), RandomSource::Combiner(b)) => a.children == b.children,
            (RandomSource::Prg(a), RandomSource::Prg(b)) => a == b,
            _ => false,
        }
    }
}

impl Marshalizable for RandomSource {
    fn class_id(&self) -> &'static str {
        match self {
            RandomSource::Device(_) => class_id::DEVICE,
            RandomSource::Combiner(_) => class_id::COMBINER,
            RandomSource::Prg(prg) => prg.class_id(),
        }
    }

    fn to_payload(&self) -> ByteTree {
        match self {
            RandomSource::Device(device) => {
                ByteTree::string_leaf(&device.path().to_string_lossy())
            }
            RandomSource::Combiner(combiner) => ByteTree::node(
                combiner
                    .children
                    .iter()
                    .map(marshal::marshal)
                    .collect(),
            ),
            RandomSource::Prg(prg) => prg.to_payload(),
        }
    }

    fn from_parts(id: &str, payload: &ByteTree, aux: &UnmarshalAux<'_>) -> Result<Self> {
        match id {
            class_id::DEVICE => {
                let path_bytes = payload.leaf_bytes()?;
                if path_bytes.len() > config::MAX_DEVICE_PATH_BYTES {
                    return Err(UrnaCryptoError::LengthCapExceeded {
                        what: "device path",
                        got: path_bytes.len(),
                        max: config::MAX_DEVICE_PATH_BYTES,
                    });
                }
                let path = String::from_utf8(path_bytes.to_vec()).map_err(|e| {
                    UrnaCryptoError::MalformedTree(format!("device path is not UTF-8: {}", e))
                })?;
                Ok(RandomSource::Device(RandomDevice::open(path)?))
            }
            class_id::COMBINER => {
                let children = payload.children()?;
                if children.is_empty() || children.len() > config::MAX_COMBINER_CHILDREN {
                    return Err(UrnaCryptoError::LengthCapExceeded {
                        what: "combiner children",
                        got: children.len(),
                        max: config::MAX_COMBINER_CHILDREN,
                    });
                }
                let sources = children
                    .iter()
                    .map(|child| {
                        marshal::unmarshal_aux(child, aux.random_source, aux.certainty)
                    })
                    .collect::<Result<Vec<RandomSource>>>()?;
                Ok(RandomSource::Combiner(RandomSourceCombiner::new(sources)?))
            }
            class_id::HASH_COUNTER_PRG | class_id::ELGAMAL_PRG => {
                Ok(RandomSource::Prg(Prg::from_parts(id, payload, aux)?))
            }
            other => Err(marshal::wrong_abstraction(other, "random source")),
        }
    }
}

/// A buffered stream over an OS random device.
///
/// Each instance holds an open file handle; applications should create few
/// instances and share them.
#[derive(Debug)]
pub struct RandomDevice {
    path: PathBuf,
    stream: Mutex<BufReader<File>>,
}

impl RandomDevice {
    /// Open the device at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        info!(path = %path.display(), "opening random device");
        let file = File::open(&path)?;
        Ok(RandomDevice {
            path,
            stream: Mutex::new(BufReader::new(file)),
        })
    }

    /// Open the default OS random device.
    pub fn default_device() -> Result<Self> {
        Self::open(config::DEFAULT_DEVICE_PATH)
    }

    /// The path this device reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let mut stream = self
            .stream
            .lock()
            .map_err(|_| UrnaCryptoError::Internal("random device lock poisoned".to_string()))?;
        stream.read_exact(dest)?;
        Ok(())
    }
}

/// The XOR of up to [`config::MAX_COMBINER_CHILDREN`] random sources.
///
/// The combined output is at least as unpredictable as the strongest
/// child, so a distrusted device can be hedged with an independent PRG.
#[derive(Debug)]
pub struct RandomSourceCombiner {
    children: Vec<RandomSource>,
    serial: Mutex<()>,
}

impl RandomSourceCombiner {
    /// Combine `children` into one source.
    pub fn new(children: Vec<RandomSource>) -> Result<Self> {
        if children.is_empty() || children.len() > config::MAX_COMBINER_CHILDREN {
            return Err(UrnaCryptoError::WidthOutOfRange {
                width: children.len(),
                min: 1,
                max: config::MAX_COMBINER_CHILDREN,
            });
        }
        Ok(RandomSourceCombiner {
            children,
            serial: Mutex::new(()),
        })
    }

    /// The combined sources.
    pub fn children(&self) -> &[RandomSource] {
        &self.children
    }

    fn get_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let _guard = self
            .serial
            .lock()
            .map_err(|_| UrnaCryptoError::Internal("combiner lock poisoned".to_string()))?;
        debug!(bytes = dest.len(), children = self.children.len(), "combining sources");
        self.children[0].get_bytes(dest)?;
        let mut scratch = vec![0u8; dest.len()];
        for child in &self.children[1..] {
            child.get_bytes(&mut scratch)?;
            xor_into(dest, &scratch);
        }
        Ok(())
    }
}
