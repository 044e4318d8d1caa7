//! The hash-with-counter PRG.
//!
//! The state is a buffer holding the seed followed by a 32-bit big-endian
//! block counter. Each output block is the hash of the buffer; the
//! counter increments per block. The counter wraps silently after 2^32
//! blocks, matching the reference byte stream.

use std::sync::Mutex;

use crate::error::{Result, UrnaCryptoError};
use crate::hash::Hashfunction;

/// A PRG producing `hash(seed || counter)` blocks.
#[derive(Debug)]
pub struct HashCounterPrg {
    hashfunction: Hashfunction,
    state: Mutex<HashCounterState>,
}

#[derive(Debug)]
struct HashCounterState {
    buffer: Vec<u8>,
    counter: u32,
    block: Vec<u8>,
    index: usize,
    seeded: bool,
}

impl HashCounterPrg {
    /// Build an unseeded PRG over `hashfunction`.
    pub fn new(hashfunction: Hashfunction) -> Self {
        let seed_bytes = hashfunction.output_byte_length();
        HashCounterPrg {
            hashfunction,
            state: Mutex::new(HashCounterState {
                buffer: vec![0u8; seed_bytes + 4],
                counter: 0,
                block: Vec::new(),
                index: 0,
                seeded: false,
            }),
        }
    }

    /// The underlying hashfunction.
    pub fn hashfunction(&self) -> &Hashfunction {
        &self.hashfunction
    }

    /// Minimum seed length: one output block of the hashfunction.
    pub fn min_seed_bytes(&self) -> usize {
        self.hashfunction.output_byte_length()
    }

    /// Install `seed`, resetting the counter and discarding any pending
    /// output. Seeds longer than the minimum are folded in by circular
    /// XOR, so all seed bytes contribute.
    pub fn set_seed(&self, seed: &[u8]) -> Result<()> {
        let need = self.min_seed_bytes();
        if seed.len() < need {
            return Err(UrnaCryptoError::SeedTooShort {
                got: seed.len(),
                need,
            });
        }
        let mut state = self.lock()?;
        state.buffer.fill(0);
        for (i, byte) in seed.iter().enumerate() {
            state.buffer[i % need] ^= byte;
        }
        state.counter = 0;
        state.block.clear();
        state.index = 0;
        state.seeded = true;
        Ok(())
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
            if state.index == state.block.len() {
                let counter_bytes = state.counter.to_be_bytes();
                let tail = state.buffer.len() - 4;
                state.buffer[tail..].copy_from_slice(&counter_bytes);
                state.block = self.hashfunction.hash(&state.buffer)?;
                state.counter = state.counter.wrapping_add(1);
                state.index = 0;
            }
            let take = (dest.len() - written).min(state.block.len() - state.index);
            dest[written..written + take]
                .copy_from_slice(&state.block[state.index..state.index + take]);
            state.index += take;
            written += take;
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashCounterState>> {
        self.state
            .lock()
            .map_err(|_| UrnaCryptoError::Internal("PRG lock poisoned".to_string()))
    }
}

impl PartialEq for HashCounterPrg {
    fn eq(&self, other: &Self) -> bool {
        self.hashfunction == other.hashfunction
    }
}
