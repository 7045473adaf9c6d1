//! Injectable unpredictable-bytes source.
//!
//! The platform treats chain entropy as an opaque collaborator: it supplies
//! 32 unpredictable bytes per slot, with a finite lookback window. Tests
//! inject [`SeededEntropy`] for determinism; [`RandomEntropy`] stands in for
//! the blockhash source in a real deployment.

use crate::indexes::ENTROPY_HORIZON;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

pub trait EntropySource: Send + Sync {
    /// Unpredictable bytes for one slot. Slots repeat deterministically
    /// within the lookback horizon.
    fn entropy_at(&self, slot: u64) -> [u8; 32];
}

/// Deterministic entropy: Sha256(seed || slot). Test use only.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    seed: [u8; 32],
}

impl SeededEntropy {
    pub fn new(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        SeededEntropy { seed: bytes }
    }
}

impl EntropySource for SeededEntropy {
    fn entropy_at(&self, slot: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(slot.to_le_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }
}

/// OS-randomness source with per-slot memoization, bounded to the entropy
/// horizon so it mirrors the finite lookback of a blockhash source.
#[derive(Default)]
pub struct RandomEntropy {
    slots: RwLock<HashMap<u64, [u8; 32]>>,
}

impl RandomEntropy {
    pub fn new() -> Self {
        RandomEntropy::default()
    }
}

impl EntropySource for RandomEntropy {
    fn entropy_at(&self, slot: u64) -> [u8; 32] {
        if let Some(bytes) = self.slots.read().get(&slot) {
            return *bytes;
        }
        let mut slots = self.slots.write();
        let bytes = *slots.entry(slot).or_insert_with(rand::random);
        // Keep the window bounded; expired slots are unreachable anyway.
        if slots.len() as u64 > ENTROPY_HORIZON {
            let min_live = slot.saturating_sub(ENTROPY_HORIZON);
            slots.retain(|&s, _| s >= min_live);
        }
        bytes
    }
}
