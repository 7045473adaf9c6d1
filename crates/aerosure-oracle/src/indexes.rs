//! Pseudo-random oracle index assignment.

use crate::entropy::EntropySource;
use aerosure_state::AccountId;
use sha2::{Digest, Sha256};

/// Indexes are drawn from [0, INDEX_RANGE).
pub const INDEX_RANGE: u8 = 10;

/// The entropy source keeps only this many recent slots, so the nonce wraps
/// before referencing expired entropy.
pub const ENTROPY_HORIZON: u64 = 250;

/// Draws oracle indexes from the entropy source under an incrementing,
/// wrapping nonce.
#[derive(Debug, Clone, Default)]
pub struct IndexGenerator {
    nonce: u64,
}

impl IndexGenerator {
    pub fn new() -> Self {
        IndexGenerator::default()
    }

    /// Three pairwise-distinct indexes for one identity. Collisions with
    /// already-chosen values are re-drawn (rejection sampling).
    pub fn generate_indexes(
        &mut self,
        source: &dyn EntropySource,
        identity: &AccountId,
    ) -> [u8; 3] {
        let first = self.draw(source, identity, &[]);
        let second = self.draw(source, identity, &[first]);
        let third = self.draw(source, identity, &[first, second]);
        [first, second, third]
    }

    /// One index, used to tag a flight-status request.
    pub fn random_index(&mut self, source: &dyn EntropySource, identity: &AccountId) -> u8 {
        self.draw(source, identity, &[])
    }

    fn draw(&mut self, source: &dyn EntropySource, identity: &AccountId, taken: &[u8]) -> u8 {
        loop {
            self.nonce = (self.nonce + 1) % ENTROPY_HORIZON;
            let mut hasher = Sha256::new();
            hasher.update(source.entropy_at(self.nonce));
            hasher.update(identity.as_bytes());
            hasher.update(self.nonce.to_le_bytes());
            let digest = hasher.finalize();
            let value = digest[0] % INDEX_RANGE;
            if !taken.contains(&value) {
                return value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;
    use proptest::prelude::*;

    #[test]
    fn test_indexes_distinct_and_in_range() {
        let source = SeededEntropy::new("index-test");
        let mut generator = IndexGenerator::new();
        let id = AccountId::from_seed("oracle-1");
        let [a, b, c] = generator.generate_indexes(&source, &id);
        assert!(a < INDEX_RANGE && b < INDEX_RANGE && c < INDEX_RANGE);
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_nonce_wraps_within_horizon() {
        let source = SeededEntropy::new("wrap-test");
        let mut generator = IndexGenerator::new();
        let id = AccountId::from_seed("oracle-1");
        for _ in 0..1000 {
            generator.random_index(&source, &id);
            assert!(generator.nonce < ENTROPY_HORIZON);
        }
    }

    #[test]
    fn test_same_generator_state_is_deterministic() {
        let source = SeededEntropy::new("determinism");
        let id = AccountId::from_seed("oracle-1");
        let a = IndexGenerator::new().generate_indexes(&source, &id);
        let b = IndexGenerator::new().generate_indexes(&source, &id);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_indexes_always_distinct_in_range(seed in "[a-z]{1,16}", oracle in "[a-z]{1,16}") {
            let source = SeededEntropy::new(&seed);
            let mut generator = IndexGenerator::new();
            let id = AccountId::from_seed(&oracle);
            let [a, b, c] = generator.generate_indexes(&source, &id);
            prop_assert!(a < INDEX_RANGE && b < INDEX_RANGE && c < INDEX_RANGE);
            prop_assert!(a != b && b != c && a != c);
        }
    }
}
