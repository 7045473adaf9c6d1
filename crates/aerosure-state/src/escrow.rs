//! Pooled fund custody.
//!
//! All incoming value (airline stakes, policy premiums, oracle fees) lands in
//! one pool; payouts leave through `release` only. There is no implicit
//! receive path.

use crate::error::SuretyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundPool {
    pooled: u128,
}

impl FundPool {
    pub fn new() -> Self {
        FundPool::default()
    }

    pub fn balance(&self) -> u128 {
        self.pooled
    }

    pub fn deposit(&mut self, amount: u128) {
        self.pooled = self.pooled.saturating_add(amount);
    }

    /// Remove funds from the pool. Fails rather than underflowing; with
    /// correct accounting upstream this never triggers.
    pub fn release(&mut self, amount: u128) -> Result<(), SuretyError> {
        if amount > self.pooled {
            return Err(SuretyError::InsufficientPoolFunds {
                required: amount,
                available: self.pooled,
            });
        }
        self.pooled -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_then_release() {
        let mut pool = FundPool::new();
        pool.deposit(100);
        pool.deposit(50);
        assert_eq!(pool.balance(), 150);
        pool.release(120).unwrap();
        assert_eq!(pool.balance(), 30);
    }

    #[test]
    fn test_release_beyond_pool_fails() {
        let mut pool = FundPool::new();
        pool.deposit(10);
        let err = pool.release(11).unwrap_err();
        assert_eq!(
            err,
            SuretyError::InsufficientPoolFunds {
                required: 11,
                available: 10
            }
        );
        // Failed release leaves the pool untouched.
        assert_eq!(pool.balance(), 10);
    }
}
