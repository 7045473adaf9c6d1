//! Ledger, escrow pool, and access control for the AeroSure platform.
//!
//! The ledger is the single custodian of all persistent state: airlines,
//! flights, insurance policies, insuree balances, governance vote lists, and
//! the pooled funds. It exposes invariant-preserving mutation primitives
//! only; admission, underwriting, and consensus policy live in the engine
//! crates built on top of it.

pub mod access;
pub mod account;
pub mod error;
pub mod escrow;
pub mod keys;
pub mod ledger;

pub use access::AccessControl;
pub use account::AccountId;
pub use error::SuretyError;
pub use escrow::FundPool;
pub use keys::{flight_key, policy_key, response_key, FlightKey, PolicyKey, ResponseKey};
pub use ledger::{
    Airline, Flight, FlightStatus, InsurancePolicy, Ledger, AIRLINE_FUND, AIRLINE_LOW_FUND,
    MAX_INSURANCE, PAYOUT_DENOMINATOR, PAYOUT_NUMERATOR, UNIT,
};
