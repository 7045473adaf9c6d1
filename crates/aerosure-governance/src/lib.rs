//! Airline governance: multiparty admission consensus and stake funding.
//!
//! Below [`MIN_AIRLINES_FOR_CONSENSUS`] incumbents, any funded airline admits
//! candidates unilaterally. From then on a candidate needs ceil(n/2) distinct
//! funded-airline votes.

pub mod funding;
pub mod registration;

pub use funding::fund_airline;
pub use registration::{register_airline, RegistrationOutcome};

/// Incumbent count at which admission switches to vote-threshold consensus.
pub const MIN_AIRLINES_FOR_CONSENSUS: u32 = 4;
