//! Insurance underwriting and delay crediting.
//!
//! Passengers buy capped policies against a flight occurrence; when oracle
//! consensus finalizes the flight as late on the airline's account, every
//! policy holder is credited premium x 1.5 into a withdrawable balance.

pub mod crediting;
pub mod policy;

pub use crediting::credit_insurees;
pub use policy::buy_policy;
