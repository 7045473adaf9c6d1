//! Oracle consensus: randomized index assignment and response quorum.
//!
//! Oracles register for a fee and receive three pseudo-random indexes. A
//! flight-status request opens under one index; only oracles holding that
//! index may answer, and the first status to gather [`MIN_RESPONSES`]
//! distinct reports closes the request permanently.

pub mod consensus;
pub mod entropy;
pub mod indexes;

pub use consensus::{
    Oracle, OracleRegistry, ResponseInfo, ResponseOutcome, MIN_RESPONSES, REGISTRATION_FEE,
};
pub use entropy::{EntropySource, RandomEntropy, SeededEntropy};
pub use indexes::{IndexGenerator, ENTROPY_HORIZON, INDEX_RANGE};
