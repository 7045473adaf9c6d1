//! Candidate admission: unilateral below the consensus threshold, voted above.

use crate::MIN_AIRLINES_FOR_CONSENSUS;
use aerosure_state::{AccountId, Ledger, SuretyError};
use log::info;
use serde::{Deserialize, Serialize};

/// What a registration call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationOutcome {
    /// Candidate was admitted to the registry.
    Registered,
    /// Consensus pending; the caller's vote was recorded.
    VoteRecorded { votes: usize, needed: usize },
}

/// Register `candidate`, or record `caller`'s vote toward its admission.
///
/// The caller must be a registered and funded airline. Once the registry
/// holds [`MIN_AIRLINES_FOR_CONSENSUS`] airlines, admission needs ceil(n/2)
/// distinct voters; the vote list is cleared when consensus is reached.
pub fn register_airline(
    ledger: &mut Ledger,
    contract_id: AccountId,
    caller: AccountId,
    candidate: AccountId,
) -> Result<RegistrationOutcome, SuretyError> {
    ledger.require_operational()?;
    if !ledger.is_airline_registered(&caller) {
        return Err(SuretyError::NotRegistered);
    }
    if !ledger.is_airline_funded(&caller) {
        return Err(SuretyError::NotFunded);
    }

    if ledger.registered_airline_count() < MIN_AIRLINES_FOR_CONSENSUS {
        ledger.register_airline(contract_id, candidate)?;
        return Ok(RegistrationOutcome::Registered);
    }

    if ledger.is_airline_registered(&candidate) {
        return Err(SuretyError::AlreadyRegistered);
    }
    let votes = ledger.record_vote(contract_id, candidate, caller)?;
    let needed = consensus_threshold(ledger.registered_airline_count());
    if votes >= needed {
        ledger.register_airline(contract_id, candidate)?;
        ledger.clear_votes(contract_id, candidate)?;
        info!("candidate {} admitted with {} votes", candidate, votes);
        return Ok(RegistrationOutcome::Registered);
    }
    Ok(RegistrationOutcome::VoteRecorded { votes, needed })
}

/// ceil(n / 2) distinct voters.
fn consensus_threshold(registered: u32) -> usize {
    ((registered + 1) / 2) as usize
}
