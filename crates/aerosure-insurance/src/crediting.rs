//! Crediting policy holders after a LateAirline finalization.

use aerosure_state::{AccountId, Ledger, SuretyError};
use log::info;

/// Credit every uncredited policy on the flight at premium x 1.5.
///
/// Invoked by the oracle engine once consensus finalizes the status as late
/// on the airline's account. Idempotent: each policy is credited at most
/// once, and one insuree's bad record never blocks the others. Returns how
/// many policies were credited.
pub fn credit_insurees(
    ledger: &mut Ledger,
    contract_id: AccountId,
    airline: AccountId,
    flight_number: &str,
    timestamp: u64,
) -> Result<u32, SuretyError> {
    ledger.require_operational()?;
    let credited = ledger.credit_insurees(contract_id, airline, flight_number, timestamp)?;
    info!(
        "flight {} at {}: {} policies credited",
        flight_number, timestamp, credited
    );
    Ok(credited)
}
