//! Policy purchase.

use aerosure_state::{AccountId, Ledger, SuretyError, MAX_INSURANCE};

/// Buy a policy for one flight occurrence.
///
/// Premium is capped at [`MAX_INSURANCE`]; a (insuree, airline, flight,
/// timestamp) key admits at most one policy. Premium custody and policy
/// creation are one atomic step inside the ledger.
pub fn buy_policy(
    ledger: &mut Ledger,
    contract_id: AccountId,
    insuree: AccountId,
    airline: AccountId,
    flight_number: &str,
    timestamp: u64,
    amount: u128,
) -> Result<(), SuretyError> {
    ledger.require_operational()?;
    if amount > MAX_INSURANCE {
        return Err(SuretyError::PaymentExceedsCap);
    }
    ledger.buy(contract_id, insuree, airline, flight_number, timestamp, amount)
}
