//! Airline stake funding.

use aerosure_state::{AccountId, Ledger, SuretyError};

/// Deposit `caller`'s stake. The full amount must meet
/// [`aerosure_state::AIRLINE_FUND`]; below-threshold funding is rejected
/// whole, never partially applied. Re-funding an already funded airline is
/// accepted and keeps the flag asserted.
pub fn fund_airline(
    ledger: &mut Ledger,
    contract_id: AccountId,
    caller: AccountId,
    amount: u128,
) -> Result<(), SuretyError> {
    ledger.require_operational()?;
    ledger.fund_airline(contract_id, caller, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosure_state::{AIRLINE_FUND, AIRLINE_LOW_FUND};

    fn setup() -> (Ledger, AccountId, AccountId) {
        let owner = AccountId::from_seed("owner");
        let app = AccountId::from_seed("app");
        let airline = AccountId::from_seed("airline-a");
        let mut ledger = Ledger::new(owner);
        ledger.authorize_caller(owner, app).unwrap();
        ledger.register_airline(app, airline).unwrap();
        (ledger, app, airline)
    }

    #[test]
    fn test_funding_at_threshold_succeeds() {
        let (mut ledger, app, airline) = setup();
        fund_airline(&mut ledger, app, airline, AIRLINE_FUND).unwrap();
        assert!(ledger.is_airline_funded(&airline));
    }

    #[test]
    fn test_low_funding_rejected_and_flag_stays_false() {
        let (mut ledger, app, airline) = setup();
        let err = fund_airline(&mut ledger, app, airline, AIRLINE_LOW_FUND).unwrap_err();
        assert!(matches!(err, SuretyError::InsufficientFunds { .. }));
        assert!(!ledger.is_airline_funded(&airline));
    }

    #[test]
    fn test_refunding_is_idempotent_on_flag() {
        let (mut ledger, app, airline) = setup();
        fund_airline(&mut ledger, app, airline, AIRLINE_FUND).unwrap();
        fund_airline(&mut ledger, app, airline, AIRLINE_FUND).unwrap();
        assert!(ledger.is_airline_funded(&airline));
        assert_eq!(ledger.pool_balance(), 2 * AIRLINE_FUND);
    }
}
