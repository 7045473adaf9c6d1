//! External facade of the AeroSure platform.
//!
//! [`SuretyApp`] is the single entry point for airlines, passengers, and
//! oracles. Every operation takes the ledger write lock for its full
//! duration, so calls are strictly serialized and atomic: a rejected call
//! leaves no partial state. The facade holds its own contract identity,
//! which the owner authorizes against the ledger at construction, mirroring
//! the two-contract split between ledger custody and application logic.

pub mod events;
pub mod logging;

use std::sync::Arc;

use aerosure_governance::RegistrationOutcome;
use aerosure_oracle::{EntropySource, IndexGenerator, OracleRegistry, ResponseOutcome};
use aerosure_state::{AccountId, FlightStatus, Ledger, SuretyError};
use events::{AppEvent, EventLog};
use parking_lot::{Mutex, RwLock};

pub use aerosure_governance::MIN_AIRLINES_FOR_CONSENSUS;
pub use aerosure_oracle::{MIN_RESPONSES, REGISTRATION_FEE};
pub use aerosure_state::{AIRLINE_FUND, AIRLINE_LOW_FUND, MAX_INSURANCE, UNIT};

pub struct SuretyApp {
    contract_id: AccountId,
    ledger: RwLock<Ledger>,
    oracles: RwLock<OracleRegistry>,
    index_generator: Mutex<IndexGenerator>,
    entropy: Arc<dyn EntropySource>,
    events: EventLog,
}

impl SuretyApp {
    /// Deploy the platform: create the ledger under `owner`, authorize the
    /// app's contract identity, and seed the first (unfunded) airline.
    pub fn new(
        owner: AccountId,
        first_airline: AccountId,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, SuretyError> {
        let contract_id = AccountId::from_seed("aerosure-app-contract");
        let mut ledger = Ledger::new(owner);
        ledger.authorize_caller(owner, contract_id)?;
        ledger.register_airline(contract_id, first_airline)?;
        Ok(SuretyApp {
            contract_id,
            ledger: RwLock::new(ledger),
            oracles: RwLock::new(OracleRegistry::new()),
            index_generator: Mutex::new(IndexGenerator::new()),
            entropy,
            events: EventLog::new(),
        })
    }

    // ---- operations & administration ----

    pub fn is_operational(&self) -> bool {
        self.ledger.read().is_operational()
    }

    pub fn set_operating_status(
        &self,
        caller: AccountId,
        operational: bool,
    ) -> Result<(), SuretyError> {
        self.ledger.write().set_operating_status(caller, operational)
    }

    pub fn authorize_caller(
        &self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.ledger.write().authorize_caller(caller, target)
    }

    pub fn deauthorize_caller(
        &self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.ledger.write().deauthorize_caller(caller, target)
    }

    // ---- governance ----

    pub fn register_airline(
        &self,
        caller: AccountId,
        candidate: AccountId,
    ) -> Result<RegistrationOutcome, SuretyError> {
        let mut ledger = self.ledger.write();
        aerosure_governance::register_airline(&mut ledger, self.contract_id, caller, candidate)
    }

    pub fn fund_airline(&self, caller: AccountId, amount: u128) -> Result<(), SuretyError> {
        let mut ledger = self.ledger.write();
        aerosure_governance::fund_airline(&mut ledger, self.contract_id, caller, amount)
    }

    pub fn is_airline_registered(&self, airline: &AccountId) -> bool {
        self.ledger.read().is_airline_registered(airline)
    }

    pub fn is_airline_funded(&self, airline: &AccountId) -> bool {
        self.ledger.read().is_airline_funded(airline)
    }

    pub fn registered_airline_count(&self) -> u32 {
        self.ledger.read().registered_airline_count()
    }

    // ---- insurance ----

    pub fn buy_insurance(
        &self,
        insuree: AccountId,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
        amount: u128,
    ) -> Result<(), SuretyError> {
        let mut ledger = self.ledger.write();
        aerosure_insurance::buy_policy(
            &mut ledger,
            self.contract_id,
            insuree,
            airline,
            flight_number,
            timestamp,
            amount,
        )
    }

    pub fn is_flight_insured(
        &self,
        insuree: &AccountId,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> bool {
        self.ledger
            .read()
            .is_flight_insured(insuree, airline, flight_number, timestamp)
    }

    // ---- oracle consensus ----

    /// Register the caller as an oracle; the fee is custodied in the pool
    /// and three immutable indexes are assigned.
    pub fn register_oracle(&self, caller: AccountId, fee: u128) -> Result<[u8; 3], SuretyError> {
        let mut ledger = self.ledger.write();
        ledger.require_operational()?;
        let mut oracles = self.oracles.write();
        let mut generator = self.index_generator.lock();
        let indexes = oracles.register_oracle(caller, fee, &mut generator, &*self.entropy)?;
        ledger.deposit(self.contract_id, fee)?;
        Ok(indexes)
    }

    pub fn get_my_indexes(&self, caller: AccountId) -> Result<[u8; 3], SuretyError> {
        self.oracles.read().indexes_of(&caller)
    }

    /// Open a status request for a flight; returns the index the responding
    /// oracles must hold.
    pub fn fetch_flight_status(
        &self,
        requester: AccountId,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> Result<u8, SuretyError> {
        // Hold the ledger lock for the whole call; operations stay serialized.
        let ledger = self.ledger.write();
        ledger.require_operational()?;

        let index = self
            .index_generator
            .lock()
            .random_index(&*self.entropy, &requester);
        self.oracles
            .write()
            .open_request(requester, index, &airline, flight_number, timestamp);
        self.events.emit(AppEvent::RequestOpened {
            index,
            airline,
            flight_number: flight_number.to_string(),
            timestamp,
        });
        Ok(index)
    }

    /// Submit an oracle report. On quorum the flight status is recorded and,
    /// for a LateAirline finalization, all policy holders are credited.
    pub fn submit_oracle_response(
        &self,
        oracle: AccountId,
        index: u8,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<ResponseOutcome, SuretyError> {
        let mut ledger = self.ledger.write();
        ledger.require_operational()?;

        let outcome = self.oracles.write().submit_response(
            oracle,
            index,
            &airline,
            flight_number,
            timestamp,
            status,
        )?;

        match &outcome {
            ResponseOutcome::Accepted { status, .. } => {
                self.events.emit(AppEvent::OracleReportReceived {
                    airline,
                    flight_number: flight_number.to_string(),
                    timestamp,
                    status: *status,
                });
            }
            ResponseOutcome::Finalized(final_status) => {
                self.events.emit(AppEvent::OracleReportReceived {
                    airline,
                    flight_number: flight_number.to_string(),
                    timestamp,
                    status: *final_status,
                });
                self.process_flight_status(
                    &mut ledger,
                    airline,
                    flight_number,
                    timestamp,
                    *final_status,
                )?;
            }
            ResponseOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Record a finalized status; only a delay on the airline's account
    /// triggers payouts.
    fn process_flight_status(
        &self,
        ledger: &mut Ledger,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<(), SuretyError> {
        ledger.set_flight_status(self.contract_id, airline, flight_number, timestamp, status)?;
        if status == FlightStatus::LateAirline {
            aerosure_insurance::credit_insurees(
                ledger,
                self.contract_id,
                airline,
                flight_number,
                timestamp,
            )?;
        }
        self.events.emit(AppEvent::StatusFinalized {
            airline,
            flight_number: flight_number.to_string(),
            timestamp,
            status,
        });
        Ok(())
    }

    pub fn flight_status(
        &self,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> Option<FlightStatus> {
        self.ledger.read().flight_status(airline, flight_number, timestamp)
    }

    // ---- payouts ----

    /// Withdraw the caller's full credited balance; returns the amount paid.
    pub fn withdraw(&self, insuree: AccountId) -> Result<u128, SuretyError> {
        self.ledger.write().pay(self.contract_id, insuree)
    }

    pub fn insuree_balance(&self, insuree: &AccountId) -> u128 {
        self.ledger.read().insuree_balance(insuree)
    }

    pub fn contract_balance(&self) -> u128 {
        self.ledger.read().pool_balance()
    }

    // ---- observability ----

    /// Take all pending events, oldest first.
    pub fn drain_events(&self) -> Vec<AppEvent> {
        self.events.drain()
    }

    /// Structural ledger invariants; exposed for scenario tests.
    pub fn verify_invariants(&self) -> bool {
        self.ledger.read().verify_invariants()
    }
}
