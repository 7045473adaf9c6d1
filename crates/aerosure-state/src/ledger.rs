//! The ledger: custodian of airlines, flights, policies, balances, and votes.
//!
//! Every privileged mutator takes the calling contract identity and runs the
//! access guards before touching any table, so a rejected call leaves no
//! partial state. Engine crates layer admission, underwriting, and consensus
//! policy on top of these primitives.

use crate::access::AccessControl;
use crate::account::AccountId;
use crate::error::SuretyError;
use crate::escrow::FundPool;
use crate::keys::{flight_key, policy_key, FlightKey, PolicyKey};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One whole unit of currency (8 decimals).
pub const UNIT: u128 = 100_000_000;

/// Stake an airline must deposit before it may participate.
pub const AIRLINE_FUND: u128 = 10 * UNIT;

/// Documented below-threshold amount used to exercise funding rejection.
pub const AIRLINE_LOW_FUND: u128 = 8 * UNIT;

/// Maximum premium a passenger may pay for one policy.
pub const MAX_INSURANCE: u128 = UNIT;

/// Credit multiplier: premium x 15 / 10, integer floor.
pub const PAYOUT_NUMERATOR: u128 = 15;
pub const PAYOUT_DENOMINATOR: u128 = 10;

/// Flight status codes reported by oracles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum FlightStatus {
    #[default]
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    /// Wire code as used by the original oracle protocol.
    pub fn code(&self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    pub is_registered: bool,
    pub is_funded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub is_registered: bool,
    pub status: FlightStatus,
    pub updated_timestamp: u64,
    pub airline: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub is_insured: bool,
    pub is_credited: bool,
    pub amount: u128,
}

/// Credit owed for a policy premium, floored integer arithmetic.
pub fn credit_for(amount: u128) -> u128 {
    amount * PAYOUT_NUMERATOR / PAYOUT_DENOMINATOR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    access: AccessControl,
    airlines: BTreeMap<AccountId, Airline>,
    registered_airlines: u32,
    votes: BTreeMap<AccountId, Vec<AccountId>>,
    flights: BTreeMap<FlightKey, Flight>,
    policies: BTreeMap<PolicyKey, InsurancePolicy>,
    insurees: BTreeMap<FlightKey, Vec<AccountId>>,
    balances: BTreeMap<AccountId, u128>,
    pool: FundPool,
}

impl Ledger {
    pub fn new(owner: AccountId) -> Self {
        Ledger {
            access: AccessControl::new(owner),
            airlines: BTreeMap::new(),
            registered_airlines: 0,
            votes: BTreeMap::new(),
            flights: BTreeMap::new(),
            policies: BTreeMap::new(),
            insurees: BTreeMap::new(),
            balances: BTreeMap::new(),
            pool: FundPool::new(),
        }
    }

    // ---- access control pass-through ----

    pub fn is_operational(&self) -> bool {
        self.access.is_operational()
    }

    pub fn require_operational(&self) -> Result<(), SuretyError> {
        self.access.require_operational()
    }

    pub fn set_operating_status(
        &mut self,
        caller: AccountId,
        operational: bool,
    ) -> Result<(), SuretyError> {
        self.access.set_operating_status(caller, operational)
    }

    pub fn authorize_caller(
        &mut self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.access.authorize_caller(caller, target)
    }

    pub fn deauthorize_caller(
        &mut self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.access.deauthorize_caller(caller, target)
    }

    pub fn is_authorized_caller(&self, caller: &AccountId) -> bool {
        self.access.is_authorized(caller)
    }

    /// Guard composed at the top of every privileged mutator.
    fn guard_privileged(&self, caller: &AccountId) -> Result<(), SuretyError> {
        self.access.require_operational()?;
        self.access.require_authorized(caller)
    }

    // ---- airlines & governance tables ----

    pub fn is_airline_registered(&self, airline: &AccountId) -> bool {
        self.airlines
            .get(airline)
            .map_or(false, |a| a.is_registered)
    }

    pub fn is_airline_funded(&self, airline: &AccountId) -> bool {
        self.airlines.get(airline).map_or(false, |a| a.is_funded)
    }

    pub fn registered_airline_count(&self) -> u32 {
        self.registered_airlines
    }

    /// Admit a candidate airline, unfunded. Airlines are never deleted.
    pub fn register_airline(
        &mut self,
        caller: AccountId,
        candidate: AccountId,
    ) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        if self.is_airline_registered(&candidate) {
            return Err(SuretyError::AlreadyRegistered);
        }
        self.airlines.insert(
            candidate,
            Airline {
                is_registered: true,
                is_funded: false,
            },
        );
        self.registered_airlines += 1;
        info!(
            "airline {} registered ({} total)",
            candidate, self.registered_airlines
        );
        Ok(())
    }

    /// Accept an airline's stake. Below-threshold amounts are rejected whole;
    /// nothing is partially applied. Re-funding deposits again and keeps the
    /// funded flag asserted.
    pub fn fund_airline(
        &mut self,
        caller: AccountId,
        airline: AccountId,
        amount: u128,
    ) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        if !self.is_airline_registered(&airline) {
            return Err(SuretyError::NotRegistered);
        }
        if amount < AIRLINE_FUND {
            return Err(SuretyError::InsufficientFunds {
                required: AIRLINE_FUND,
                provided: amount,
            });
        }
        self.pool.deposit(amount);
        if let Some(entry) = self.airlines.get_mut(&airline) {
            entry.is_funded = true;
        }
        info!("airline {} funded with {}", airline, amount);
        Ok(())
    }

    /// Record one distinct vote for a candidate; returns the tally.
    pub fn record_vote(
        &mut self,
        caller: AccountId,
        candidate: AccountId,
        voter: AccountId,
    ) -> Result<usize, SuretyError> {
        self.guard_privileged(&caller)?;
        let tally = self.votes.entry(candidate).or_default();
        if tally.contains(&voter) {
            return Err(SuretyError::DuplicateVote);
        }
        tally.push(voter);
        Ok(tally.len())
    }

    pub fn clear_votes(
        &mut self,
        caller: AccountId,
        candidate: AccountId,
    ) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        self.votes.remove(&candidate);
        Ok(())
    }

    pub fn votes_for(&self, candidate: &AccountId) -> usize {
        self.votes.get(candidate).map_or(0, |v| v.len())
    }

    // ---- insurance tables ----

    pub fn is_flight_insured(
        &self,
        insuree: &AccountId,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> bool {
        let key = policy_key(insuree, airline, flight_number, timestamp);
        self.policies.get(&key).map_or(false, |p| p.is_insured)
    }

    /// Underwrite a policy: create it, index the insuree, and custody the
    /// premium in one step. The flight record is created implicitly on the
    /// first purchase.
    pub fn buy(
        &mut self,
        caller: AccountId,
        insuree: AccountId,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
        amount: u128,
    ) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        if amount > MAX_INSURANCE {
            return Err(SuretyError::PaymentExceedsCap);
        }
        let pkey = policy_key(&insuree, &airline, flight_number, timestamp);
        if self.policies.get(&pkey).map_or(false, |p| p.is_insured) {
            return Err(SuretyError::AlreadyInsured);
        }
        let fkey = flight_key(&airline, flight_number, timestamp);
        self.flights.entry(fkey).or_insert(Flight {
            is_registered: true,
            status: FlightStatus::Unknown,
            updated_timestamp: timestamp,
            airline,
        });
        self.policies.insert(
            pkey,
            InsurancePolicy {
                is_insured: true,
                is_credited: false,
                amount,
            },
        );
        let index = self.insurees.entry(fkey).or_default();
        if !index.contains(&insuree) {
            index.push(insuree);
        }
        self.pool.deposit(amount);
        info!(
            "policy bought: insuree {} flight {} amount {}",
            insuree, flight_number, amount
        );
        Ok(())
    }

    /// Credit every uncredited policy holder on a flight at premium x 1.5.
    ///
    /// Crediting is isolated per insuree: a missing policy for one indexed
    /// insuree is logged and skipped, never blocking the rest. Returns the
    /// number of policies credited, so repeat invocations return 0.
    pub fn credit_insurees(
        &mut self,
        caller: AccountId,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> Result<u32, SuretyError> {
        self.guard_privileged(&caller)?;
        let fkey = flight_key(&airline, flight_number, timestamp);
        let holders = self.insurees.get(&fkey).cloned().unwrap_or_default();
        let mut credited = 0u32;
        for insuree in holders {
            let pkey = policy_key(&insuree, &airline, flight_number, timestamp);
            match self.policies.get_mut(&pkey) {
                Some(policy) if policy.is_insured && !policy.is_credited => {
                    policy.is_credited = true;
                    let credit = credit_for(policy.amount);
                    *self.balances.entry(insuree).or_insert(0) += credit;
                    credited += 1;
                    info!("credited {} to insuree {}", credit, insuree);
                }
                Some(_) => {} // already credited
                None => {
                    warn!(
                        "indexed insuree {} has no policy for flight {}",
                        insuree, flight_number
                    );
                }
            }
        }
        Ok(credited)
    }

    // ---- flights ----

    /// Record the finalized status for a flight occurrence.
    pub fn set_flight_status(
        &mut self,
        caller: AccountId,
        airline: AccountId,
        flight_number: &str,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        let fkey = flight_key(&airline, flight_number, timestamp);
        let flight = self.flights.entry(fkey).or_insert(Flight {
            is_registered: true,
            status: FlightStatus::Unknown,
            updated_timestamp: timestamp,
            airline,
        });
        flight.status = status;
        flight.updated_timestamp = timestamp;
        info!("flight {} status set to {:?}", flight_number, status);
        Ok(())
    }

    pub fn flight_status(
        &self,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> Option<FlightStatus> {
        let fkey = flight_key(airline, flight_number, timestamp);
        self.flights.get(&fkey).map(|f| f.status)
    }

    // ---- balances & escrow ----

    pub fn insuree_balance(&self, insuree: &AccountId) -> u128 {
        self.balances.get(insuree).copied().unwrap_or(0)
    }

    pub fn pool_balance(&self) -> u128 {
        self.pool.balance()
    }

    /// Accept value into the pool (oracle fees and other explicit deposits).
    pub fn deposit(&mut self, caller: AccountId, amount: u128) -> Result<(), SuretyError> {
        self.guard_privileged(&caller)?;
        self.pool.deposit(amount);
        Ok(())
    }

    /// Pay out an insuree's full credited balance.
    ///
    /// The balance is zeroed before the pool releases funds, so a re-entrant
    /// or repeated call finds nothing left to pay.
    pub fn pay(&mut self, caller: AccountId, insuree: AccountId) -> Result<u128, SuretyError> {
        self.guard_privileged(&caller)?;
        let owed = self.insuree_balance(&insuree);
        if owed == 0 {
            return Err(SuretyError::InsufficientFunds {
                required: 1,
                provided: 0,
            });
        }
        if owed > self.pool.balance() {
            return Err(SuretyError::InsufficientPoolFunds {
                required: owed,
                available: self.pool.balance(),
            });
        }
        self.balances.insert(insuree, 0);
        self.pool.release(owed)?;
        info!("paid {} to insuree {}", owed, insuree);
        Ok(owed)
    }

    // ---- invariants & snapshot ----

    /// Structural invariants checked by tests after every scenario.
    pub fn verify_invariants(&self) -> bool {
        let liabilities: u128 = self.balances.values().sum();
        if liabilities > self.pool.balance() {
            return false;
        }
        if self
            .airlines
            .values()
            .any(|a| a.is_funded && !a.is_registered)
        {
            return false;
        }
        let registered = self.airlines.values().filter(|a| a.is_registered).count();
        registered == self.registered_airlines as usize
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, SuretyError> {
        bincode::serialize(self).map_err(|e| SuretyError::Serialization(e.to_string()))
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, SuretyError> {
        bincode::deserialize(bytes).map_err(|e| SuretyError::Serialization(e.to_string()))
    }

    /// Human-readable state export for operators and audits.
    pub fn export_json(&self) -> Result<String, SuretyError> {
        serde_json::to_string_pretty(self).map_err(|e| SuretyError::Serialization(e.to_string()))
    }
}
