//! Oracle registration and the request/response quorum state machine.
//!
//! A request is a latch: Open on fetch, Closed the moment any status gathers
//! [`MIN_RESPONSES`] distinct oracle reports, and never reopened. Responses
//! to a closed or unknown request are deliberately silent no-ops. There is
//! no expiry; an open request that never reaches quorum stays open.

use crate::entropy::EntropySource;
use crate::indexes::IndexGenerator;
use aerosure_state::{response_key, AccountId, FlightStatus, ResponseKey, SuretyError, UNIT};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fee an oracle pays on registration.
pub const REGISTRATION_FEE: u128 = UNIT;

/// Matching distinct-oracle responses needed to finalize a status.
pub const MIN_RESPONSES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oracle {
    pub indexes: [u8; 3],
}

/// One flight-status request round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub requester: AccountId,
    pub is_open: bool,
    /// Distinct reporting oracles per status code.
    pub responses: BTreeMap<FlightStatus, Vec<AccountId>>,
}

/// What a submitted response achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Counted toward quorum; `responses` is the new tally for `status`.
    Accepted {
        status: FlightStatus,
        responses: usize,
    },
    /// This response completed the quorum and closed the request.
    Finalized(FlightStatus),
    /// Closed/unknown request or duplicate report: silently ignored.
    Ignored,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OracleRegistry {
    oracles: BTreeMap<AccountId, Oracle>,
    requests: BTreeMap<ResponseKey, ResponseInfo>,
}

impl OracleRegistry {
    pub fn new() -> Self {
        OracleRegistry::default()
    }

    /// Register an oracle and assign its three immutable indexes.
    pub fn register_oracle(
        &mut self,
        caller: AccountId,
        fee: u128,
        generator: &mut IndexGenerator,
        source: &dyn EntropySource,
    ) -> Result<[u8; 3], SuretyError> {
        if fee < REGISTRATION_FEE {
            return Err(SuretyError::InsufficientFunds {
                required: REGISTRATION_FEE,
                provided: fee,
            });
        }
        if self.oracles.contains_key(&caller) {
            return Err(SuretyError::AlreadyRegistered);
        }
        let indexes = generator.generate_indexes(source, &caller);
        self.oracles.insert(caller, Oracle { indexes });
        info!("oracle {} registered with indexes {:?}", caller, indexes);
        Ok(indexes)
    }

    pub fn indexes_of(&self, caller: &AccountId) -> Result<[u8; 3], SuretyError> {
        self.oracles
            .get(caller)
            .map(|o| o.indexes)
            .ok_or(SuretyError::NotRegistered)
    }

    pub fn is_registered(&self, caller: &AccountId) -> bool {
        self.oracles.contains_key(caller)
    }

    /// Open a response round for (index, airline, flight, timestamp).
    /// Re-fetching the same key starts a fresh round.
    pub fn open_request(
        &mut self,
        requester: AccountId,
        index: u8,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
    ) -> ResponseKey {
        let key = response_key(index, airline, flight_number, timestamp);
        self.requests.insert(
            key,
            ResponseInfo {
                requester,
                is_open: true,
                responses: BTreeMap::new(),
            },
        );
        info!(
            "request opened: index {} flight {} at {}",
            index, flight_number, timestamp
        );
        key
    }

    pub fn is_open(&self, key: &ResponseKey) -> bool {
        self.requests.get(key).map_or(false, |r| r.is_open)
    }

    /// Submit one oracle's report for a request.
    ///
    /// The oracle must own the submitted index. Reports against a closed or
    /// unknown request, and duplicate reports by the same oracle for the
    /// same status, do not error; they are ignored without state change.
    pub fn submit_response(
        &mut self,
        oracle: AccountId,
        index: u8,
        airline: &AccountId,
        flight_number: &str,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<ResponseOutcome, SuretyError> {
        let assigned = self
            .oracles
            .get(&oracle)
            .ok_or(SuretyError::NotRegistered)?;
        if !assigned.indexes.contains(&index) {
            return Err(SuretyError::IndexMismatch);
        }

        let key = response_key(index, airline, flight_number, timestamp);
        let request = match self.requests.get_mut(&key) {
            Some(request) if request.is_open => request,
            _ => return Ok(ResponseOutcome::Ignored),
        };

        let reporters = request.responses.entry(status).or_default();
        if reporters.contains(&oracle) {
            return Ok(ResponseOutcome::Ignored);
        }
        reporters.push(oracle);
        let tally = reporters.len();

        if tally >= MIN_RESPONSES {
            request.is_open = false;
            info!(
                "request finalized: flight {} at {} status {:?}",
                flight_number, timestamp, status
            );
            return Ok(ResponseOutcome::Finalized(status));
        }
        Ok(ResponseOutcome::Accepted {
            status,
            responses: tally,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;

    struct Fixture {
        registry: OracleRegistry,
        generator: IndexGenerator,
        source: SeededEntropy,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                registry: OracleRegistry::new(),
                generator: IndexGenerator::new(),
                source: SeededEntropy::new("consensus-tests"),
            }
        }

        fn register(&mut self, name: &str) -> (AccountId, [u8; 3]) {
            let id = AccountId::from_seed(name);
            let indexes = self
                .registry
                .register_oracle(id, REGISTRATION_FEE, &mut self.generator, &self.source)
                .unwrap();
            (id, indexes)
        }

        /// Register oracles until `count` of them hold `index`.
        fn oracles_holding(&mut self, index: u8, count: usize) -> Vec<AccountId> {
            let mut found = Vec::new();
            let mut n = 0u32;
            while found.len() < count {
                let (id, indexes) = self.register(&format!("oracle-{}", n));
                if indexes.contains(&index) {
                    found.push(id);
                }
                n += 1;
            }
            found
        }
    }

    fn airline() -> AccountId {
        AccountId::from_seed("airline-a")
    }

    #[test]
    fn test_registration_requires_fee() {
        let mut fx = Fixture::new();
        let id = AccountId::from_seed("cheap-oracle");
        let err = fx
            .registry
            .register_oracle(id, REGISTRATION_FEE - 1, &mut fx.generator, &fx.source)
            .unwrap_err();
        assert!(matches!(err, SuretyError::InsufficientFunds { .. }));
        assert!(!fx.registry.is_registered(&id));
    }

    #[test]
    fn test_double_registration_rejected() {
        let mut fx = Fixture::new();
        let (id, indexes) = fx.register("oracle-1");
        let err = fx
            .registry
            .register_oracle(id, REGISTRATION_FEE, &mut fx.generator, &fx.source)
            .unwrap_err();
        assert_eq!(err, SuretyError::AlreadyRegistered);
        // Indexes are immutable after registration.
        assert_eq!(fx.registry.indexes_of(&id).unwrap(), indexes);
    }

    #[test]
    fn test_unknown_oracle_cannot_query_indexes() {
        let fx = Fixture::new();
        assert_eq!(
            fx.registry.indexes_of(&AccountId::from_seed("ghost")),
            Err(SuretyError::NotRegistered)
        );
    }

    #[test]
    fn test_response_with_foreign_index_rejected() {
        let mut fx = Fixture::new();
        let (id, indexes) = fx.register("oracle-1");
        let wrong = (0..10u8).find(|i| !indexes.contains(i)).unwrap();
        fx.registry
            .open_request(AccountId::from_seed("req"), wrong, &airline(), "AS100", 1);
        let err = fx
            .registry
            .submit_response(id, wrong, &airline(), "AS100", 1, FlightStatus::OnTime)
            .unwrap_err();
        assert_eq!(err, SuretyError::IndexMismatch);
    }

    #[test]
    fn test_quorum_finalizes_exactly_once() {
        let mut fx = Fixture::new();
        let index = 4;
        let reporters = fx.oracles_holding(index, 4);
        fx.registry
            .open_request(AccountId::from_seed("req"), index, &airline(), "AS100", 1);

        let r1 = fx
            .registry
            .submit_response(reporters[0], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        assert_eq!(
            r1,
            ResponseOutcome::Accepted {
                status: FlightStatus::LateAirline,
                responses: 1
            }
        );
        fx.registry
            .submit_response(reporters[1], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        let r3 = fx
            .registry
            .submit_response(reporters[2], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        assert_eq!(r3, ResponseOutcome::Finalized(FlightStatus::LateAirline));

        // Fourth matching report lands on a closed request.
        let r4 = fx
            .registry
            .submit_response(reporters[3], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        assert_eq!(r4, ResponseOutcome::Ignored);
    }

    #[test]
    fn test_duplicate_oracle_report_does_not_advance_tally() {
        let mut fx = Fixture::new();
        let index = 2;
        let reporters = fx.oracles_holding(index, 1);
        fx.registry
            .open_request(AccountId::from_seed("req"), index, &airline(), "AS100", 1);

        fx.registry
            .submit_response(reporters[0], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        let again = fx
            .registry
            .submit_response(reporters[0], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        assert_eq!(again, ResponseOutcome::Ignored);
    }

    #[test]
    fn test_disagreeing_statuses_tally_separately() {
        let mut fx = Fixture::new();
        let index = 7;
        let reporters = fx.oracles_holding(index, 4);
        fx.registry
            .open_request(AccountId::from_seed("req"), index, &airline(), "AS100", 1);

        fx.registry
            .submit_response(reporters[0], index, &airline(), "AS100", 1, FlightStatus::OnTime)
            .unwrap();
        fx.registry
            .submit_response(reporters[1], index, &airline(), "AS100", 1, FlightStatus::OnTime)
            .unwrap();
        let r3 = fx
            .registry
            .submit_response(reporters[2], index, &airline(), "AS100", 1, FlightStatus::LateAirline)
            .unwrap();
        // Two OnTime + one LateAirline: nothing finalized yet.
        assert_eq!(
            r3,
            ResponseOutcome::Accepted {
                status: FlightStatus::LateAirline,
                responses: 1
            }
        );
        let r4 = fx
            .registry
            .submit_response(reporters[3], index, &airline(), "AS100", 1, FlightStatus::OnTime)
            .unwrap();
        assert_eq!(r4, ResponseOutcome::Finalized(FlightStatus::OnTime));
    }

    #[test]
    fn test_response_to_unknown_request_is_noop() {
        let mut fx = Fixture::new();
        let (id, indexes) = fx.register("oracle-1");
        let out = fx
            .registry
            .submit_response(id, indexes[0], &airline(), "AS100", 1, FlightStatus::OnTime)
            .unwrap();
        assert_eq!(out, ResponseOutcome::Ignored);
    }
}
