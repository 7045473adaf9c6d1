//! Observable platform events.
//!
//! Each event carries the flight identity tuple so external subscribers can
//! correlate requests, reports, and finalizations.

use aerosure_state::{AccountId, FlightStatus};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppEvent {
    /// A flight-status request round opened under `index`.
    RequestOpened {
        index: u8,
        airline: AccountId,
        flight_number: String,
        timestamp: u64,
    },
    /// An oracle report was counted toward quorum.
    OracleReportReceived {
        airline: AccountId,
        flight_number: String,
        timestamp: u64,
        status: FlightStatus,
    },
    /// Quorum reached; the flight status is final.
    StatusFinalized {
        airline: AccountId,
        flight_number: String,
        timestamp: u64,
        status: FlightStatus,
    },
}

/// In-memory event sink drained by subscribers.
#[derive(Debug, Default)]
pub struct EventLog {
    inner: Mutex<Vec<AppEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn emit(&self, event: AppEvent) {
        log::info!("event: {:?}", event);
        self.inner.lock().push(event);
    }

    /// Take all pending events, oldest first.
    pub fn drain(&self) -> Vec<AppEvent> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_the_log_in_order() {
        let log = EventLog::new();
        let airline = AccountId::from_seed("airline-a");
        log.emit(AppEvent::RequestOpened {
            index: 3,
            airline,
            flight_number: "AS100".into(),
            timestamp: 1,
        });
        log.emit(AppEvent::StatusFinalized {
            airline,
            flight_number: "AS100".into(),
            timestamp: 1,
            status: FlightStatus::OnTime,
        });
        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AppEvent::RequestOpened { index: 3, .. }));
        assert!(log.is_empty());
    }
}
