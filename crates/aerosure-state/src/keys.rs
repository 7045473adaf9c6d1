//! Composite storage keys.
//!
//! Contract-style mappings are keyed by hashing identity tuples. Field order
//! is significant and every field is length-prefixed, so two different tuples
//! can never collapse onto the same byte stream.

use crate::account::AccountId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

macro_rules! key_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; 32]);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), hex::encode(&self.0[..8]))
            }
        }

        // Hex-string serde so keys stay usable as JSON map keys.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&hex::encode(self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let encoded = String::deserialize(deserializer)?;
                let bytes = hex::decode(&encoded).map_err(D::Error::custom)?;
                let bytes: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| D::Error::custom("key must be 32 bytes"))?;
                Ok($name(bytes))
            }
        }
    };
}

key_type!(
    /// Key for a flight occurrence: (airline, flight number, timestamp).
    FlightKey
);
key_type!(
    /// Key for one insuree's policy: (insuree, airline, flight number, timestamp).
    PolicyKey
);
key_type!(
    /// Key for an oracle response round: (index, airline, flight number, timestamp).
    ResponseKey
);

/// Sha256 over length-prefixed parts. Order-sensitive by construction.
fn hash_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

pub fn flight_key(airline: &AccountId, flight_number: &str, timestamp: u64) -> FlightKey {
    FlightKey(hash_parts(&[
        airline.as_bytes(),
        flight_number.as_bytes(),
        &timestamp.to_le_bytes(),
    ]))
}

pub fn policy_key(
    insuree: &AccountId,
    airline: &AccountId,
    flight_number: &str,
    timestamp: u64,
) -> PolicyKey {
    PolicyKey(hash_parts(&[
        insuree.as_bytes(),
        airline.as_bytes(),
        flight_number.as_bytes(),
        &timestamp.to_le_bytes(),
    ]))
}

pub fn response_key(
    index: u8,
    airline: &AccountId,
    flight_number: &str,
    timestamp: u64,
) -> ResponseKey {
    ResponseKey(hash_parts(&[
        &[index],
        airline.as_bytes(),
        flight_number.as_bytes(),
        &timestamp.to_le_bytes(),
    ]))
}
