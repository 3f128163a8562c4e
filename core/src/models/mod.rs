//! Data models for the Vehicle Trust Ledger
//!
//! This module provides the four record kinds stored on the ledger and the
//! symmetric JSON codec they share.

mod car;
mod message;
mod trust;

pub use car::CarRecord;
pub use message::{Event, Message, MessageType};
pub use trust::VehicleTrust;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ContractError, Result};

/// Ledger namespaces, one per record kind
pub mod namespaces {
    /// Namespace for car records keyed by car id
    pub const CAR: &str = "Car";

    /// Namespace for pseudonym bindings keyed by pseudonym
    pub const PSEUDONYM: &str = "Pseudonym";

    /// Namespace for trust records keyed by real car id
    pub const VEHICLE_TRUST: &str = "VehicleTrust";

    /// Namespace for event messages keyed by (car id, message id)
    pub const CAR_MESSAGE: &str = "CarId~MessageId";

    /// Reserved for host bookkeeping; no contract writes here
    pub const HOST: &str = "Host";
}

/// Fixed success payloads
pub mod retval {
    /// Generic success
    pub const OK: &[u8] = b"OK";

    /// A record is present
    pub const EXIST: &[u8] = b"EXIST";

    /// A record is absent
    pub const NOT_EXIST: &[u8] = b"NOT EXIST";
}

/// JSON codec shared by every record kind
pub trait Record: Serialize + DeserializeOwned {
    /// Decode from a JSON string
    fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(ContractError::from)
    }

    /// Decode from stored JSON bytes
    fn from_json_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(ContractError::from)
    }

    /// Encode to JSON bytes
    fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ContractError::from)
    }
}

impl Record for CarRecord {}
impl Record for Message {}
impl Record for Event {}
impl Record for VehicleTrust {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_namespaces_are_distinct() {
        let all = [
            namespaces::CAR,
            namespaces::PSEUDONYM,
            namespaces::VEHICLE_TRUST,
            namespaces::CAR_MESSAGE,
        ];
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_decode_failure_is_malformed_record() {
        assert!(matches!(
            CarRecord::from_json("{not json"),
            Err(ContractError::MalformedRecord(_))
        ));
        assert!(matches!(
            VehicleTrust::from_json_bytes(b"\xff\xfe"),
            Err(ContractError::MalformedRecord(_))
        ));
    }
}
