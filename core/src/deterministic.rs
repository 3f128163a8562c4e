//! Deterministic identifier generation
//!
//! Every node validating a transaction must derive the same keys for it, so
//! fresh identifiers are derived from the transaction id, the transaction's
//! position in the ledger order and a per-transaction counter instead of a
//! random source.

use uuid::Uuid;

use crate::crypto::{secure_hash_multiple, MESSAGE_ID_DOMAIN};

/// Generator of fresh UUIDs scoped to one transaction
///
/// Two generators built from the same transaction id and position yield the
/// same ids. Generators that differ in either yield disjoint ids, so a reused
/// transaction id at a later position never repeats an earlier id.
#[derive(Debug, Clone)]
pub struct DeterministicIds {
    /// Transaction the ids belong to
    tx_id: String,

    /// Position of the transaction in the ledger order
    position: u64,

    /// Number of ids issued so far
    counter: u64,
}

impl DeterministicIds {
    /// Create a generator for a transaction
    pub fn new(tx_id: &str, position: u64) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            position,
            counter: 0,
        }
    }

    /// Issue the next id
    pub fn next_uuid(&mut self) -> Uuid {
        let digest = secure_hash_multiple(
            MESSAGE_ID_DOMAIN,
            &[
                self.tx_id.as_bytes(),
                &self.position.to_be_bytes(),
                &self.counter.to_be_bytes(),
            ],
        );
        self.counter += 1;

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);

        // Set the version (4) and variant bits
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;

        Uuid::from_bytes(bytes)
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
