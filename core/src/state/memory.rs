//! In-memory ordered ledger

use std::collections::BTreeMap;
use log::debug;
use serde::{Serialize, Deserialize};

use crate::crypto::{self, DomainHasher, STATE_ROOT_DOMAIN};
use crate::error::{HostError, Result};
use super::{LedgerKey, StateStore};

/// Ordered key-value ledger held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryLedger {
    entries: BTreeMap<LedgerKey, Vec<u8>>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the ledger
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the ledger holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries under the partial composite key `(namespace, parts)`, in key order
    pub fn scan_prefix(&self, namespace: &str, parts: &[&str]) -> Result<Vec<(LedgerKey, Vec<u8>)>> {
        let prefix = LedgerKey::composite(namespace, parts)?;

        Ok(self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    /// Digest over every key and value in key order
    ///
    /// Replicas that applied the same transactions in the same order report the
    /// same root.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = DomainHasher::new(STATE_ROOT_DOMAIN);
        for (key, value) in &self.entries {
            hasher.update(key.as_str().as_bytes());
            hasher.update(value);
        }
        hasher.finalize()
    }

    /// Check the state root against an expected digest
    pub fn matches_root(&self, expected: &[u8; 32]) -> bool {
        crypto::verify_hash(expected, &self.state_root())
    }

    /// Capture the ledger as a serializable snapshot
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: self.entries
                .iter()
                .map(|(key, value)| (key.as_str().to_string(), hex::encode(value)))
                .collect(),
        }
    }

    /// Rebuild a ledger from a snapshot
    ///
    /// Every key must be a well-formed composite key.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> std::result::Result<Self, HostError> {
        let mut entries = BTreeMap::new();
        for (key, value) in snapshot.entries {
            let value = hex::decode(&value)
                .map_err(|e| HostError::Snapshot(format!("Bad value for key {:?}: {}", key, e)))?;
            let key = LedgerKey::from_raw(key);
            key.split()
                .map_err(|e| HostError::Snapshot(e.to_string()))?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }
}

impl StateStore for MemoryLedger {
    fn get_state(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>> {
        debug!("get {}", key);
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) -> Result<()> {
        debug!("put {} ({} bytes)", key, value.len());
        self.entries.insert(key.clone(), value);
        Ok(())
    }
}

/// Serializable form of a ledger; values are hex-encoded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Raw key to hex value
    pub entries: BTreeMap<String, String>,
}
