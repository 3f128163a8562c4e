//! Per-transaction stub
//!
//! A contract never touches the committed ledger directly. It reads through a
//! stub that buffers writes; the host applies the buffered write set only
//! after the invocation succeeds.

use std::collections::BTreeMap;
use log::debug;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::deterministic::DeterministicIds;
use crate::error::Result;
use super::{LedgerKey, StateStore};

/// Writes buffered by one transaction, in key order
pub type WriteSet = BTreeMap<LedgerKey, Vec<u8>>;

/// The view of the ledger a contract executes against
#[cfg_attr(test, automock)]
pub trait ChaincodeStub {
    /// Id of the transaction being executed
    fn tx_id(&self) -> &str;

    /// Read the value under `key`
    fn get_state(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`
    fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) -> Result<()>;

    /// Issue an identifier unique to this transaction and identical on every replica
    fn fresh_id(&mut self) -> Uuid;
}

/// Stub over a committed store with a buffered write set
pub struct TransactionStub<'a> {
    tx_id: String,
    committed: &'a dyn StateStore,
    writes: WriteSet,
    ids: DeterministicIds,
}

impl<'a> TransactionStub<'a> {
    /// Open a stub for transaction `tx_id` at `position` in the ledger order
    pub fn new(tx_id: &str, position: u64, committed: &'a dyn StateStore) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            committed,
            writes: WriteSet::new(),
            ids: DeterministicIds::new(tx_id, position),
        }
    }

    /// Close the stub, returning the buffered writes
    pub fn into_write_set(self) -> WriteSet {
        debug!(
            "[{}] closing with {} buffered writes, {} fresh ids",
            self.tx_id,
            self.writes.len(),
            self.ids.issued()
        );
        self.writes
    }
}

impl ChaincodeStub for TransactionStub<'_> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>> {
        // Reads observe the transaction's own writes
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }
        self.committed.get_state(key)
    }

    fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) -> Result<()> {
        debug!("[{}] buffer write {}", self.tx_id, key);
        self.writes.insert(key.clone(), value);
        Ok(())
    }

    fn fresh_id(&mut self) -> Uuid {
        self.ids.next_uuid()
    }
}
