//! Ledger state
//!
//! This module provides the ordered key-value store every contract shares, the
//! composite-key helper used to partition it, and the per-transaction stub a
//! contract executes against.

mod key;
mod memory;
mod stub;

pub use key::LedgerKey;
pub use memory::{MemoryLedger, LedgerSnapshot};
pub use stub::{ChaincodeStub, TransactionStub, WriteSet};

#[cfg(test)]
pub use stub::MockChaincodeStub;

use crate::error::Result;

/// Ordered key-value store backing the ledger
///
/// Supplied by the execution environment. Reads return `None` for absent keys;
/// failures of the underlying store surface as `StoreFailure`.
pub trait StateStore {
    /// Read the value stored under `key`
    fn get_state(&self, key: &LedgerKey) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) -> Result<()>;
}
