//! Helpers shared by the contract unit tests

use crate::contract::Contract;
use crate::error::Result;
use crate::state::{MemoryLedger, StateStore, TransactionStub};

/// Run one invocation as its own transaction, committing only on success
///
/// The transaction's position is the ledger size, so distinct calls in one
/// test never share a fresh-id sequence.
pub(crate) fn run(
    contract: &dyn Contract,
    ledger: &mut MemoryLedger,
    tx_id: &str,
    function: &str,
    args: &[&str],
) -> Result<Vec<u8>> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    let (result, writes) = {
        let mut stub = TransactionStub::new(tx_id, ledger.len() as u64, &*ledger);
        let result = contract.invoke(&mut stub, function, &args);
        (result, stub.into_write_set())
    };

    if result.is_ok() {
        for (key, value) in writes {
            ledger.put_state(&key, value)?;
        }
    }
    result
}
