//! Vehicle Trust Ledger node
//!
//! Loads invocation batches and ledger snapshots for the `vtl-node` binary and
//! renders transaction receipts.

pub mod batch;
pub mod snapshot;

pub use batch::{read_batch, ReceiptLine};
pub use snapshot::{load_ledger, save_ledger};
