//! Ledger snapshot files

use std::fs::File;
use std::path::Path;
use log::info;
use vehicle_trust_core::state::LedgerSnapshot;
use vehicle_trust_core::{HostError, MemoryLedger};

/// Load the ledger stored at `path`, or an empty ledger if the file does not exist
pub fn load_ledger(path: &Path) -> Result<MemoryLedger, HostError> {
    if !path.exists() {
        info!("No snapshot at {}, starting from an empty ledger", path.display());
        return Ok(MemoryLedger::new());
    }

    let snapshot: LedgerSnapshot = serde_json::from_reader(File::open(path)?)?;
    let ledger = MemoryLedger::from_snapshot(snapshot)?;
    info!("Loaded {} keys from {}", ledger.len(), path.display());
    Ok(ledger)
}

/// Write `ledger` to `path` as a snapshot
pub fn save_ledger(ledger: &MemoryLedger, path: &Path) -> Result<(), HostError> {
    serde_json::to_writer_pretty(File::create(path)?, &ledger.snapshot())?;
    info!("Saved {} keys to {}", ledger.len(), path.display());
    Ok(())
}
