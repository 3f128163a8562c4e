//! # Vehicle Trust Core
//!
//! Contracts for a permissioned vehicular-network ledger. Vehicles are known
//! by pseudonym, trust scores are accrued against the real identity behind
//! the pseudonym, and safety events are logged per vehicle.
//!
//! All contracts share one ordered key-value store. Every record kind is
//! written under its own composite-key namespace, and every fresh identifier
//! is derived from the transaction id, so replaying a transaction on any node
//! produces the same writes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod contract;
pub mod crypto;
pub mod deterministic;
pub mod error;
pub mod host;
pub mod models;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

/// Re-export common types for ease of use
pub use config::CoreConfig;
pub use contract::{Contract, Response, Status};
pub use error::{ContractError, HostError, Result};
pub use host::{ContractHost, Invocation, Receipt};
pub use models::{CarRecord, Event, Message, MessageType, VehicleTrust};
pub use state::{ChaincodeStub, LedgerKey, MemoryLedger, StateStore};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
