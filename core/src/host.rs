//! Reference execution host
//!
//! Stands in for the ordering layer: invocations are executed one at a time,
//! each as its own transaction, against a committed in-memory ledger. A
//! transaction's buffered writes are applied only when it succeeds.
//!
//! The host keeps its transaction sequence in the ledger under the reserved
//! `Host` namespace, so a host rebuilt from a saved ledger continues the
//! sequence instead of restarting it.

use std::collections::BTreeMap;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::config::CoreConfig;
use crate::contract::{CarContract, Contract, EventContract, PseudonymContract, Response, TrustContract};
use crate::error::{HostError, Result};
use crate::models::namespaces;
use crate::state::{LedgerKey, MemoryLedger, StateStore, TransactionStub, WriteSet};

/// One inbound call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Contract to address
    pub contract: String,

    /// Function name within the contract
    pub function: String,

    /// Positional arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Transaction id; assigned by the host when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

impl Invocation {
    /// Build an invocation without an explicit transaction id
    pub fn new(contract: &str, function: &str, args: &[&str]) -> Self {
        Self {
            contract: contract.to_string(),
            function: function.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            tx_id: None,
        }
    }

    /// Pin the transaction id
    pub fn with_tx_id(mut self, tx_id: &str) -> Self {
        self.tx_id = Some(tx_id.to_string());
        self
    }
}

/// Outcome of one executed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction id the invocation ran under
    pub tx_id: String,

    /// Response returned to the caller
    pub response: Response,
}

/// Serial host for the deployed contracts
pub struct ContractHost {
    /// Committed ledger state
    ledger: MemoryLedger,

    /// Deployed contracts by name
    contracts: BTreeMap<&'static str, Box<dyn Contract>>,

    /// Number of transactions executed against the ledger, across restarts
    sequence: u64,
}

impl ContractHost {
    /// Create a host with no contracts over `ledger`
    ///
    /// The transaction sequence resumes from the value stored in the ledger.
    pub fn new(ledger: MemoryLedger) -> std::result::Result<Self, HostError> {
        let sequence = read_sequence(&ledger)?;
        if sequence > 0 {
            debug!("Resuming after {} transactions", sequence);
        }

        Ok(Self {
            ledger,
            contracts: BTreeMap::new(),
            sequence,
        })
    }

    /// Create a host over `ledger` with the four vehicle contracts deployed
    pub fn deploy(config: &CoreConfig, ledger: MemoryLedger) -> std::result::Result<Self, HostError> {
        config.validate()?;

        let mut host = Self::new(ledger)?;
        host.register(Box::new(CarContract::new()))?;
        host.register(Box::new(PseudonymContract::new()))?;
        host.register(Box::new(EventContract::new(config.events.require_registered_car)))?;
        host.register(Box::new(TrustContract::new(config.trust.initial_value)))?;

        info!(
            "Deployed {} contracts (initial trust {}, registry check {})",
            host.contracts.len(),
            config.trust.initial_value,
            config.events.require_registered_car
        );
        Ok(host)
    }

    /// Deploy a contract and run its init
    pub fn register(&mut self, contract: Box<dyn Contract>) -> std::result::Result<(), HostError> {
        let name = contract.name();
        if self.contracts.contains_key(name) {
            return Err(HostError::DuplicateContract(name.to_string()));
        }

        let tx_id = format!("init-{}", name);
        let (result, writes) = {
            let mut stub = TransactionStub::new(&tx_id, self.sequence, &self.ledger);
            let result = contract.init(&mut stub);
            (result, stub.into_write_set())
        };

        result
            .and_then(|_| self.commit(writes))
            .map_err(|source| HostError::InitFailed { contract: name.to_string(), source })?;

        self.contracts.insert(name, contract);
        Ok(())
    }

    /// Execute one invocation as one transaction
    ///
    /// Every invocation takes the next position in the sequence, whether or not
    /// it succeeds, and the position is persisted before the contract runs.
    pub fn execute(&mut self, invocation: &Invocation) -> Receipt {
        let position = self.sequence + 1;
        let tx_id = invocation
            .tx_id
            .clone()
            .unwrap_or_else(|| format!("tx-{}", position));

        info!("[{}] invoke {} -> {}", tx_id, invocation.contract, invocation.function);

        let response = match self.advance_to(position) {
            Ok(()) => self.run(invocation, &tx_id, position),
            Err(err) => Response::error(err),
        };

        if !response.is_ok() {
            warn!("[{}] {} -> {} failed: {}", tx_id, invocation.contract, invocation.function, response.payload_str());
        }

        Receipt { tx_id, response }
    }

    /// Execute invocations in order
    pub fn execute_all(&mut self, invocations: &[Invocation]) -> Vec<Receipt> {
        invocations.iter().map(|invocation| self.execute(invocation)).collect()
    }

    fn run(&mut self, invocation: &Invocation, tx_id: &str, position: u64) -> Response {
        let outcome = self.contracts.get(invocation.contract.as_str()).map(|contract| {
            let mut stub = TransactionStub::new(tx_id, position, &self.ledger);
            let result = contract.invoke(&mut stub, &invocation.function, &invocation.args);
            (result, stub.into_write_set())
        });

        match outcome {
            Some((result, writes)) => Response::from(result.and_then(|payload| {
                self.commit(writes)?;
                Ok(payload)
            })),
            None => Response::error(HostError::UnknownContract(invocation.contract.clone())),
        }
    }

    fn advance_to(&mut self, position: u64) -> Result<()> {
        self.ledger.put_state(&sequence_key()?, position.to_string().into_bytes())?;
        self.sequence = position;
        Ok(())
    }

    fn commit(&mut self, writes: WriteSet) -> Result<()> {
        for (key, value) in writes {
            self.ledger.put_state(&key, value)?;
        }
        Ok(())
    }

    /// Names of the deployed contracts
    pub fn contract_names(&self) -> Vec<&'static str> {
        self.contracts.keys().copied().collect()
    }

    /// Number of transactions executed against the ledger so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Committed ledger state
    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    /// Give up the host, keeping its ledger
    pub fn into_ledger(self) -> MemoryLedger {
        self.ledger
    }
}

/// Key holding the host's transaction sequence
fn sequence_key() -> Result<LedgerKey> {
    LedgerKey::composite(namespaces::HOST, &["sequence"])
}

fn read_sequence(ledger: &MemoryLedger) -> std::result::Result<u64, HostError> {
    let bad = |reason: String| HostError::Snapshot(format!("Bad host sequence: {}", reason));

    let stored = sequence_key()
        .and_then(|key| ledger.get_state(&key))
        .map_err(|e| bad(e.to_string()))?;

    match stored {
        None => Ok(0),
        Some(bytes) => std::str::from_utf8(&bytes)
            .map_err(|e| bad(e.to_string()))?
            .parse::<u64>()
            .map_err(|e| bad(e.to_string())),
    }
}
