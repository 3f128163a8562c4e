//! Error types for the core crate
//!
//! Every contract operation reports one of these errors synchronously to its
//! caller. None of them is retried internally and none is fatal to the host.

use thiserror::Error;

/// Contract error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// A required argument is empty or missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller input or stored bytes failed to decode
    #[error("Broken data: {0}")]
    MalformedRecord(String),

    /// No car id is bound to the pseudonym
    #[error("Please bind pseudonym to a car id first: {0}")]
    UnboundPseudonym(String),

    /// The car has not been registered
    #[error("Please register this car first: {0}")]
    NotRegistered(String),

    /// No trust record exists for the car
    #[error("Trust not initialized: {0}")]
    NotInitialized(String),

    /// The contract has no handler for the function name
    #[error("Contract: {contract} has no function: {function}")]
    UnknownFunction {
        /// Name of the contract that was invoked
        contract: String,
        /// Function name that did not match any handler
        function: String,
    },

    /// Declared capability without behavior
    #[error("Not yet implemented: {0}")]
    NotImplemented(String),

    /// The underlying state store failed
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl ContractError {
    /// Create an `UnknownFunction` error for a contract
    pub fn unknown_function(contract: &str, function: &str) -> Self {
        ContractError::UnknownFunction {
            contract: contract.to_string(),
            function: function.to_string(),
        }
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        ContractError::MalformedRecord(err.to_string())
    }
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, ContractError>;

/// Convert a displayable error to a MalformedRecord
pub fn to_malformed_record<E: std::fmt::Display>(err: E) -> ContractError {
    ContractError::MalformedRecord(err.to_string())
}

/// Errors raised by the reference host outside of contract execution
#[derive(Error, Debug)]
pub enum HostError {
    /// No contract is deployed under the name
    #[error("No such contract: {0}")]
    UnknownContract(String),

    /// A contract with the same name is already deployed
    #[error("Contract already deployed: {0}")]
    DuplicateContract(String),

    /// A contract's init failed during deployment
    #[error("Init of {contract} failed: {source}")]
    InitFailed {
        /// Contract whose init failed
        contract: String,
        /// Underlying contract error
        source: ContractError,
    },

    /// Snapshot could not be decoded
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
