//! Contracts and the dispatcher pattern they share
//!
//! A contract is an independently addressable set of named operations over the
//! shared ledger. Each contract maps an inbound function name once to a finite
//! command enum and rejects names it does not know with `UnknownFunction`.

mod car;
mod event;
mod pseudonym;
mod trust;

pub use car::{CarContract, Existence};
pub use event::EventContract;
pub use pseudonym::PseudonymContract;
pub use trust::TrustContract;

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::error::{ContractError, Result};
use crate::models::retval;
use crate::state::ChaincodeStub;

/// Contract and function names as callers address them
pub mod names {
    /// Car registry contract
    pub const CAR_CONTRACT: &str = "CarContract";
    /// Report whether a car is registered
    pub const EXIST_CAR: &str = "ExistCar";
    /// Register a car record
    pub const REGISTER_CAR: &str = "RegisterCar";
    /// Fetch a car record by id
    pub const QUERY_CAR_BY_ID: &str = "QueryCarById";
    /// Range query over car records
    pub const QUERY_CAR_BY_RANGE: &str = "QueryCarByRange";
    /// Overwrite a registered car record
    pub const UPDATE_CAR: &str = "UpdateCar";

    /// Pseudonym registry contract
    pub const PSEUDONYM_CONTRACT: &str = "PseudonymContract";
    /// Resolve a pseudonym to a car id
    pub const QUERY_ID_BY_PSEUDONYM: &str = "QueryIdByPseudonym";
    /// Bind a pseudonym to a car id
    pub const BIND_PSEUDONYM_WITH_CAR_ID: &str = "BindPseudonymWithCarId";
    /// Move a pseudonym to another car id
    pub const TRANSFER_PSEUDONYM: &str = "TransferPseudonym";
    /// Remove a pseudonym binding
    pub const UNBIND_PSEUDONYM_WITH_CAR_ID: &str = "UnbindPseudonymWithCarId";

    /// Event log contract
    pub const EVENT_CONTRACT: &str = "EventContract";
    /// Append an event message
    pub const SUBMIT_MESSAGE: &str = "SubmitMessage";
    /// Range retrieval of a car's messages
    pub const QUERY_MESSAGES_BY_CAR: &str = "QueryMessagesByCar";

    /// Trust engine contract
    pub const TRUST_CONTRACT: &str = "TrustContract";
    /// Seed a vehicle's trust
    pub const INIT_TRUST: &str = "InitTrust";
    /// Read a vehicle's trust
    pub const QUERY_TRUST: &str = "QueryTrust";
    /// Add a delta to a vehicle's trust
    pub const ADD_TRUST: &str = "AddTrust";
    /// Overwrite a vehicle's trust
    pub const UPDATE_TRUST: &str = "UpdateTrust";
}

/// An independently addressable contract
pub trait Contract {
    /// Name callers address the contract by
    fn name(&self) -> &'static str;

    /// Called once when the contract is deployed
    fn init(&self, _stub: &mut dyn ChaincodeStub) -> Result<Vec<u8>> {
        Ok(retval::OK.to_vec())
    }

    /// Route `function` with positional `args` to exactly one handler
    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Result<Vec<u8>>;
}

/// Outcome status of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The invocation succeeded
    #[serde(rename = "OK")]
    Ok,

    /// The invocation failed; the payload carries the error message
    #[serde(rename = "ERROR")]
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of an invocation as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome status
    pub status: Status,

    /// Success payload or error message
    pub payload: Vec<u8>,
}

impl Response {
    /// Successful response
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self { status: Status::Ok, payload: payload.into() }
    }

    /// Error response carrying `message`
    pub fn error(message: impl fmt::Display) -> Self {
        Self { status: Status::Error, payload: message.to_string().into_bytes() }
    }

    /// True for `Status::Ok`
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Payload as (lossy) UTF-8 text
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

impl From<Result<Vec<u8>>> for Response {
    fn from(result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(err) => Response::error(err),
        }
    }
}

/// Take exactly the first `N` positional arguments
///
/// Extra arguments are ignored; fewer than `N` is an `InvalidArgument`.
pub(crate) fn parse_args<const N: usize>(args: &[String]) -> Result<[&str; N]> {
    if args.len() < N {
        return Err(ContractError::InvalidArgument(format!(
            "Incorrect number of arguments: expected {}, got {}",
            N,
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}
