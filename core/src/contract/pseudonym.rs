//! Pseudonym registry contract
//!
//! Binds opaque pseudonyms to real car identities. A pseudonym holds at most
//! one binding; rebinding silently replaces it and keeps no history.

use log::{debug, info};

use crate::error::{to_malformed_record, ContractError, Result};
use crate::models::{namespaces, retval};
use crate::state::{ChaincodeStub, LedgerKey};
use super::names::*;
use super::{parse_args, Contract};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PseudonymFunction {
    QueryId,
    Bind,
    Transfer,
    Unbind,
}

impl PseudonymFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            QUERY_ID_BY_PSEUDONYM => Some(PseudonymFunction::QueryId),
            BIND_PSEUDONYM_WITH_CAR_ID => Some(PseudonymFunction::Bind),
            TRANSFER_PSEUDONYM => Some(PseudonymFunction::Transfer),
            UNBIND_PSEUDONYM_WITH_CAR_ID => Some(PseudonymFunction::Unbind),
            _ => None,
        }
    }
}

/// Pseudonym registry contract
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudonymContract;

impl PseudonymContract {
    /// Create the contract
    pub fn new() -> Self {
        PseudonymContract
    }

    /// Resolve a pseudonym to the car id bound to it
    pub fn resolve(&self, stub: &dyn ChaincodeStub, pseudonym: &str) -> Result<String> {
        if pseudonym.is_empty() {
            return Err(ContractError::InvalidArgument("Invalid pseudonym".to_string()));
        }

        let bytes = stub.get_state(&pseudonym_key(pseudonym)?)?
            .ok_or_else(|| ContractError::UnboundPseudonym(pseudonym.to_string()))?;

        String::from_utf8(bytes)
            .map_err(|e| to_malformed_record(format!("Binding for {} is not UTF-8: {}", pseudonym, e)))
    }

    /// Bind `pseudonym` to `car_id`, replacing any earlier binding
    pub fn bind(&self, stub: &mut dyn ChaincodeStub, pseudonym: &str, car_id: &str) -> Result<()> {
        if pseudonym.is_empty() || car_id.is_empty() {
            return Err(ContractError::InvalidArgument(
                "Invalid pseudonym or car id".to_string(),
            ));
        }

        stub.put_state(&pseudonym_key(pseudonym)?, car_id.as_bytes().to_vec())?;
        info!("[{}] Bound pseudonym {} to car {}", stub.tx_id(), pseudonym, car_id);
        Ok(())
    }

    /// Move a pseudonym from one car id to another
    pub fn transfer(&self, _stub: &mut dyn ChaincodeStub, _args: &[String]) -> Result<()> {
        Err(ContractError::NotImplemented(TRANSFER_PSEUDONYM.to_string()))
    }

    /// Remove a pseudonym binding
    pub fn unbind(&self, _stub: &mut dyn ChaincodeStub, _args: &[String]) -> Result<()> {
        Err(ContractError::NotImplemented(UNBIND_PSEUDONYM_WITH_CAR_ID.to_string()))
    }
}

impl Contract for PseudonymContract {
    fn name(&self) -> &'static str {
        PSEUDONYM_CONTRACT
    }

    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let command = PseudonymFunction::from_name(function)
            .ok_or_else(|| ContractError::unknown_function(PSEUDONYM_CONTRACT, function))?;
        debug!("{} dispatch {:?}", PSEUDONYM_CONTRACT, command);

        match command {
            PseudonymFunction::QueryId => {
                let [pseudonym] = parse_args::<1>(args)?;
                Ok(self.resolve(&*stub, pseudonym)?.into_bytes())
            }
            PseudonymFunction::Bind => {
                let [pseudonym, car_id] = parse_args::<2>(args)?;
                self.bind(stub, pseudonym, car_id)?;
                Ok(retval::OK.to_vec())
            }
            PseudonymFunction::Transfer => {
                self.transfer(stub, args)?;
                Ok(retval::OK.to_vec())
            }
            PseudonymFunction::Unbind => {
                self.unbind(stub, args)?;
                Ok(retval::OK.to_vec())
            }
        }
    }
}

fn pseudonym_key(pseudonym: &str) -> Result<LedgerKey> {
    LedgerKey::composite(namespaces::PSEUDONYM, &[pseudonym])
}
