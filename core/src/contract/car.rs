//! Car registry contract
//!
//! CRUD over vehicle identity records keyed by real car identity.

use log::{debug, info};

use crate::error::{ContractError, Result};
use crate::models::{namespaces, retval, CarRecord, Record};
use crate::state::{ChaincodeStub, LedgerKey};
use super::names::*;
use super::{parse_args, Contract};

/// Functions the car registry answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarFunction {
    Exist,
    Register,
    QueryById,
    QueryByRange,
    Update,
}

impl CarFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            EXIST_CAR => Some(CarFunction::Exist),
            REGISTER_CAR => Some(CarFunction::Register),
            QUERY_CAR_BY_ID => Some(CarFunction::QueryById),
            QUERY_CAR_BY_RANGE => Some(CarFunction::QueryByRange),
            UPDATE_CAR => Some(CarFunction::Update),
            _ => None,
        }
    }
}

/// Whether a car record is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// A record is stored under the car id
    Exist,
    /// Nothing is stored under the car id
    NotExist,
}

impl Existence {
    /// Wire payload for this answer
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Existence::Exist => retval::EXIST,
            Existence::NotExist => retval::NOT_EXIST,
        }
    }
}

/// Car registry contract
#[derive(Debug, Clone, Copy, Default)]
pub struct CarContract;

impl CarContract {
    /// Create the contract
    pub fn new() -> Self {
        CarContract
    }

    /// Report whether a record is stored under `car_id`
    pub fn exist_car(&self, stub: &dyn ChaincodeStub, car_id: &str) -> Result<Existence> {
        let key = car_key(car_id)?;

        Ok(match stub.get_state(&key)? {
            Some(_) => Existence::Exist,
            None => Existence::NotExist,
        })
    }

    /// Store a car record, replacing any record with the same id
    pub fn register_car(&self, stub: &mut dyn ChaincodeStub, car_json: &str) -> Result<()> {
        let car = CarRecord::from_json(car_json)?;
        let key = car_key(&car.car_id)?;
        let bytes = car.to_json_bytes()?;

        stub.put_state(&key, bytes)?;
        info!("[{}] Registered car {}", stub.tx_id(), car.car_id);
        Ok(())
    }

    /// Fetch the car record stored under `car_id`
    pub fn query_car_by_id(&self, stub: &dyn ChaincodeStub, car_id: &str) -> Result<CarRecord> {
        let key = car_key(car_id)?;

        let bytes = stub.get_state(&key)?
            .ok_or_else(|| ContractError::NotRegistered(car_id.to_string()))?;

        CarRecord::from_json_bytes(&bytes)
    }

    /// Range query over car records
    pub fn query_car_by_range(&self, _stub: &dyn ChaincodeStub, _args: &[String]) -> Result<Vec<CarRecord>> {
        Err(ContractError::NotImplemented(QUERY_CAR_BY_RANGE.to_string()))
    }

    /// Overwrite a car record; the car must already be registered
    pub fn update_car(&self, stub: &mut dyn ChaincodeStub, car_json: &str) -> Result<()> {
        if car_json.is_empty() {
            return Err(ContractError::InvalidArgument(
                "New car info should not be empty".to_string(),
            ));
        }

        let car = CarRecord::from_json(car_json)?;

        if self.exist_car(&*stub, &car.car_id)? == Existence::NotExist {
            return Err(ContractError::NotRegistered(car.car_id));
        }

        let key = car_key(&car.car_id)?;
        let bytes = car.to_json_bytes()?;
        stub.put_state(&key, bytes)?;
        info!("[{}] Updated car {}", stub.tx_id(), car.car_id);
        Ok(())
    }
}

impl Contract for CarContract {
    fn name(&self) -> &'static str {
        CAR_CONTRACT
    }

    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let command = CarFunction::from_name(function)
            .ok_or_else(|| ContractError::unknown_function(CAR_CONTRACT, function))?;
        debug!("{} dispatch {:?}", CAR_CONTRACT, command);

        match command {
            CarFunction::Exist => {
                let [car_id] = parse_args::<1>(args)?;
                Ok(self.exist_car(&*stub, car_id)?.as_bytes().to_vec())
            }
            CarFunction::Register => {
                let [car_json] = parse_args::<1>(args)?;
                self.register_car(stub, car_json)?;
                Ok(retval::OK.to_vec())
            }
            CarFunction::QueryById => {
                let [car_id] = parse_args::<1>(args)?;
                self.query_car_by_id(&*stub, car_id)?.to_json_bytes()
            }
            CarFunction::QueryByRange => {
                let cars = self.query_car_by_range(&*stub, args)?;
                Ok(serde_json::to_vec(&cars)?)
            }
            CarFunction::Update => {
                let [car_json] = parse_args::<1>(args)?;
                self.update_car(stub, car_json)?;
                Ok(retval::OK.to_vec())
            }
        }
    }
}

/// Key of the car record for `car_id`
pub(crate) fn car_key(car_id: &str) -> Result<LedgerKey> {
    if car_id.is_empty() {
        return Err(ContractError::InvalidArgument(format!("Invalid car id: {:?}", car_id)));
    }
    LedgerKey::composite(namespaces::CAR, &[car_id])
}
