//! Event log contract
//!
//! Appends immutable messages under `CarId~MessageId` composite keys. Each
//! submission gets a fresh message id, so any number of events can be stored
//! per car without overwriting one another.

use log::{debug, info};

use crate::error::{ContractError, Result};
use crate::models::{namespaces, retval, Event, Record};
use crate::state::{ChaincodeStub, LedgerKey};
use super::names::*;
use super::{parse_args, CarContract, Contract};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventFunction {
    Submit,
    QueryByCar,
}

impl EventFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            SUBMIT_MESSAGE => Some(EventFunction::Submit),
            QUERY_MESSAGES_BY_CAR => Some(EventFunction::QueryByCar),
            _ => None,
        }
    }
}

/// Event log contract
#[derive(Debug, Clone, Default)]
pub struct EventContract {
    /// Registry consulted when `require_registered_car` is set
    cars: CarContract,

    /// Reject events from cars the registry does not know
    require_registered_car: bool,
}

impl EventContract {
    /// Create the contract
    pub fn new(require_registered_car: bool) -> Self {
        Self {
            cars: CarContract::new(),
            require_registered_car,
        }
    }

    /// Append the event's message, returning the key it was stored under
    pub fn submit_message(&self, stub: &mut dyn ChaincodeStub, event_json: &str) -> Result<LedgerKey> {
        let event = Event::from_json(event_json)?;
        if event.car_id.is_empty() {
            return Err(ContractError::InvalidArgument("Event carries no car id".to_string()));
        }

        if self.require_registered_car {
            // Same-transaction call into the car registry's dispatcher
            let exists = self.cars.invoke(stub, EXIST_CAR, &[event.car_id.clone()])?;
            if exists != retval::EXIST {
                return Err(ContractError::NotRegistered(event.car_id));
            }
        }

        let message_id = stub.fresh_id().to_string();
        let key = LedgerKey::composite(namespaces::CAR_MESSAGE, &[event.car_id.as_str(), message_id.as_str()])?;
        let bytes = event.message.to_json_bytes()?;

        stub.put_state(&key, bytes)?;
        info!("[{}] Stored message {} for car {}", stub.tx_id(), message_id, event.car_id);
        Ok(key)
    }

    /// Range retrieval of a car's messages
    pub fn query_messages_by_car(&self, _stub: &dyn ChaincodeStub, _args: &[String]) -> Result<Vec<u8>> {
        Err(ContractError::NotImplemented(QUERY_MESSAGES_BY_CAR.to_string()))
    }
}

impl Contract for EventContract {
    fn name(&self) -> &'static str {
        EVENT_CONTRACT
    }

    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let command = EventFunction::from_name(function)
            .ok_or_else(|| ContractError::unknown_function(EVENT_CONTRACT, function))?;
        debug!("{} dispatch {:?}", EVENT_CONTRACT, command);

        match command {
            EventFunction::Submit => {
                let [event_json] = parse_args::<1>(args)?;
                self.submit_message(stub, event_json)?;
                Ok(retval::OK.to_vec())
            }
            EventFunction::QueryByCar => self.query_messages_by_car(&*stub, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, MessageType};
    use crate::state::{MemoryLedger, MockChaincodeStub};
    use crate::test_support::run;

    fn event(car_id: &str, content: &str) -> String {
        format!(
            r#"{{"car_id":"{}","message_id":1,"message_type":0,"message_content":"{}"}}"#,
            car_id, content
        )
    }

    #[test]
    fn test_events_for_same_car_never_collide() {
        let mut ledger = MemoryLedger::new();
        let contract = EventContract::new(false);

        run(&contract, &mut ledger, "tx-1", SUBMIT_MESSAGE, &[event("car-1", "crash at km 12").as_str()]).unwrap();
        run(&contract, &mut ledger, "tx-2", SUBMIT_MESSAGE, &[event("car-1", "crash at km 13").as_str()]).unwrap();

        let stored = ledger.scan_prefix(namespaces::CAR_MESSAGE, &["car-1"]).unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].0, stored[1].0);

        let mut contents: Vec<_> = stored
            .iter()
            .map(|(_, v)| Message::from_json_bytes(v).unwrap().content)
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["crash at km 12", "crash at km 13"]);
    }

    #[test]
    fn test_back_to_back_in_one_transaction() {
        let ledger = MemoryLedger::new();
        let contract = EventContract::new(false);
        let mut stub = crate::state::TransactionStub::new("tx-1", 1, &ledger);

        let first = contract.submit_message(&mut stub, &event("car-1", "a")).unwrap();
        let second = contract.submit_message(&mut stub, &event("car-1", "b")).unwrap();

        assert_ne!(first, second);
        assert_eq!(stub.into_write_set().len(), 2);
    }

    #[test]
    fn test_stores_message_not_wrapper() {
        let mut ledger = MemoryLedger::new();
        let contract = EventContract::new(false);

        run(&contract, &mut ledger, "tx-1", SUBMIT_MESSAGE, &[
            r#"{"car_id":"car-1","message_id":4,"message_type":2,"message_content":"dashcam"}"#,
        ])
        .unwrap();

        let (key, value) = ledger.scan_prefix(namespaces::CAR_MESSAGE, &[]).unwrap().remove(0);
        let (namespace, parts) = key.split().unwrap();
        assert_eq!(namespace, namespaces::CAR_MESSAGE);
        assert_eq!(parts[0], "car-1");

        let message = Message::from_json_bytes(&value).unwrap();
        assert_eq!(message, Message { id: 4, kind: MessageType::Multimedia, content: "dashcam".to_string() });
        assert!(!String::from_utf8(value).unwrap().contains("car_id"));
    }

    #[test]
    fn test_malformed_event() {
        let mut ledger = MemoryLedger::new();
        let contract = EventContract::new(false);

        let err = run(&contract, &mut ledger, "tx-1", SUBMIT_MESSAGE, &["not json"]).unwrap_err();
        assert!(matches!(err, ContractError::MalformedRecord(_)));

        let err = run(&contract, &mut ledger, "tx-2", SUBMIT_MESSAGE, &[r#"{"message_content":"x"}"#]).unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_registry_check_when_enabled() {
        let mut ledger = MemoryLedger::new();
        let contract = EventContract::new(true);

        let err = run(&contract, &mut ledger, "tx-1", SUBMIT_MESSAGE, &[event("car-1", "x").as_str()]).unwrap_err();
        assert_eq!(err, ContractError::NotRegistered("car-1".to_string()));

        run(&CarContract::new(), &mut ledger, "tx-2", REGISTER_CAR, &[r#"{"car_id":"car-1","car_info":""}"#]).unwrap();
        run(&contract, &mut ledger, "tx-3", SUBMIT_MESSAGE, &[event("car-1", "x").as_str()]).unwrap();
        assert_eq!(ledger.scan_prefix(namespaces::CAR_MESSAGE, &["car-1"]).unwrap().len(), 1);
    }

    #[test]
    fn test_registry_failure_aborts_before_write() {
        let mut stub = MockChaincodeStub::new();
        stub.expect_get_state()
            .returning(|_| Err(ContractError::StoreFailure("unavailable".to_string())));
        stub.expect_fresh_id().times(0);
        stub.expect_put_state().times(0);

        let err = EventContract::new(true).submit_message(&mut stub, &event("car-1", "x")).unwrap_err();
        assert_eq!(err, ContractError::StoreFailure("unavailable".to_string()));
    }

    #[test]
    fn test_query_by_car_not_implemented() {
        let mut ledger = MemoryLedger::new();
        let err = run(&EventContract::new(false), &mut ledger, "tx-1", QUERY_MESSAGES_BY_CAR, &["car-1"]).unwrap_err();
        assert!(matches!(err, ContractError::NotImplemented(_)));
    }
}
