//! Trust engine contract
//!
//! Keeps one trust score per real car identity. Callers address vehicles by
//! pseudonym; every call resolves the pseudonym through the pseudonym
//! registry's dispatcher before the trust record is read or written.
//!
//! A car id is `Uninitialized` until `InitTrust` stores a record for it and
//! `Active` afterwards. `QueryTrust` and `AddTrust` require `Active`;
//! `UpdateTrust` overwrites without checking, for administrative correction.

use log::{debug, info};

use crate::config::DEFAULT_INITIAL_TRUST;
use crate::error::{to_malformed_record, ContractError, Result};
use crate::models::{namespaces, retval, Record, VehicleTrust};
use crate::state::{ChaincodeStub, LedgerKey};
use super::names::*;
use super::{Contract, PseudonymContract};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrustFunction {
    Init,
    Query,
    Add,
    Update,
}

impl TrustFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            INIT_TRUST => Some(TrustFunction::Init),
            QUERY_TRUST => Some(TrustFunction::Query),
            ADD_TRUST => Some(TrustFunction::Add),
            UPDATE_TRUST => Some(TrustFunction::Update),
            _ => None,
        }
    }
}

/// Trust engine contract
#[derive(Debug, Clone)]
pub struct TrustContract {
    /// Registry used to resolve pseudonyms
    pseudonyms: PseudonymContract,

    /// Value every trust record is seeded with
    initial_value: f64,
}

impl Default for TrustContract {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_TRUST)
    }
}

impl TrustContract {
    /// Create the contract with the authority-controlled initial trust value
    pub fn new(initial_value: f64) -> Self {
        Self {
            pseudonyms: PseudonymContract::new(),
            initial_value,
        }
    }

    /// Resolve a pseudonym to a real car id via the pseudonym registry
    ///
    /// Resolution errors are returned unchanged.
    fn resolve(&self, stub: &mut dyn ChaincodeStub, pseudonym: &str) -> Result<String> {
        let payload = self.pseudonyms.invoke(stub, QUERY_ID_BY_PSEUDONYM, &[pseudonym.to_string()])?;
        String::from_utf8(payload).map_err(to_malformed_record)
    }

    fn read_trust(&self, stub: &dyn ChaincodeStub, car_id: &str) -> Result<VehicleTrust> {
        let bytes = stub.get_state(&trust_key(car_id)?)?
            .ok_or_else(|| ContractError::NotInitialized(car_id.to_string()))?;
        VehicleTrust::from_json_bytes(&bytes)
    }

    fn write_trust(&self, stub: &mut dyn ChaincodeStub, record: &VehicleTrust) -> Result<()> {
        let key = trust_key(&record.id)?;
        let bytes = record.to_json_bytes()?;
        stub.put_state(&key, bytes)
    }

    /// Seed the trust of `car_id` with the initial value, replacing any record
    pub fn init_trust(&self, stub: &mut dyn ChaincodeStub, car_id: &str) -> Result<()> {
        self.write_trust(stub, &VehicleTrust::new(car_id, self.initial_value))?;
        info!("[{}] Initialized trust of {} to {}", stub.tx_id(), car_id, self.initial_value);
        Ok(())
    }

    /// Read the trust record of `car_id`
    pub fn query_trust(&self, stub: &dyn ChaincodeStub, car_id: &str) -> Result<VehicleTrust> {
        self.read_trust(stub, car_id)
    }

    /// Add `delta` to the trust of `car_id`
    ///
    /// The result is not clamped; negative deltas may take trust below zero.
    pub fn add_trust(&self, stub: &mut dyn ChaincodeStub, car_id: &str, delta: f64) -> Result<()> {
        let mut record = self.read_trust(&*stub, car_id)?;
        record.trust += delta;
        self.write_trust(stub, &record)?;
        debug!("[{}] Trust of {} is now {}", stub.tx_id(), car_id, record.trust);
        Ok(())
    }

    /// Overwrite the trust of `car_id` with `value`
    pub fn update_trust(&self, stub: &mut dyn ChaincodeStub, car_id: &str, value: f64) -> Result<()> {
        self.write_trust(stub, &VehicleTrust::new(car_id, value))?;
        info!("[{}] Set trust of {} to {}", stub.tx_id(), car_id, value);
        Ok(())
    }
}

impl Contract for TrustContract {
    fn name(&self) -> &'static str {
        TRUST_CONTRACT
    }

    fn invoke(&self, stub: &mut dyn ChaincodeStub, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let input = args.first().ok_or_else(|| {
            ContractError::InvalidArgument(format!("Incorrect arguments for {}", TRUST_CONTRACT))
        })?;
        let request = VehicleTrust::from_json(input)?;

        // Route before resolving so no sub-call runs for an unknown function
        let command = TrustFunction::from_name(function)
            .ok_or_else(|| ContractError::unknown_function(TRUST_CONTRACT, function))?;
        debug!("{} dispatch {:?}", TRUST_CONTRACT, command);

        let car_id = self.resolve(stub, &request.id)?;

        match command {
            TrustFunction::Init => {
                self.init_trust(stub, &car_id)?;
                Ok(retval::OK.to_vec())
            }
            TrustFunction::Query => self.query_trust(&*stub, &car_id)?.to_json_bytes(),
            TrustFunction::Add => {
                self.add_trust(stub, &car_id, request.trust)?;
                Ok(retval::OK.to_vec())
            }
            TrustFunction::Update => {
                self.update_trust(stub, &car_id, request.trust)?;
                Ok(retval::OK.to_vec())
            }
        }
    }
}

fn trust_key(car_id: &str) -> Result<LedgerKey> {
    LedgerKey::composite(namespaces::VEHICLE_TRUST, &[car_id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::state::{MemoryLedger, MockChaincodeStub, StateStore};
    use crate::test_support::run;

    fn bound_ledger() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        run(&PseudonymContract::new(), &mut ledger, "tx-0", BIND_PSEUDONYM_WITH_CAR_ID, &["px", "car-1"]).unwrap();
        ledger
    }

    fn query(contract: &TrustContract, ledger: &mut MemoryLedger) -> VehicleTrust {
        let payload = run(contract, ledger, "tx-q", QUERY_TRUST, &[r#"{"id":"px"}"#]).unwrap();
        VehicleTrust::from_json_bytes(&payload).unwrap()
    }

    #[test]
    fn test_trust_lifecycle() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::new(100.0);

        // Caller-supplied value is discarded
        run(&contract, &mut ledger, "tx-1", INIT_TRUST, &[r#"{"id":"px","vt":7.0}"#]).unwrap();
        assert_eq!(query(&contract, &mut ledger), VehicleTrust::new("car-1", 100.0));

        run(&contract, &mut ledger, "tx-2", ADD_TRUST, &[r#"{"id":"px","vt":5.0}"#]).unwrap();
        assert_eq!(query(&contract, &mut ledger).trust, 105.0);

        run(&contract, &mut ledger, "tx-3", UPDATE_TRUST, &[r#"{"id":"px","vt":50.0}"#]).unwrap();
        assert_eq!(query(&contract, &mut ledger).trust, 50.0);
    }

    #[test]
    fn test_record_is_keyed_by_real_identity() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::default();

        run(&contract, &mut ledger, "tx-1", INIT_TRUST, &[r#"{"id":"px"}"#]).unwrap();

        assert!(ledger.get_state(&trust_key("car-1").unwrap()).unwrap().is_some());
        assert!(ledger.get_state(&trust_key("px").unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_reinit_resets_not_adds() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::new(100.0);

        run(&contract, &mut ledger, "tx-1", INIT_TRUST, &[r#"{"id":"px"}"#]).unwrap();
        run(&contract, &mut ledger, "tx-2", ADD_TRUST, &[r#"{"id":"px","vt":-30.0}"#]).unwrap();
        run(&contract, &mut ledger, "tx-3", INIT_TRUST, &[r#"{"id":"px"}"#]).unwrap();

        assert_eq!(query(&contract, &mut ledger).trust, 100.0);
    }

    #[test]
    fn test_add_is_unbounded() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::new(100.0);

        run(&contract, &mut ledger, "tx-1", INIT_TRUST, &[r#"{"id":"px"}"#]).unwrap();
        run(&contract, &mut ledger, "tx-2", ADD_TRUST, &[r#"{"id":"px","vt":-250.5}"#]).unwrap();

        assert_eq!(query(&contract, &mut ledger).trust, -150.5);
    }

    #[test]
    fn test_uninitialized() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::default();

        let err = run(&contract, &mut ledger, "tx-1", QUERY_TRUST, &[r#"{"id":"px"}"#]).unwrap_err();
        assert_eq!(err, ContractError::NotInitialized("car-1".to_string()));

        let err = run(&contract, &mut ledger, "tx-2", ADD_TRUST, &[r#"{"id":"px","vt":1.0}"#]).unwrap_err();
        assert_eq!(err, ContractError::NotInitialized("car-1".to_string()));
    }

    #[test]
    fn test_update_without_init_creates_record() {
        let mut ledger = bound_ledger();
        let contract = TrustContract::default();

        run(&contract, &mut ledger, "tx-1", UPDATE_TRUST, &[r#"{"id":"px","vt":12.5}"#]).unwrap();
        assert_eq!(query(&contract, &mut ledger), VehicleTrust::new("car-1", 12.5));
    }

    #[test]
    fn test_corrupt_record() {
        let mut ledger = bound_ledger();
        ledger.put_state(&trust_key("car-1").unwrap(), b"{oops".to_vec()).unwrap();

        let err = run(&TrustContract::default(), &mut ledger, "tx-1", QUERY_TRUST, &[r#"{"id":"px"}"#]).unwrap_err();
        assert!(matches!(err, ContractError::MalformedRecord(_)));
    }

    #[rstest]
    #[case(INIT_TRUST)]
    #[case(QUERY_TRUST)]
    #[case(ADD_TRUST)]
    #[case(UPDATE_TRUST)]
    fn test_unresolved_pseudonym_propagates(#[case] function: &str) {
        let mut ledger = bound_ledger();
        let before = ledger.clone();

        let err = run(&TrustContract::default(), &mut ledger, "tx-1", function, &[r#"{"id":"ghost","vt":1.0}"#])
            .unwrap_err();

        assert_eq!(err, ContractError::UnboundPseudonym("ghost".to_string()));
        assert_eq!(ledger, before);
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&["{not json"], false)]
    fn test_bad_input(#[case] args: &[&str], #[case] missing: bool) {
        let mut ledger = bound_ledger();
        let err = run(&TrustContract::default(), &mut ledger, "tx-1", QUERY_TRUST, args).unwrap_err();

        if missing {
            assert!(matches!(err, ContractError::InvalidArgument(_)));
        } else {
            assert!(matches!(err, ContractError::MalformedRecord(_)));
        }
    }

    #[test]
    fn test_unknown_function_skips_resolution() {
        let mut stub = MockChaincodeStub::new();
        stub.expect_get_state().times(0);
        stub.expect_put_state().times(0);

        let args = vec![r#"{"id":"px"}"#.to_string()];
        let err = TrustContract::default().invoke(&mut stub, "DropTrust", &args).unwrap_err();
        assert_eq!(err, ContractError::unknown_function(TRUST_CONTRACT, "DropTrust"));
    }

    #[test]
    fn test_store_failure_during_add_writes_nothing() {
        let mut stub = MockChaincodeStub::new();
        // Pseudonym lookup succeeds, trust read fails
        let pseudonym_key = LedgerKey::composite(namespaces::PSEUDONYM, &["px"]).unwrap();
        stub.expect_get_state()
            .returning(move |key| {
                if *key == pseudonym_key {
                    Ok(Some(b"car-1".to_vec()))
                } else {
                    Err(ContractError::StoreFailure("disk error".to_string()))
                }
            });
        stub.expect_put_state().times(0);

        let args = vec![r#"{"id":"px","vt":5.0}"#.to_string()];
        let err = TrustContract::default().invoke(&mut stub, ADD_TRUST, &args).unwrap_err();
        assert_eq!(err, ContractError::StoreFailure("disk error".to_string()));
    }
}
