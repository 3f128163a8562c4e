//! Invocation batches and receipt output

use std::io::Read;
use serde::{Serialize, Deserialize};
use vehicle_trust_core::{HostError, Invocation, Receipt, Status};

/// Read a JSON array of invocations
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<Invocation>, HostError> {
    Ok(serde_json::from_reader(reader)?)
}

/// One line of output per executed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    /// Transaction id
    pub tx_id: String,

    /// `OK` or `ERROR`
    pub status: Status,

    /// Payload rendered as text
    pub payload: String,
}

impl From<&Receipt> for ReceiptLine {
    fn from(receipt: &Receipt) -> Self {
        Self {
            tx_id: receipt.tx_id.clone(),
            status: receipt.response.status,
            payload: receipt.response.payload_str(),
        }
    }
}
