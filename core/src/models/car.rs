//! Vehicle identity records

use serde::{Serialize, Deserialize};

/// A registered vehicle, keyed by its real identity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarRecord {
    /// Globally unique car identity
    #[serde(rename = "car_id", default)]
    pub car_id: String,

    /// Free-form vehicle information
    #[serde(rename = "car_info", default)]
    pub info: String,
}

impl CarRecord {
    /// Create a record with the given id and info
    pub fn new(car_id: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            car_id: car_id.into(),
            info: info.into(),
        }
    }
}
