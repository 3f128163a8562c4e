//! Per-vehicle trust records

use serde::{Serialize, Deserialize};

/// Trust score of one vehicle
///
/// On input `id` carries a pseudonym. Once stored it always holds the resolved
/// real car id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleTrust {
    /// Pseudonym on input, real car id once stored
    #[serde(default)]
    pub id: String,

    /// Trust value; a delta for `AddTrust`
    #[serde(rename = "vt", default)]
    pub trust: f64,
}

impl VehicleTrust {
    /// Create a trust record
    pub fn new(id: impl Into<String>, trust: f64) -> Self {
        Self { id: id.into(), trust }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    #[test]
    fn test_wire_field_names() {
        let vt = VehicleTrust::new("car-1", 100.0);
        let json = String::from_utf8(vt.to_json_bytes().unwrap()).unwrap();
        assert_eq!(json, r#"{"id":"car-1","vt":100.0}"#);
    }

    #[test]
    fn test_query_input_without_value() {
        let vt = VehicleTrust::from_json(r#"{"id":"px"}"#).unwrap();
        assert_eq!(vt, VehicleTrust::new("px", 0.0));
    }
}
