//! Normalized carrier record and the verification outcome shapes

use serde::Serialize;

use crate::extractors::Address;

/// Everything extracted from one Company Snapshot page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierRecord {
    pub found: bool,
    pub active: bool,
    pub legal_name: String,
    pub dba_name: String,
    pub mc_number: String,
    pub dot_number: String,
    /// `"A"` active, `"I"` inactive
    pub status_code: String,
    pub oos_date: String,
    pub entity_type: String,
    pub phone: String,
    pub physical_address: Address,
    pub mailing_address: Address,
    pub carrier_operation: Vec<String>,
    pub operation_classification: Vec<String>,
    pub cargo_carried: Vec<String>,
    pub common_authority_status: String,
    pub operating_authority_status: String,
    pub mcs150_form_date: String,
    pub total_power_units: u32,
    pub total_drivers: u32,
    pub vehicle_insp: u32,
    pub vehicle_oos_insp: u32,
    pub vehicle_oos_rate: f64,
    pub driver_insp: u32,
    pub driver_oos_insp: u32,
    pub driver_oos_rate: f64,
    pub hazmat_insp: u32,
    pub hazmat_oos_insp: u32,
    pub hazmat_oos_rate: f64,
    pub crash_total: u32,
    pub fatal_crash: u32,
    pub inj_crash: u32,
    pub tow_crash: u32,
    pub safety_rating: String,
    pub safety_rating_date: String,
    pub safety_review_date: String,
    pub safety_review_type: String,
}

/// `found: false` shape, for "no such carrier" and "SAFER unavailable" alike.
///
/// `error` is only present when the lookup could not be completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFound {
    pub found: bool,
    pub active: bool,
    pub legal_name: String,
    pub mc_number: String,
    pub dot_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotFound {
    pub fn new(mc_number: String, dot_number: String) -> Self {
        Self {
            mc_number,
            dot_number,
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Outcome of one verification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Verification {
    Found(Box<CarrierRecord>),
    NotFound(NotFound),
}

impl Verification {
    pub fn is_found(&self) -> bool {
        matches!(self, Verification::Found(_))
    }

    /// True for transport failures, which must not be read as "not a carrier".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Verification::NotFound(nf) if nf.error.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shape() {
        let json = serde_json::to_value(Verification::NotFound(NotFound::new(
            "MC123456".to_string(),
            String::new(),
        )))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "found": false,
                "active": false,
                "legalName": "",
                "mcNumber": "MC123456",
                "dotNumber": ""
            })
        );
    }

    #[test]
    fn test_unavailable_carries_error() {
        let v = Verification::NotFound(
            NotFound::default().with_error("SAFER request timed out after 12s"),
        );
        assert!(v.is_unavailable());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["error"], "SAFER request timed out after 12s");
    }

    #[test]
    fn test_record_keys_are_camel_case_and_never_null() {
        let json = serde_json::to_value(CarrierRecord::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "legalName",
            "oosDate",
            "physicalAddress",
            "cargoCarried",
            "vehicleOosRate",
            "injCrash",
            "safetyReviewType",
            "mcs150FormDate",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert!(obj.values().all(|v| !v.is_null()));
        assert_eq!(json["physicalAddress"]["zip"], "");
    }
}
