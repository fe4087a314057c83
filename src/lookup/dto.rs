//! ipstack API Data Transfer Objects
//!
//! These types match what the ipstack standard lookup endpoint returns.
//! Only the fields we read are declared; serde ignores the rest.
//! DO NOT use these types outside the lookup module - convert to domain types.
//!
//! API Reference: https://ipstack.com/documentation
//!
//! Example success response:
//! ```json
//! {
//!   "ip": "134.201.250.155",
//!   "type": "ipv4",
//!   "country_name": "United States",
//!   "region_name": "California",
//!   "city": "Los Angeles",
//!   "latitude": 34.0453,
//!   "longitude": -118.2413
//! }
//! ```
//!
//! Example error response:
//! ```json
//! {
//!   "success": false,
//!   "error": { "code": 101, "type": "invalid_access_key", "info": "..." }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level lookup response (success or error share one shape)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LookupResponse {
    pub ip: Option<String>,
    pub country_name: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Present only on failure
    pub error: Option<ApiError>,
}

/// Error object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiError {
    /// Documented as a number, but seen as a string too
    pub code: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub info: Option<String>,
}

impl ApiError {
    /// The error code as text, whatever JSON type it arrived as.
    pub fn code_str(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_or_number() {
        let numeric: LookupResponse =
            serde_json::from_str(r#"{"error":{"code":101,"type":"invalid_access_key"}}"#).unwrap();
        let text: LookupResponse =
            serde_json::from_str(r#"{"error":{"code":"101","type":"invalid_access_key"}}"#).unwrap();

        assert_eq!(numeric.error.unwrap().code_str().as_deref(), Some("101"));
        assert_eq!(text.error.unwrap().code_str().as_deref(), Some("101"));
    }

    #[test]
    fn test_nulls_and_unknown_fields() {
        let response: LookupResponse = serde_json::from_str(
            r#"{"ip":"10.0.0.1","type":"ipv4","city":null,"latitude":null,"location":{"capital":"x"}}"#,
        )
        .unwrap();
        assert_eq!(response.ip.as_deref(), Some("10.0.0.1"));
        assert!(response.city.is_none());
        assert!(response.latitude.is_none());
        assert!(response.error.is_none());
    }
}
