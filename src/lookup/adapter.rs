//! Adapter layer: Convert ipstack DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If ipstack changes their response format, only this file and dto.rs
//! need to change.

use super::domain::{ERROR_CODE_INVALID_KEY, ERROR_CODE_INVALID_QUERY, LookupError};
use super::dto;
use crate::model::GeolocationRecord;

/// Convert an ipstack response into a record, or the error it reports.
///
/// Missing string fields become empty strings, missing coordinates `0.0`.
pub fn to_record(response: dto::LookupResponse) -> Result<GeolocationRecord, LookupError> {
    if let Some(error) = response.error {
        return Err(to_error(error));
    }

    Ok(GeolocationRecord {
        id: 0,
        ip: response.ip.unwrap_or_default(),
        country: response.country_name.unwrap_or_default(),
        region: response.region_name.unwrap_or_default(),
        city: response.city.unwrap_or_default(),
        latitude: response.latitude.unwrap_or(0.0),
        longitude: response.longitude.unwrap_or(0.0),
    })
}

/// Map an API error object to a [`LookupError`]
fn to_error(error: dto::ApiError) -> LookupError {
    let code = error.code_str();
    match code.as_deref() {
        Some(ERROR_CODE_INVALID_KEY) => LookupError::InvalidApiKey,
        Some(ERROR_CODE_INVALID_QUERY) => LookupError::InvalidQuery,
        _ => LookupError::Api {
            code: code.unwrap_or_else(|| "unknown".to_string()),
            info: error
                .info
                .or(error.error_type)
                .unwrap_or_else(|| "Unknown error".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> dto::LookupResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_successful_response() {
        let record = to_record(parse(
            r#"{"ip":"1.2.3.4","country_name":"X","region_name":"Y","city":"Z","latitude":1.5,"longitude":-2.5}"#,
        ))
        .unwrap();

        assert_eq!(record.id, 0);
        assert_eq!(record.ip, "1.2.3.4");
        assert_eq!(record.country, "X");
        assert_eq!(record.region, "Y");
        assert_eq!(record.city, "Z");
        assert_eq!(record.latitude, 1.5);
        assert_eq!(record.longitude, -2.5);
    }

    #[test]
    fn test_missing_fields_default() {
        let record = to_record(parse("{}")).unwrap();
        assert_eq!(record, GeolocationRecord::default());
    }

    #[test]
    fn test_known_error_codes() {
        assert_eq!(
            to_record(parse(r#"{"error":{"code":"101"}}"#)),
            Err(LookupError::InvalidApiKey)
        );
        assert_eq!(
            to_record(parse(r#"{"success":false,"error":{"code":106,"type":"invalid_ip_address"}}"#)),
            Err(LookupError::InvalidQuery)
        );
    }

    #[test]
    fn test_unknown_error_code_keeps_info() {
        let err = to_record(parse(
            r#"{"error":{"code":104,"type":"usage_limit_reached","info":"Monthly limit reached"}}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            LookupError::Api {
                code: "104".to_string(),
                info: "Monthly limit reached".to_string()
            }
        );
    }

    #[test]
    fn test_error_without_code() {
        let err = to_record(parse(r#"{"error":{"type":"oops"}}"#)).unwrap_err();
        assert_eq!(
            err,
            LookupError::Api {
                code: "unknown".to_string(),
                info: "oops".to_string()
            }
        );
    }
}
