//! Internal domain types for geolocation lookups.
//!
//! These types are OUR types - they don't change when the ipstack API changes.
//! API responses get converted into [`GeolocationRecord`](crate::model::GeolocationRecord)
//! or a [`LookupError`] by the adapter.

/// Fixed, always-resolvable query used to probe whether an API key works.
pub const PROBE_QUERY: &str = "www.google.pl";

/// ipstack error code for an invalid or missing access key.
pub const ERROR_CODE_INVALID_KEY: &str = "101";

/// ipstack error code for an address that can't be resolved.
pub const ERROR_CODE_INVALID_QUERY: &str = "106";

/// Errors that can occur during a lookup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid IP address / URL")]
    InvalidQuery,

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl LookupError {
    /// Transport-level failure (the API itself never answered).
    pub fn is_network(&self) -> bool {
        matches!(self, LookupError::Network(_))
    }
}

/// Outcome of probing the configured API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    /// The API accepted the key
    Valid,
    /// The API rejected the key, or none is configured
    Invalid,
    /// The API couldn't be reached or answered with something unexpected
    Unreachable(String),
}

impl KeyStatus {
    /// Classify the result of a probe lookup.
    ///
    /// Only an access-key error makes the key invalid. An unresolvable
    /// probe address still proves the key was accepted.
    pub fn from_probe<T>(result: &Result<T, LookupError>) -> Self {
        match result {
            Ok(_) | Err(LookupError::InvalidQuery) | Err(LookupError::Api { .. }) => {
                KeyStatus::Valid
            }
            Err(LookupError::InvalidApiKey) | Err(LookupError::MissingApiKey) => {
                KeyStatus::Invalid
            }
            Err(e) => KeyStatus::Unreachable(e.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, KeyStatus::Valid)
    }
}
