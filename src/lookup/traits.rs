//! Trait definition for the geolocation lookup client.
//!
//! Lets the workflow take any lookup implementation, so tests can
//! substitute a mock for the real HTTP client.
//!
//! # Example
//!
//! ```ignore
//! use track_my_ip::lookup::GeolocationLookup;
//!
//! async fn locate(client: &dyn GeolocationLookup) -> Result<(), LookupError> {
//!     let record = client.fetch("8.8.8.8").await?;
//!     println!("{}", record);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use super::domain::{KeyStatus, LookupError, PROBE_QUERY};
use crate::model::GeolocationRecord;

/// A source of geolocation data for IP addresses and hostnames.
#[async_trait]
pub trait GeolocationLookup: Send + Sync {
    /// Look up a single IP address or hostname.
    async fn fetch(&self, query: &str) -> Result<GeolocationRecord, LookupError>;

    /// The API key lookups currently use.
    fn api_key(&self) -> String;

    /// Replace the API key used for subsequent lookups.
    fn set_api_key(&self, api_key: &str);

    /// Probe the API key with a fixed query.
    ///
    /// Transport failures are reported as [`KeyStatus::Unreachable`].
    async fn key_status(&self) -> KeyStatus {
        KeyStatus::from_probe(&self.fetch(PROBE_QUERY).await)
    }

    /// `true` only when the probe shows the key was accepted.
    ///
    /// Network failures count as invalid; use [`key_status`](Self::key_status)
    /// to tell them apart.
    async fn validate_api_key(&self) -> bool {
        self.key_status().await.is_valid()
    }
}

#[async_trait]
impl GeolocationLookup for super::client::IpStackClient {
    async fn fetch(&self, query: &str) -> Result<GeolocationRecord, LookupError> {
        self.fetch(query).await
    }

    fn api_key(&self) -> String {
        self.api_key()
    }

    fn set_api_key(&self, api_key: &str) {
        self.set_api_key(api_key)
    }
}
