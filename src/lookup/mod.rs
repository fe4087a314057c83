//! Geolocation lookup - resolves IP addresses and hostnames via ipstack.
//!
//! # Architecture
//!
//! Same split as the rest of the crate's external integrations:
//! - **Domain** (`domain.rs`) - error taxonomy and key-probe outcome
//! - **DTOs** (`dto.rs`) - exact API response shape
//! - **Adapter** (`adapter.rs`) - converts DTOs to [`GeolocationRecord`](crate::model::GeolocationRecord)
//! - **Client** (`client.rs`) - the HTTP client
//! - **Traits** (`traits.rs`) - the seam the workflow depends on
//!
//! # Usage
//!
//! ```ignore
//! use track_my_ip::lookup::{GeolocationLookup, IpStackClient};
//!
//! let client = IpStackClient::new("your-access-key");
//! let record = client.fetch("134.201.250.155").await?;
//! println!("{}", record);
//! ```

mod adapter;
mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::IpStackClient;
pub use domain::{KeyStatus, LookupError, PROBE_QUERY};
pub use traits::GeolocationLookup;
