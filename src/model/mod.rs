//! Core data model for stored geolocations.
//!
//! Defines [`GeolocationRecord`], the single entity persisted by the
//! application. It derives SQLx's `FromRow` for database mapping.
//!
//! # Database Schema
//!
//! Maps to the `geolocations` table: one row per looked-up address, keyed by
//! an auto-assigned integer ID.

use std::fmt;

use sqlx::FromRow;

/// A geolocation lookup result for a single IP address or hostname.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct GeolocationRecord {
    /// Database ID (auto-generated, 0 until inserted)
    pub id: i64,
    /// IP address the lookup resolved to
    pub ip: String,
    /// Country name
    pub country: String,
    /// Region / state name
    pub region: String,
    /// City name
    pub city: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl GeolocationRecord {
    /// Copy every field except `id` from `other`.
    ///
    /// Used to apply an update to a cached record in place, so anything
    /// holding on to the cached entry sees the new values.
    pub fn overwrite_from(&mut self, other: &GeolocationRecord) {
        self.ip.clone_from(&other.ip);
        self.country.clone_from(&other.country);
        self.region.clone_from(&other.region);
        self.city.clone_from(&other.city);
        self.latitude = other.latitude;
        self.longitude = other.longitude;
    }
}

/// Renders as `city, region, country (lat, lon)`, skipping empty names.
impl fmt::Display for GeolocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let place = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let place = if place.is_empty() { "Unknown location" } else { place.as_str() };
        write!(f, "{} ({:.4}, {:.4})", place, self.latitude, self.longitude)
    }
}
