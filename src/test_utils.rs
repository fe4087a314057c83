//! Test utilities and fixtures for track-my-ip tests.
//!
//! This module provides common test helpers, mock factories, and
//! database utilities to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use track_my_ip::test_utils::{temp_db, mock_record};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let record = mock_record();
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::model::GeolocationRecord;

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// # Returns
///
/// A tuple of (connection pool, temp directory handle).
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Creates an unsaved mock record with sensible defaults.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let custom = GeolocationRecord {
///     city: "Gdansk".to_string(),
///     ..mock_record()
/// };
/// ```
pub fn mock_record() -> GeolocationRecord {
    GeolocationRecord {
        id: 0,
        ip: "134.201.250.155".to_string(),
        country: "United States".to_string(),
        region: "California".to_string(),
        city: "Los Angeles".to_string(),
        latitude: 34.0453,
        longitude: -118.2413,
    }
}

/// Creates an unsaved mock record for the given IP address.
pub fn mock_record_with_ip(ip: &str) -> GeolocationRecord {
    GeolocationRecord {
        ip: ip.to_string(),
        ..mock_record()
    }
}

/// Inserts a mock record into the database and returns its ID.
pub async fn insert_mock_record(pool: &SqlitePool, ip: &str) -> i64 {
    crate::db::insert_geolocation(pool, &mock_record_with_ip(ip))
        .await
        .expect("Failed to insert geolocation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;

        let records = crate::db::get_all_geolocations(&pool).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_insert_mock_record() {
        let (pool, _dir) = temp_db().await;

        let id = insert_mock_record(&pool, "8.8.4.4").await;
        assert!(id > 0);

        let records = crate::db::get_all_geolocations(&pool).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ip, "8.8.4.4");
    }

    #[test]
    fn test_mock_record_defaults() {
        let record = mock_record();
        assert_eq!(record.id, 0);
        assert_eq!(record.city, "Los Angeles");
        assert_eq!(mock_record_with_ip("1.2.3.4").ip, "1.2.3.4");
    }
}
