//! Database module for geolocation persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! Every operation checks a connection out of the pool, runs a single
//! auto-committed statement and returns, so writes are durable as soon as
//! the call completes.
//!
//! # Example
//!
//! ```ignore
//! use track_my_ip::db::{init_db, get_all_geolocations};
//!
//! let pool = init_db("sqlite:TrackMyIP.db").await?;
//! let records = get_all_geolocations(&pool).await?;
//! ```

use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::model::GeolocationRecord;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "TrackMyIP.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!("Database ready at {}", db_url);
    Ok(pool)
}

/// Open the database at `path` (or the default file), attaching context on failure.
pub async fn open(path: Option<&Path>) -> Result<SqlitePool> {
    let url = db_url(path);
    init_db(&url)
        .await
        .with_context(format!("opening database {}", url))
}

/// Point a pool at `path` without connecting, creating or migrating anything.
///
/// For commands that only need a repository handle and never touch the
/// store. The file is not created if it doesn't exist.
pub fn open_lazy(path: Option<&Path>) -> Result<SqlitePool> {
    let url = db_url(path);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_lazy(&url)
        .with_context(format!("opening database {}", url))
}

/// Get all stored geolocations in insertion (ID) order.
pub async fn get_all_geolocations(pool: &SqlitePool) -> sqlx::Result<Vec<GeolocationRecord>> {
    sqlx::query_as::<_, GeolocationRecord>(
        "SELECT id, ip, country, region, city, latitude, longitude FROM geolocations ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Get a geolocation by its database ID.
pub async fn get_geolocation_by_id(
    pool: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<GeolocationRecord>> {
    sqlx::query_as::<_, GeolocationRecord>(
        "SELECT id, ip, country, region, city, latitude, longitude FROM geolocations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find all stored geolocations with exactly this IP (case-sensitive).
pub async fn find_by_ip(pool: &SqlitePool, ip: &str) -> sqlx::Result<Vec<GeolocationRecord>> {
    sqlx::query_as::<_, GeolocationRecord>(
        "SELECT id, ip, country, region, city, latitude, longitude FROM geolocations WHERE ip = ? ORDER BY id",
    )
    .bind(ip)
    .fetch_all(pool)
    .await
}

/// Insert a new geolocation.
///
/// The record's own `id` is ignored; the store assigns one.
///
/// # Returns
///
/// The database ID of the inserted row.
pub async fn insert_geolocation(
    pool: &SqlitePool,
    record: &GeolocationRecord,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO geolocations (ip, country, region, city, latitude, longitude)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.ip)
    .bind(&record.country)
    .bind(&record.region)
    .bind(&record.city)
    .bind(record.latitude)
    .bind(record.longitude)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite every field except the ID of an existing geolocation.
///
/// # Returns
///
/// `true` if a row was updated, `false` if no row has that ID.
pub async fn update_geolocation(
    pool: &SqlitePool,
    record: &GeolocationRecord,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE geolocations
        SET ip = ?, country = ?, region = ?, city = ?, latitude = ?, longitude = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.ip)
    .bind(&record.country)
    .bind(&record.region)
    .bind(&record.city)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a geolocation by ID.
///
/// # Returns
///
/// `true` if a row was removed, `false` if no row has that ID.
pub async fn delete_geolocation(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM geolocations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_mock_record, mock_record, mock_record_with_ip, temp_db};

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite:{}", db_path.display());

        let pool = init_db(&db_url).await.expect("Failed to init db");
        assert!(db_path.exists());

        let records = get_all_geolocations(&pool)
            .await
            .expect("Failed to query geolocations");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_open_reports_context_on_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        // Parent directory doesn't exist, so the file can't be created
        let path = temp_dir.path().join("missing").join("geo.db");
        let err = open(Some(&path)).await.unwrap_err();
        assert!(err.to_string().contains("opening database"));
    }

    #[test]
    fn test_db_url_default_and_custom() {
        assert_eq!(db_url(None), "sqlite:TrackMyIP.db");
        assert_eq!(
            db_url(Some(Path::new("/tmp/geo.db"))),
            "sqlite:/tmp/geo.db"
        );
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let (pool, _dir) = temp_db().await;

        let id1 = insert_geolocation(&pool, &mock_record_with_ip("1.1.1.1"))
            .await
            .unwrap();
        let id2 = insert_geolocation(&pool, &mock_record_with_ip("2.2.2.2"))
            .await
            .unwrap();
        assert!(id1 > 0);
        assert!(id2 > id1);

        let all = get_all_geolocations(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, id1);
        assert_eq!(all[1].ip, "2.2.2.2");
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields_but_id() {
        let (pool, _dir) = temp_db().await;
        let id = insert_geolocation(&pool, &mock_record()).await.unwrap();

        let edited = GeolocationRecord {
            id,
            ip: "9.9.9.9".to_string(),
            country: "Switzerland".to_string(),
            region: "Zurich".to_string(),
            city: "Zurich".to_string(),
            latitude: 47.37,
            longitude: 8.54,
        };
        assert!(update_geolocation(&pool, &edited).await.unwrap());

        let stored = get_geolocation_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored, edited);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let (pool, _dir) = temp_db().await;
        insert_geolocation(&pool, &mock_record()).await.unwrap();

        let ghost = GeolocationRecord {
            id: 4242,
            ..mock_record()
        };
        assert!(!update_geolocation(&pool, &ghost).await.unwrap());
        assert_eq!(get_all_geolocations(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_delete_unknown() {
        let (pool, _dir) = temp_db().await;
        let id = insert_geolocation(&pool, &mock_record()).await.unwrap();

        assert!(delete_geolocation(&pool, id).await.unwrap());
        assert!(get_geolocation_by_id(&pool, id).await.unwrap().is_none());

        // Second delete finds nothing, but is not an error
        assert!(!delete_geolocation(&pool, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_ip_is_case_sensitive() {
        let (pool, _dir) = temp_db().await;
        insert_mock_record(&pool, "example.com").await;

        assert_eq!(find_by_ip(&pool, "example.com").await.unwrap().len(), 1);
        assert!(find_by_ip(&pool, "EXAMPLE.COM").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_lazy_leaves_missing_file_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("never.db");

        let pool = open_lazy(Some(&db_path)).unwrap();
        drop(pool);

        assert!(!db_path.exists());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("durable.db");
        let url = format!("sqlite:{}", db_path.display());

        let pool = init_db(&url).await.unwrap();
        let id = insert_geolocation(&pool, &mock_record()).await.unwrap();
        pool.close().await;

        let reopened = init_db(&url).await.unwrap();
        let stored = get_geolocation_by_id(&reopened, id).await.unwrap();
        assert!(stored.is_some());
    }
}
