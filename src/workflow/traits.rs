//! Collaborators the workflow controller is constructed with.
//!
//! The controller only talks to storage and to the user through these
//! traits, so tests can substitute in-memory mocks.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db;
use crate::model::GeolocationRecord;

/// CRUD access to stored geolocations.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All records in store order.
    async fn list_all(&self) -> sqlx::Result<Vec<GeolocationRecord>>;

    /// Persist a new record and return the ID the store assigned.
    async fn add(&self, record: &GeolocationRecord) -> sqlx::Result<i64>;

    /// Overwrite every field but the ID. Missing IDs are ignored.
    async fn update(&self, record: &GeolocationRecord) -> sqlx::Result<()>;

    /// Remove a record. Missing IDs are ignored.
    async fn delete(&self, id: i64) -> sqlx::Result<()>;
}

/// Asks the user a yes/no question.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

// The pool hands out one connection per call, so it's safe to share.
#[async_trait]
impl RecordRepository for SqlitePool {
    async fn list_all(&self) -> sqlx::Result<Vec<GeolocationRecord>> {
        db::get_all_geolocations(self).await
    }

    async fn add(&self, record: &GeolocationRecord) -> sqlx::Result<i64> {
        db::insert_geolocation(self, record).await
    }

    async fn update(&self, record: &GeolocationRecord) -> sqlx::Result<()> {
        if !db::update_geolocation(self, record).await? {
            tracing::debug!("Update skipped, no geolocation with id {}", record.id);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> sqlx::Result<()> {
        if !db::delete_geolocation(self, id).await? {
            tracing::debug!("Delete skipped, no geolocation with id {}", id);
        }
        Ok(())
    }
}

/// Mock collaborators for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Pauses a mock call until the test lets it continue.
    ///
    /// The mock signals `entered` when the call starts and waits on
    /// `release`, so a test can inspect the controller mid-operation.
    #[derive(Default)]
    pub struct Hold {
        pub entered: Notify,
        pub release: Notify,
    }

    impl Hold {
        async fn pause(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    /// In-memory repository.
    #[derive(Default)]
    pub struct MockRepository {
        pub records: Mutex<Vec<GeolocationRecord>>,
        next_id: AtomicUsize,
        pub add_calls: AtomicUsize,
        pub update_calls: AtomicUsize,
        pub delete_calls: AtomicUsize,
        /// Every call fails when set
        pub fail: bool,
        /// Pause `list_all` and `add` when set
        pub hold: Option<Arc<Hold>>,
    }

    impl MockRepository {
        /// Repository pre-filled with records (IDs assigned 1, 2, ...).
        pub fn with_records(records: Vec<GeolocationRecord>) -> Self {
            let repo = Self::default();
            for mut record in records {
                record.id = repo.next_id();
                repo.records.lock().push(record);
            }
            repo
        }

        /// Repository where every call fails.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        /// Repository whose reads and inserts wait on `hold`.
        pub fn held(hold: Arc<Hold>) -> Self {
            Self {
                hold: Some(hold),
                ..Default::default()
            }
        }

        pub fn add_count(&self) -> usize {
            self.add_calls.load(Ordering::SeqCst)
        }

        fn next_id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1
        }

        fn check(&self) -> sqlx::Result<()> {
            if self.fail {
                return Err(sqlx::Error::PoolClosed);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RecordRepository for MockRepository {
        async fn list_all(&self) -> sqlx::Result<Vec<GeolocationRecord>> {
            if let Some(ref hold) = self.hold {
                hold.pause().await;
            }
            self.check()?;
            Ok(self.records.lock().clone())
        }

        async fn add(&self, record: &GeolocationRecord) -> sqlx::Result<i64> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ref hold) = self.hold {
                hold.pause().await;
            }
            self.check()?;
            let id = self.next_id();
            self.records.lock().push(GeolocationRecord {
                id,
                ..record.clone()
            });
            Ok(id)
        }

        async fn update(&self, record: &GeolocationRecord) -> sqlx::Result<()> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            if let Some(stored) = self.records.lock().iter_mut().find(|r| r.id == record.id) {
                stored.overwrite_from(record);
            }
            Ok(())
        }

        async fn delete(&self, id: i64) -> sqlx::Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.records.lock().retain(|r| r.id != id);
            Ok(())
        }
    }

    /// Prompt with a fixed answer that counts how often it was asked.
    #[derive(Default)]
    pub struct MockPrompt {
        pub answer: bool,
        pub asked: AtomicUsize,
    }

    impl MockPrompt {
        pub fn yes() -> Self {
            Self {
                answer: true,
                ..Default::default()
            }
        }

        pub fn no() -> Self {
            Self::default()
        }

        pub fn times_asked(&self) -> usize {
            self.asked.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfirmPrompt for MockPrompt {
        async fn confirm(&self, _title: &str, _message: &str) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }
}
