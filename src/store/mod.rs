//! Persistence boundary for attendance records.
//!
//! The service only talks to [`RecordStore`]; the concrete backends are the
//! MySQL collection used in production and an in-process document collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;

pub mod memory;
pub mod mysql;

pub use memory::MemoryRecordStore;
pub use mysql::MySqlRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not decode record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage call timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Allocates the next sequential id and inserts an open record under it
    /// as one atomic step. Returns `None` when the id space is exhausted, in
    /// which case nothing is written.
    async fn insert_next(
        &self,
        user_id: &str,
        username: &str,
        checkin_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Sets `checkout_time` on the record with `id` and returns the record
    /// as it reads after the update.
    async fn set_checkout(
        &self,
        id: i64,
        checkout_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Most recent check-in for `user_id`; equal check-in times resolve to the higher id.
    async fn find_latest_by_user(&self, user_id: &str) -> StoreResult<Option<AttendanceRecord>>;

    /// Every stored record, each decoded on its own.
    async fn find_all(&self) -> StoreResult<Vec<StoreResult<AttendanceRecord>>>;
}
