use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::clock::Clock;
use crate::error::AttendanceError;
use crate::model::attendance::{AttendanceRecord, MAX_RECORD_ID};
use crate::store::{RecordStore, StoreError, StoreResult};

/// Check-in, check-out and lookups over a [`RecordStore`].
///
/// Every store call is bounded by `store_timeout`; an expired call is dropped
/// and reported as [`AttendanceError::Internal`]. Nothing is retried.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, store_timeout: Duration) -> Self {
        Self {
            store,
            clock,
            store_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = StoreResult<T>>,
    ) -> Result<T, AttendanceError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout.into()),
        }
    }

    #[instrument(name = "attendance_check_in", skip(self))]
    pub async fn check_in(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let now = self.clock.now();

        let record = self
            .bounded(self.store.insert_next(user_id, username, now))
            .await?
            .ok_or_else(|| {
                warn!("Record id space exhausted");
                AttendanceError::ResourceExhausted(format!(
                    "Cannot create new record, maximum ID of {MAX_RECORD_ID} reached"
                ))
            })?;

        info!(record_id = record.id, "User checked in");
        Ok(record)
    }

    #[instrument(name = "attendance_check_out", skip(self))]
    pub async fn check_out(&self, record_id: &str) -> Result<AttendanceRecord, AttendanceError> {
        let parsed: u64 = record_id
            .parse()
            .map_err(|_| AttendanceError::InvalidArgument("Invalid record ID format".into()))?;

        // anything past i64::MAX cannot have been assigned
        let not_found = || AttendanceError::NotFound("Record not found".into());
        let id = i64::try_from(parsed).map_err(|_| not_found())?;

        let now = self.clock.now();
        let record = self
            .bounded(self.store.set_checkout(id, now))
            .await?
            .ok_or_else(not_found)?;

        info!(record_id = record.id, "User checked out");
        Ok(record)
    }

    #[instrument(name = "attendance_latest_for_user", skip(self))]
    pub async fn latest_for_user(&self, user_id: &str) -> Result<AttendanceRecord, AttendanceError> {
        self.bounded(self.store.find_latest_by_user(user_id))
            .await?
            .ok_or_else(|| AttendanceError::NotFound("No records found for this user".into()))
    }

    #[instrument(name = "attendance_list_all", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let rows = self.bounded(self.store.find_all()).await?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "Error decoding record");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, returned = records.len(), "Listing skipped undecodable records");
        }

        Ok(records)
    }
}
