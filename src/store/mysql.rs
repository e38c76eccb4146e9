use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use futures_util::StreamExt;
use sqlx::{FromRow, MySqlPool};

use super::{RecordStore, StoreResult};
use crate::model::attendance::{AttendanceRecord, next_record_id};

/// Key of the counter row that tracks the highest assigned record id.
pub const RECORD_COUNTER: &str = "attendance_records";

pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn insert_next(
        &self,
        user_id: &str,
        username: &str,
        checkin_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        // DATETIME(6) keeps microseconds; the returned record must match a later read
        let checkin_time = checkin_time.trunc_subsecs(6);
        let mut tx = self.pool.begin().await?;

        // row lock serializes concurrent check-ins until commit
        let highest = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT value
            FROM id_counters
            WHERE name = ?
            FOR UPDATE
            "#,
        )
        .bind(RECORD_COUNTER)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = next_record_id(highest) else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO id_counters (name, value)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE value = VALUES(value)
            "#,
        )
        .bind(RECORD_COUNTER)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO attendance_records (id, user_id, username, checkin_time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(username)
        .bind(checkin_time)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(AttendanceRecord::open(id, user_id, username, checkin_time)))
    }

    async fn set_checkout(
        &self,
        id: i64,
        checkout_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let checkout_time = checkout_time.trunc_subsecs(6);
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, user_id, username, checkin_time, checkout_time
            FROM attendance_records
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut record) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE attendance_records
            SET checkout_time = ?
            WHERE id = ?
            "#,
        )
        .bind(checkout_time)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        record.checkout_time = Some(checkout_time);
        Ok(Some(record))
    }

    async fn find_latest_by_user(&self, user_id: &str) -> StoreResult<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, user_id, username, checkin_time, checkout_time
            FROM attendance_records
            WHERE user_id = ?
            ORDER BY checkin_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_all(&self) -> StoreResult<Vec<StoreResult<AttendanceRecord>>> {
        let mut stream = sqlx::query(
            r#"
            SELECT id, user_id, username, checkin_time, checkout_time
            FROM attendance_records
            ORDER BY id
            "#,
        )
        .fetch(&self.pool);

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await {
            // a failed fetch ends the cursor; a row that fails to decode does not
            let row = row?;
            rows.push(AttendanceRecord::from_row(&row).map_err(Into::into));
        }

        Ok(rows)
    }
}
