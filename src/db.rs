use std::time::Duration;

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::store::mysql::RECORD_COUNTER;

pub async fn init_db(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Creates the record and counter tables when they are missing. Existing
/// tables are left untouched.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id BIGINT NOT NULL PRIMARY KEY,
            user_id VARCHAR(255) NOT NULL,
            username VARCHAR(255) NOT NULL,
            checkin_time DATETIME(6) NOT NULL,
            checkout_time DATETIME(6) NULL,
            INDEX idx_attendance_user_checkin (user_id, checkin_time)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS id_counters (
            name VARCHAR(64) NOT NULL PRIMARY KEY,
            value BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // seed from existing rows so numbering continues after the highest id
    sqlx::query(
        r#"
        INSERT IGNORE INTO id_counters (name, value)
        SELECT ?, COALESCE(MAX(id), 0)
        FROM attendance_records
        "#,
    )
    .bind(RECORD_COUNTER)
    .execute(pool)
    .await?;

    Ok(())
}
