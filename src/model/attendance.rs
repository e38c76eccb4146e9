use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest id the store will ever hand out.
pub const MAX_RECORD_ID: i64 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: String,
    pub username: String,
    pub checkin_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_time: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn open(id: i64, user_id: &str, username: &str, checkin_time: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            username: username.to_string(),
            checkin_time,
            checkout_time: None,
        }
    }
}

/// Id that follows `highest`, or `None` once the id space is used up.
/// An empty store starts at 1.
pub fn next_record_id(highest: Option<i64>) -> Option<i64> {
    let next = highest.map_or(1, |h| h.max(0).saturating_add(1));
    (next <= MAX_RECORD_ID).then_some(next)
}
