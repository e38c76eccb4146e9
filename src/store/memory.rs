use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{RecordStore, StoreResult};
use crate::model::attendance::{AttendanceRecord, next_record_id};

/// In-process document collection. Records are kept as JSON documents so a
/// listing decodes each one separately, the same way rows come back from MySQL.
#[derive(Default)]
pub struct MemoryRecordStore {
    documents: Mutex<Vec<Value>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    /// Stores a raw document as-is, bypassing id allocation.
    #[cfg(test)]
    pub async fn insert_document(&self, document: Value) {
        self.documents.lock().await.push(document);
    }
}

fn document_id(document: &Value) -> Option<i64> {
    document.get("id").and_then(Value::as_i64)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_next(
        &self,
        user_id: &str,
        username: &str,
        checkin_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        // held across read-max and push so two check-ins never share an id
        let mut documents = self.documents.lock().await;

        let highest = documents.iter().filter_map(document_id).max();
        let Some(id) = next_record_id(highest) else {
            return Ok(None);
        };

        let record = AttendanceRecord::open(id, user_id, username, checkin_time);
        documents.push(serde_json::to_value(&record)?);
        Ok(Some(record))
    }

    async fn set_checkout(
        &self,
        id: i64,
        checkout_time: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let mut documents = self.documents.lock().await;

        let Some(slot) = documents.iter_mut().find(|d| document_id(d) == Some(id)) else {
            return Ok(None);
        };

        let mut record: AttendanceRecord = serde_json::from_value(slot.clone())?;
        record.checkout_time = Some(checkout_time);
        *slot = serde_json::to_value(&record)?;
        Ok(Some(record))
    }

    async fn find_latest_by_user(&self, user_id: &str) -> StoreResult<Option<AttendanceRecord>> {
        let documents = self.documents.lock().await;

        let mut latest: Option<AttendanceRecord> = None;
        for document in documents
            .iter()
            .filter(|d| d.get("user_id").and_then(Value::as_str) == Some(user_id))
        {
            let record: AttendanceRecord = serde_json::from_value(document.clone())?;
            let newer = latest.as_ref().is_none_or(|current| {
                (record.checkin_time, record.id) > (current.checkin_time, current.id)
            });
            if newer {
                latest = Some(record);
            }
        }
        Ok(latest)
    }

    async fn find_all(&self) -> StoreResult<Vec<StoreResult<AttendanceRecord>>> {
        let documents = self.documents.lock().await;

        Ok(documents
            .iter()
            .map(|d| serde_json::from_value(d.clone()).map_err(Into::into))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    #[actix_web::test]
    async fn ids_are_sequential() {
        let store = MemoryRecordStore::new();
        for expected in 1..=3 {
            let record = store.insert_next("u", "n", at(9)).await.unwrap().unwrap();
            assert_eq!(record.id, expected);
        }
        assert_eq!(store.len().await, 3);
    }

    #[actix_web::test]
    async fn allocation_follows_highest_existing_id() {
        let store = MemoryRecordStore::new();
        store
            .insert_document(json!({
                "id": 41,
                "user_id": "old",
                "username": "Imported",
                "checkin_time": "2024-01-01T00:00:00Z"
            }))
            .await;

        let record = store.insert_next("u", "n", at(9)).await.unwrap().unwrap();
        assert_eq!(record.id, 42);
    }

    #[actix_web::test]
    async fn set_checkout_on_missing_id_is_none() {
        let store = MemoryRecordStore::new();
        assert!(store.set_checkout(5, at(17)).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn set_checkout_persists() {
        let store = MemoryRecordStore::new();
        store.insert_next("u1", "Alice", at(9)).await.unwrap();

        store.set_checkout(1, at(17)).await.unwrap();

        let listed = store.find_all().await.unwrap();
        let record = listed.into_iter().next().unwrap().unwrap();
        assert_eq!(record.checkout_time, Some(at(17)));
    }

    #[actix_web::test]
    async fn latest_prefers_newest_checkin_then_higher_id() {
        let store = MemoryRecordStore::new();
        store.insert_next("u1", "Alice", at(12)).await.unwrap();
        store.insert_next("u1", "Alice", at(8)).await.unwrap();
        store.insert_next("u2", "Bob", at(20)).await.unwrap();

        let latest = store.find_latest_by_user("u1").await.unwrap().unwrap();
        assert_eq!(latest.id, 1);

        store.insert_next("u1", "Alice", at(12)).await.unwrap();
        let latest = store.find_latest_by_user("u1").await.unwrap().unwrap();
        assert_eq!(latest.id, 4);
    }

    #[actix_web::test]
    async fn latest_for_unknown_user_is_none() {
        let store = MemoryRecordStore::new();
        store.insert_next("u1", "Alice", at(9)).await.unwrap();
        assert!(store.find_latest_by_user("nobody").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn find_all_reports_bad_documents_individually() {
        let store = MemoryRecordStore::new();
        store.insert_next("u1", "Alice", at(9)).await.unwrap();
        store
            .insert_document(json!({ "id": 2, "user_id": "u2", "checkin_time": 17 }))
            .await;
        store
            .insert_next("u3", "Carol", at(9) + Duration::minutes(5))
            .await
            .unwrap();

        let rows = store.find_all().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        assert!(rows[1].is_err());
        assert_eq!(rows[2].as_ref().unwrap().id, 3);
    }
}
