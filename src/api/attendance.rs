use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;
use crate::model::attendance::AttendanceRecord;
use crate::service::AttendanceService;
use crate::utils::display_time::DisplayZone;

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "u1")]
    pub user_id: String,
    #[schema(example = "Alice")]
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = "1")]
    pub record_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecordResponse {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "u1")]
    pub user_id: String,
    #[schema(example = "Alice")]
    pub username: String,
    #[schema(example = "2025-06-02 09:15:10 IST")]
    pub checkin_time: String,
    /// Empty while the record is still open.
    #[schema(example = "2025-06-02 18:02:44 IST")]
    pub checkout_time: String,
    #[schema(example = "User checked in successfully.")]
    pub status_message: String,
}

impl AttendanceRecordResponse {
    fn render(record: &AttendanceRecord, zone: &DisplayZone, status_message: &str) -> Self {
        Self {
            id: record.id.to_string(),
            user_id: record.user_id.clone(),
            username: record.username.clone(),
            checkin_time: zone.format(&record.checkin_time),
            checkout_time: zone.format_opt(record.checkout_time.as_ref()),
            status_message: status_message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecordResponse>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/v1/attendance/checkin",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceRecordResponse),
        (status = 429, description = "Record id space exhausted", body = Object, example = json!({
            "code": "RESOURCE_EXHAUSTED",
            "message": "Cannot create new record, maximum ID of 999 reached"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    service: web::Data<AttendanceService>,
    zone: web::Data<DisplayZone>,
    payload: web::Json<CheckInRequest>,
) -> Result<impl Responder, AttendanceError> {
    let record = service.check_in(&payload.user_id, &payload.username).await?;

    Ok(HttpResponse::Ok().json(AttendanceRecordResponse::render(
        &record,
        &zone,
        "User checked in successfully.",
    )))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/v1/attendance/checkout",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecordResponse),
        (status = 400, description = "Record id is not a number", body = Object, example = json!({
            "code": "INVALID_ARGUMENT",
            "message": "Invalid record ID format"
        })),
        (status = 404, description = "No record with this id", body = Object, example = json!({
            "code": "NOT_FOUND",
            "message": "Record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    service: web::Data<AttendanceService>,
    zone: web::Data<DisplayZone>,
    payload: web::Json<CheckOutRequest>,
) -> Result<impl Responder, AttendanceError> {
    let record = service.check_out(&payload.record_id).await?;

    Ok(HttpResponse::Ok().json(AttendanceRecordResponse::render(
        &record,
        &zone,
        "User checked out successfully.",
    )))
}

/// Latest record for a user
#[utoipa::path(
    get,
    path = "/v1/attendance/{user_id}",
    params(
        ("user_id", description = "User whose most recent check-in is returned")
    ),
    responses(
        (status = 200, body = AttendanceRecordResponse),
        (status = 404, description = "No records found for this user"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    service: web::Data<AttendanceService>,
    zone: web::Data<DisplayZone>,
    path: web::Path<String>,
) -> Result<impl Responder, AttendanceError> {
    let user_id = path.into_inner();
    let record = service.latest_for_user(&user_id).await?;

    Ok(HttpResponse::Ok().json(AttendanceRecordResponse::render(
        &record,
        &zone,
        "Record found.",
    )))
}

/// All records
#[utoipa::path(
    get,
    path = "/v1/attendance",
    responses(
        (status = 200, body = AttendanceListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<AttendanceService>,
    zone: web::Data<DisplayZone>,
) -> Result<impl Responder, AttendanceError> {
    let records = service
        .list_all()
        .await?
        .iter()
        .map(|r| AttendanceRecordResponse::render(r, &zone, "Record retrieved."))
        .collect();

    Ok(HttpResponse::Ok().json(AttendanceListResponse { records }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SystemClock;
    use crate::store::MemoryRecordStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn app_data() -> (web::Data<AttendanceService>, web::Data<DisplayZone>) {
        let service = AttendanceService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(SystemClock),
            Duration::from_secs(5),
        );
        (web::Data::new(service), web::Data::new(DisplayZone::ist()))
    }

    macro_rules! attendance_app {
        () => {{
            let (service, zone) = app_data();
            test::init_service(
                App::new()
                    .app_data(service)
                    .app_data(zone)
                    .configure(|cfg| crate::routes::configure(cfg, "/v1")),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn check_in_returns_formatted_record() {
        let app = attendance_app!();

        let req = test::TestRequest::post()
            .uri("/v1/attendance/checkin")
            .set_json(json!({ "user_id": "u1", "username": "Alice" }))
            .to_request();
        let body: AttendanceRecordResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.id, "1");
        assert_eq!(body.user_id, "u1");
        assert_eq!(body.username, "Alice");
        assert!(body.checkin_time.ends_with(" IST"));
        assert_eq!(body.checkout_time, "");
        assert_eq!(body.status_message, "User checked in successfully.");
    }

    #[actix_web::test]
    async fn check_out_flow_over_http() {
        let app = attendance_app!();

        let req = test::TestRequest::post()
            .uri("/v1/attendance/checkin")
            .set_json(json!({ "user_id": "u1", "username": "Alice" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/v1/attendance/checkout")
            .set_json(json!({ "record_id": "1" }))
            .to_request();
        let body: AttendanceRecordResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.checkout_time.ends_with(" IST"));
        assert_eq!(body.status_message, "User checked out successfully.");

        let req = test::TestRequest::get().uri("/v1/attendance/u1").to_request();
        let body: AttendanceRecordResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.id, "1");
        assert!(!body.checkout_time.is_empty());
        assert_eq!(body.status_message, "Record found.");
    }

    #[actix_web::test]
    async fn malformed_record_id_is_bad_request() {
        let app = attendance_app!();

        let req = test::TestRequest::post()
            .uri("/v1/attendance/checkout")
            .set_json(json!({ "record_id": "abc" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[actix_web::test]
    async fn unknown_record_and_user_are_not_found() {
        let app = attendance_app!();

        let req = test::TestRequest::post()
            .uri("/v1/attendance/checkout")
            .set_json(json!({ "record_id": "7" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/v1/attendance/ghost").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn fixed_paths_are_not_user_lookups() {
        let app = attendance_app!();

        let req = test::TestRequest::get().uri("/v1/attendance/checkin").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn listing_returns_every_record() {
        let app = attendance_app!();

        let req = test::TestRequest::get().uri("/v1/attendance").to_request();
        let body: AttendanceListResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.records.is_empty());

        for (user, name) in [("u1", "Alice"), ("u2", "Bob")] {
            let req = test::TestRequest::post()
                .uri("/v1/attendance/checkin")
                .set_json(json!({ "user_id": user, "username": name }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/v1/attendance").to_request();
        let body: AttendanceListResponse = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = body.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(body.records.iter().all(|r| r.status_message == "Record retrieved."));
    }
}
