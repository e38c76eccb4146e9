use crate::api::attendance;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.service(
        web::scope(api_prefix).service(
            web::scope("/attendance")
                // /attendance
                .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                // fixed paths first, /{user_id} would otherwise swallow them
                .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
                .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
                // /attendance/{user_id}
                .service(
                    web::resource("/{user_id}").route(web::get().to(attendance::get_attendance)),
                ),
        ),
    );
}

// CHECK-IN
//  └─ POST /attendance/checkin  {user_id, username}  -> record #N (N <= 999)

// CHECK-OUT
//  └─ POST /attendance/checkout {record_id}          -> record with checkout_time

// LOOKUP
//  ├─ GET /attendance/{user_id}  -> latest record by checkin_time
//  └─ GET /attendance            -> every record
