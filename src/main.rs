use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::{Config, StoreBackend};
use db::{ensure_schema, init_db};

use crate::docs::ApiDoc;
use crate::service::{AttendanceService, SystemClock};
use crate::store::{MemoryRecordStore, MySqlRecordStore, RecordStore};
use crate::utils::display_time::DisplayZone;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance service is up"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, backend = ?config.store_backend, "Server starting...");

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::MySql => {
            let pool = init_db(
                &config.database_url,
                config.db_max_connections,
                config.store_timeout,
            )
            .await
            .context("Failed to connect to database")?;
            ensure_schema(&pool)
                .await
                .context("Failed to prepare attendance tables")?;
            Arc::new(MySqlRecordStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory record store; records are lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let service = AttendanceService::new(store, Arc::new(SystemClock), config.store_timeout);
    let zone = DisplayZone::ist();

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(service.clone()))
            .app_data(Data::new(zone))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
