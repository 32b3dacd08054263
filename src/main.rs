mod clients;
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use clients::{GcsObjectStore, OpenCageGeocoder};
use db::{PgDeviceStore, PgJourneyStore};
use services::{DeviceService, JourneyService};

#[derive(Clone)]
pub struct AppState {
    pub devices: DeviceService,
    pub journeys: JourneyService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::devices::register_device,
        routes::devices::list_devices,
        routes::devices::get_device,
        routes::devices::delete_device,
        routes::devices::update_background,
        routes::devices::update_url,
        routes::devices::remaining_copies,
        routes::users::start_journey,
        routes::users::select_frame,
        routes::users::select_number,
    ),
    components(schemas(
        error::ApiError,
        models::device::Device,
        models::device::DeviceLocation,
        models::device::RegisterDeviceRequest,
        models::device::UpdateUrlRequest,
        models::device::BackgroundUpload,
        models::device::DeviceEnvelope,
        models::device::UpdatedFields,
        models::device::BackgroundUpdateResponse,
        models::device::RemainingCopiesResponse,
        models::journey::Journey,
        models::journey::StartJourneyRequest,
        models::journey::SelectFrameRequest,
        models::journey::SelectNumberRequest,
        models::journey::JourneyEnvelope,
    )),
    tags(
        (name = "Devices", description = "Device registration, media and status"),
        (name = "Users", description = "Customer journey at a device")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("device_registry_server=debug,tower_http=debug")),
        )
        .init();

    let config = config::Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./src/db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let cors = if config.cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(tower_http::cors::Any)
    };

    let device_store = Arc::new(PgDeviceStore::new(pool.clone()));
    let geocoder = Arc::new(OpenCageGeocoder::new(
        &config.geocoder_base_url,
        &config.open_cage_api_key,
    ));
    let objects = Arc::new(GcsObjectStore::new(
        &config.storage_base_url,
        &config.storage_bucket,
        &config.storage_access_token,
    ));

    let state = AppState {
        devices: DeviceService::new(device_store.clone(), geocoder, objects),
        journeys: JourneyService::new(Arc::new(PgJourneyStore::new(pool)), device_store),
    };

    let app = routes::api_router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", config.listen_addr);
    tracing::info!("Swagger UI at http://{}/docs/", config.listen_addr);
    axum::serve(listener, app).await.expect("Server error");
}
