use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health, telemetry, thermometers, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/vehicles/:device_identifier/temperature",
            post(telemetry::post_temperature),
        )
        .route(
            "/api/v1/vehicles/:device_identifier/drive-state",
            post(telemetry::post_drive_state),
        )
        .route(
            "/api/v1/vehicles/:device_identifier/odometer",
            post(telemetry::post_odometer),
        )
        .route(
            "/api/v1/vehicles/:device_identifier/location",
            post(telemetry::post_location),
        )
        .route("/api/v1/thermometers", get(thermometers::list))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
