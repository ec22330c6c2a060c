use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if connected { "ok" } else { "degraded" },
            "database": { "connected": connected },
        })),
    )
}
