use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Thermometer;

use super::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub include_archived: Option<bool>,
}

#[derive(Serialize)]
pub struct ThermometerListResponse {
    pub thermometers: Vec<Thermometer>,
    pub total: usize,
}

/// Back-office view of the mount history. Active records only by default;
/// `include_archived=true` returns the full closed-interval history.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ThermometerListResponse>> {
    let thermometers = state
        .thermometers
        .find_all(params.include_archived.unwrap_or(false))
        .await?;

    let total = thermometers.len();
    Ok(Json(ThermometerListResponse { thermometers, total }))
}
