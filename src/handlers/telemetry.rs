use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::{DriveStateKind, Truck};
use crate::services::{DriveStatePayload, IngestOutcome};

use super::AppState;

#[derive(Deserialize)]
pub struct TemperatureBody {
    pub hardware_sensor_id: String,
    pub value: f64,
    pub timestamp: i64,
}

#[derive(Deserialize)]
pub struct DriveStateBody {
    pub state: DriveStateKind,
    pub timestamp: i64,
    pub driver_card_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OdometerBody {
    pub timestamp: i64,
    pub odometer_reading: i64,
}

#[derive(Deserialize)]
pub struct LocationBody {
    pub latitude: f64,
    pub longitude: f64,
    pub heading: f64,
    pub speed: Option<f64>,
    pub timestamp: i64,
}

pub async fn post_temperature(
    State(state): State<AppState>,
    Path(device_identifier): Path<String>,
    Json(body): Json<TemperatureBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let ts = parse_timestamp(body.timestamp)?;

    // Thermometers mount on trucks and towables alike.
    let (truck, towable) = match state.trackables.find_truck_by_imei(&device_identifier).await? {
        Some(truck) => (Some(truck), None),
        None => match state
            .trackables
            .find_towable_by_imei(&device_identifier)
            .await?
        {
            Some(towable) => (None, Some(towable)),
            None => {
                return Err(AppError::NotFound(format!(
                    "No vehicle provisioned with device identifier {}",
                    device_identifier
                )))
            }
        },
    };

    let thermometer = state
        .resolver
        .resolve(
            &body.hardware_sensor_id,
            &device_identifier,
            truck.as_ref(),
            towable.as_ref(),
        )
        .await?;

    let outcome = state
        .ingest
        .ingest_temperature(&thermometer, body.value, ts)
        .await?;

    Ok(outcome_response(&outcome))
}

pub async fn post_drive_state(
    State(state): State<AppState>,
    Path(device_identifier): Path<String>,
    Json(body): Json<DriveStateBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let ts = parse_timestamp(body.timestamp)?;
    let truck = find_truck(&state, &device_identifier).await?;

    let outcome = state
        .ingest
        .ingest_drive_state(
            &truck,
            DriveStatePayload {
                state: body.state,
                ts,
                driver_card_id: body.driver_card_id,
            },
        )
        .await?;

    Ok(outcome_response(&outcome))
}

pub async fn post_odometer(
    State(state): State<AppState>,
    Path(device_identifier): Path<String>,
    Json(body): Json<OdometerBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let ts = parse_timestamp(body.timestamp)?;
    let truck = find_truck(&state, &device_identifier).await?;

    let outcome = state
        .ingest
        .ingest_odometer(&truck, body.odometer_reading, ts)
        .await?;

    Ok(outcome_response(&outcome))
}

pub async fn post_location(
    State(state): State<AppState>,
    Path(device_identifier): Path<String>,
    Json(body): Json<LocationBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let ts = parse_timestamp(body.timestamp)?;
    let truck = find_truck(&state, &device_identifier).await?;

    let location_outcome = state
        .ingest
        .ingest_location(&truck, ts, body.latitude, body.longitude, body.heading)
        .await?;

    let mut created = location_outcome.is_created();
    if let Some(speed) = body.speed {
        let speed_outcome = state.ingest.ingest_speed(&truck, ts, speed).await?;
        created = created || speed_outcome.is_created();
    }

    if created {
        Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
    } else {
        Ok((StatusCode::OK, Json(json!({ "status": "duplicate" }))))
    }
}

async fn find_truck(state: &AppState, device_identifier: &str) -> Result<Truck> {
    state
        .trackables
        .find_truck_by_imei(device_identifier)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No truck provisioned with device identifier {}",
                device_identifier
            ))
        })
}

fn parse_timestamp(epoch_seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(epoch_seconds, 0)
        .ok_or_else(|| AppError::Validation(format!("Unrepresentable timestamp: {}", epoch_seconds)))
}

fn outcome_response<T>(outcome: &IngestOutcome<T>) -> (StatusCode, Json<Value>) {
    match outcome {
        IngestOutcome::Created(_) => (StatusCode::CREATED, Json(json!({ "status": "created" }))),
        IngestOutcome::Duplicate(_) => (StatusCode::OK, Json(json!({ "status": "duplicate" }))),
        IngestOutcome::Suppressed => (StatusCode::OK, Json(json!({ "status": "suppressed" }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_epoch_seconds() {
        let ts = parse_timestamp(1_700_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_timestamp_rejects_unrepresentable_value() {
        assert!(parse_timestamp(i64::MAX).is_err());
    }
}
