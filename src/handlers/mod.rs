pub mod health;
pub mod telemetry;
pub mod thermometers;

use std::sync::Arc;

use crate::db::DbPool;
use crate::repositories::{ThermometerRepository, TrackablesRepository};
use crate::services::{TelemetryIngestService, ThermometerResolver};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub trackables: TrackablesRepository,
    pub thermometers: ThermometerRepository,
    pub resolver: Arc<ThermometerResolver>,
    pub ingest: Arc<TelemetryIngestService>,
}
