use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A truck in the fleet. `imei` is the device identifier of its telematics
/// unit, NULL until the unit has been provisioned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Truck {
    pub id: i64,
    pub imei: Option<String>,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
}

/// Towed equipment (trailer, dolly). Carries its own telematics unit and
/// device identifier, independent of any truck pulling it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Towable {
    pub id: i64,
    pub imei: Option<String>,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
}
