use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemperatureReading {
    pub id: i64,
    pub thermometer_id: i64,
    pub value: f64,
    pub ts: DateTime<Utc>,
}

/// Driver activity reported by the truck's tachograph. Stored as TEXT;
/// values the unit reports that we do not know map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveStateKind {
    Drive,
    Work,
    Rest,
    DriverAvailable,
    Error,
    NotAvailable,
    #[serde(other)]
    Unknown,
}

impl DriveStateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveStateKind::Drive => "DRIVE",
            DriveStateKind::Work => "WORK",
            DriveStateKind::Rest => "REST",
            DriveStateKind::DriverAvailable => "DRIVER_AVAILABLE",
            DriveStateKind::Error => "ERROR",
            DriveStateKind::NotAvailable => "NOT_AVAILABLE",
            DriveStateKind::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for DriveStateKind {
    fn from(s: &str) -> Self {
        match s {
            "DRIVE" => DriveStateKind::Drive,
            "WORK" => DriveStateKind::Work,
            "REST" => DriveStateKind::Rest,
            "DRIVER_AVAILABLE" => DriveStateKind::DriverAvailable,
            "ERROR" => DriveStateKind::Error,
            "NOT_AVAILABLE" => DriveStateKind::NotAvailable,
            _ => DriveStateKind::Unknown,
        }
    }
}

impl fmt::Display for DriveStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only tachograph state log entry. `driver_id` is resolved from
/// `driver_card_id` at ingestion time and frozen into the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckDriveState {
    pub id: i64,
    pub truck_id: i64,
    pub state: DriveStateKind,
    pub ts: DateTime<Utc>,
    pub driver_card_id: Option<String>,
    pub driver_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TruckOdometerReading {
    pub id: i64,
    pub truck_id: i64,
    pub ts: DateTime<Utc>,
    pub odometer_reading: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TruckLocation {
    pub id: i64,
    pub truck_id: i64,
    pub ts: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub heading: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TruckSpeed {
    pub id: i64,
    pub truck_id: i64,
    pub ts: DateTime<Utc>,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_state_kind_text_round_trip() {
        for kind in [
            DriveStateKind::Drive,
            DriveStateKind::Work,
            DriveStateKind::Rest,
            DriveStateKind::DriverAvailable,
            DriveStateKind::Error,
            DriveStateKind::NotAvailable,
            DriveStateKind::Unknown,
        ] {
            assert_eq!(DriveStateKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_drive_state_kind_unrecognized_text_maps_to_unknown() {
        assert_eq!(DriveStateKind::from("SLEEP"), DriveStateKind::Unknown);
        assert_eq!(DriveStateKind::from(""), DriveStateKind::Unknown);
    }

    #[test]
    fn test_drive_state_kind_wire_format() {
        let parsed: DriveStateKind = serde_json::from_str("\"DRIVER_AVAILABLE\"").unwrap();
        assert_eq!(parsed, DriveStateKind::DriverAvailable);

        let serialized = serde_json::to_string(&DriveStateKind::Rest).unwrap();
        assert_eq!(serialized, "\"REST\"");
    }

    #[test]
    fn test_drive_state_kind_unrecognized_wire_value_maps_to_unknown() {
        let parsed: DriveStateKind = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(parsed, DriveStateKind::Unknown);
    }
}
