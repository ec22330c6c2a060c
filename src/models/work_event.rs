use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::telemetry::DriveStateKind;

/// Work-event taxonomy consumed by downstream working-time systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkEventType {
    Drive,
    OtherWork,
    Break,
    Unknown,
}

impl From<DriveStateKind> for WorkEventType {
    fn from(state: DriveStateKind) -> Self {
        match state {
            DriveStateKind::Drive => WorkEventType::Drive,
            DriveStateKind::Work => WorkEventType::OtherWork,
            DriveStateKind::Rest => WorkEventType::Break,
            _ => WorkEventType::Unknown,
        }
    }
}

/// Message published for each genuinely new drive state with a resolved
/// driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkEventMessage {
    pub driver_id: String,
    pub work_event_type: WorkEventType,
    pub time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_event_type_mapping() {
        assert_eq!(WorkEventType::from(DriveStateKind::Drive), WorkEventType::Drive);
        assert_eq!(WorkEventType::from(DriveStateKind::Work), WorkEventType::OtherWork);
        assert_eq!(WorkEventType::from(DriveStateKind::Rest), WorkEventType::Break);
        assert_eq!(
            WorkEventType::from(DriveStateKind::DriverAvailable),
            WorkEventType::Unknown
        );
        assert_eq!(WorkEventType::from(DriveStateKind::Error), WorkEventType::Unknown);
        assert_eq!(
            WorkEventType::from(DriveStateKind::NotAvailable),
            WorkEventType::Unknown
        );
        assert_eq!(WorkEventType::from(DriveStateKind::Unknown), WorkEventType::Unknown);
    }

    #[test]
    fn test_work_event_message_wire_format() {
        let message = WorkEventMessage {
            driver_id: "driver-1".to_string(),
            work_event_type: WorkEventType::OtherWork,
            time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["driver_id"], "driver-1");
        assert_eq!(value["work_event_type"], "OTHER_WORK");
    }
}
