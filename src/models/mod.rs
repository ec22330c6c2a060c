pub mod telemetry;
pub mod thermometer;
pub mod trackable;
pub mod work_event;

pub use telemetry::{
    DriveStateKind, TemperatureReading, TruckDriveState, TruckLocation, TruckOdometerReading,
    TruckSpeed,
};
pub use thermometer::Thermometer;
pub use trackable::{Towable, Truck};
pub use work_event::{WorkEventMessage, WorkEventType};
