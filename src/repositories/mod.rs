pub mod drive_state;
pub mod location;
pub mod odometer;
pub mod outbox;
pub mod temperature;
pub mod thermometers;
pub mod trackables;

pub use drive_state::DriveStateRepository;
pub use location::LocationRepository;
pub use odometer::OdometerRepository;
pub use outbox::{OutboxEntry, OutboxRepository};
pub use temperature::TemperatureRepository;
pub use thermometers::ThermometerRepository;
pub use trackables::TrackablesRepository;
