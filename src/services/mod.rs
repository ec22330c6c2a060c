pub mod drivers;
pub mod ingest;
pub mod publisher;
pub mod resolver;

pub use drivers::{Driver, DriverDirectory, HttpDriverDirectory};
pub use ingest::{DriveStatePayload, IngestOutcome, TelemetryIngestService};
pub use publisher::{EventSink, KafkaEventSink, OutboxPublisher};
pub use resolver::ThermometerResolver;
