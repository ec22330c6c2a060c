use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub kafka: KafkaConfig,
    pub driver_service: DriverServiceConfig,
    pub outbox: OutboxConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub work_event_topic: String,
}

#[derive(Debug, Clone)]
pub struct DriverServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct OutboxConfig {
    pub poll_interval_secs: u64,
    pub batch_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let kafka_brokers =
            env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());

        let work_event_topic =
            env::var("WORK_EVENT_TOPIC").unwrap_or_else(|_| "fleet-work-events".to_string());

        let driver_service_url =
            env::var("DRIVER_SERVICE_URL").context("DRIVER_SERVICE_URL must be set")?;

        let driver_service_api_key = env::var("DRIVER_SERVICE_API_KEY").ok();

        let driver_service_timeout_ms = env::var("DRIVER_SERVICE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        let poll_interval_secs = env::var("OUTBOX_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let batch_size = env::var("OUTBOX_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Config {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            kafka: KafkaConfig {
                brokers: kafka_brokers,
                work_event_topic,
            },
            driver_service: DriverServiceConfig {
                base_url: driver_service_url,
                api_key: driver_service_api_key,
                timeout_ms: driver_service_timeout_ms,
            },
            outbox: OutboxConfig {
                poll_interval_secs,
                batch_size,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
