use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::DriverServiceConfig;
use crate::error::{AppError, Result};

/// A driver as known by the external driver identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct Driver {
    pub id: String,
    pub display_name: Option<String>,
}

/// Lookup of the driver currently holding a driver card.
#[async_trait]
pub trait DriverDirectory: Send + Sync {
    async fn find_by_card_id(&self, driver_card_id: &str) -> Result<Option<Driver>>;
}

/// Production directory backed by the driver identity service's HTTP API.
/// The request timeout is deliberately short: drive-state ingestion must not
/// stall behind a slow upstream.
pub struct HttpDriverDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDriverDirectory {
    pub fn new(config: &DriverServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to build driver service client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl DriverDirectory for HttpDriverDirectory {
    async fn find_by_card_id(&self, driver_card_id: &str) -> Result<Option<Driver>> {
        let url = format!("{}/v1/driverCards/{}", self.base_url, driver_card_id);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Driver service request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Driver service returned {}",
                response.status()
            )));
        }

        // The service answers with zero or one driver for a card.
        let drivers: Vec<Driver> = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Driver service response: {}", e)))?;

        Ok(drivers.into_iter().next())
    }
}
