//! Cliente HTTP para el registro de vehículos (car-service)
//!
//! `GET  {base}/api/vehicles/{id}`        → existencia
//! `PATCH {base}/api/vehicles/{id}/status` → disponibilidad `{"status": "..."}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::{RegistryError, VehicleAvailability, VehicleRegistry};
use crate::config::RegistryConfig;

#[derive(Debug, Serialize)]
struct StatusPayload<'a> {
    status: &'a str,
}

/// Cliente reqwest del registro de vehículos
#[derive(Clone)]
pub struct HttpVehicleRegistry {
    client: Client,
    base_url: String,
    exists_timeout: Duration,
    status_timeout: Duration,
}

impl HttpVehicleRegistry {
    /// Crear nuevo cliente con URL y timeouts configurables
    pub fn new(config: &RegistryConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.exists_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            exists_timeout: config.exists_timeout,
            status_timeout: config.status_timeout,
        })
    }

    fn vehicle_url(&self, vehicle_id: i64) -> String {
        format!("{}/api/vehicles/{}", self.base_url, vehicle_id)
    }
}

#[async_trait]
impl VehicleRegistry for HttpVehicleRegistry {
    async fn exists(&self, vehicle_id: i64) -> Result<bool, RegistryError> {
        let response = self
            .client
            .get(self.vehicle_url(vehicle_id))
            .timeout(self.exists_timeout)
            .send()
            .await?;

        let status = response.status();
        debug!("📡 Registro de vehículos GET {} → {}", vehicle_id, status);

        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND || status.is_client_error() {
            Ok(false)
        } else {
            Err(RegistryError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn set_status(
        &self,
        vehicle_id: i64,
        status: VehicleAvailability,
    ) -> Result<(), RegistryError> {
        let response = self
            .client
            .patch(format!("{}/status", self.vehicle_url(vehicle_id)))
            .timeout(self.status_timeout)
            .json(&StatusPayload { status: status.as_str() })
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            return Err(RegistryError::UnexpectedStatus {
                status: code.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        debug!("📡 Vehículo {} marcado como {}", vehicle_id, status.as_str());
        Ok(())
    }
}
