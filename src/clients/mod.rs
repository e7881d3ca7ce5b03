//! Clients - HTTP Clients for External APIs
//!
//! This module contains the client for the vehicle registry and the
//! trait the maintenance service depends on.

pub mod vehicle_registry_client;

use async_trait::async_trait;
use thiserror::Error;

pub use vehicle_registry_client::HttpVehicleRegistry;

/// Fallos de transporte del registro. Nunca cruzan la frontera del servicio.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vehicle registry answered {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Vehicle registry unavailable: {0}")]
    Unavailable(String),
}

/// Disponibilidad del vehículo tal como la entiende el registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleAvailability {
    InMaintenance,
    Available,
}

impl VehicleAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleAvailability::InMaintenance => "MAINTENANCE",
            VehicleAvailability::Available => "DISPONIBLE",
        }
    }
}

#[async_trait]
pub trait VehicleRegistry: Send + Sync {
    /// Sonda de existencia del vehículo
    async fn exists(&self, vehicle_id: i64) -> Result<bool, RegistryError>;

    /// Empuja el nuevo estado de disponibilidad
    async fn set_status(
        &self,
        vehicle_id: i64,
        status: VehicleAvailability,
    ) -> Result<(), RegistryError>;
}
