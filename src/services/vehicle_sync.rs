//! Sincronización best-effort con el registro de vehículos
//!
//! Se ejecuta después de persistir. Ningún fallo del registro llega al
//! llamador: se registra en el log y se descarta, sin reintentos.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{VehicleAvailability, VehicleRegistry};
use crate::services::status_transition::SideEffect;

#[derive(Clone)]
pub struct VehicleSync {
    registry: Arc<dyn VehicleRegistry>,
}

impl VehicleSync {
    pub fn new(registry: Arc<dyn VehicleRegistry>) -> Self {
        Self { registry }
    }

    /// Ids no positivos se rechazan sin llamar al registro. Si el registro no
    /// responde, se asume que el vehículo existe.
    pub async fn vehicle_exists(&self, vehicle_id: i64) -> bool {
        if vehicle_id <= 0 {
            warn!("⚠️ Invalid vehicle ID: {}", vehicle_id);
            return false;
        }

        match self.registry.exists(vehicle_id).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    "⚠️ Vehicle registry unavailable for vehicle {}: {}. Allowing operation to proceed",
                    vehicle_id, e
                );
                true
            }
        }
    }

    /// Ejecuta el efecto ya resuelto
    pub async fn apply(&self, effect: SideEffect) {
        let (vehicle_id, availability) = match effect {
            SideEffect::None => return,
            SideEffect::OccupyVehicle(id) => (id, VehicleAvailability::InMaintenance),
            SideEffect::ReleaseVehicle(id) => (id, VehicleAvailability::Available),
        };

        match self.registry.set_status(vehicle_id, availability).await {
            Ok(()) => info!(
                "🚗 Vehicle {} set to {}",
                vehicle_id,
                availability.as_str()
            ),
            Err(e) => warn!(
                "⚠️ Failed to set vehicle {} to {}: {}",
                vehicle_id,
                availability.as_str(),
                e
            ),
        }
    }
}
