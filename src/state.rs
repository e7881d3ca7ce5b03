//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::clients::VehicleRegistry;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::MaintenanceStore;
use crate::services::MaintenanceService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub maintenance: Arc<MaintenanceService>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn MaintenanceStore>,
        registry: Arc<dyn VehicleRegistry>,
    ) -> Self {
        let maintenance = MaintenanceService::new(store, registry, config.maintenance.clone());
        Self {
            config,
            maintenance: Arc::new(maintenance),
        }
    }
}
