//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y reglas de negocio del servicio.

pub mod database;
pub mod environment;
pub mod maintenance;

pub use database::DatabaseConfig;
pub use environment::*;
pub use maintenance::MaintenanceSettings;
