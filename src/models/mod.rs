//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio del servicio de mantenimiento.
//! El mapeo a filas SQL vive en `repositories`.

pub mod maintenance;
pub mod spare_part;

pub use maintenance::{
    MaintenancePriority, MaintenanceRecord, MaintenanceStatus, MaintenanceType, NewMaintenance,
};
pub use spare_part::{NewSparePart, SparePart};
