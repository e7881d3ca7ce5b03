//! Modelo de Maintenance
//!
//! Este módulo contiene el registro de mantenimiento y sus enumeraciones
//! (tipo, estado, prioridad). Los enums se guardan como TEXT en PostgreSQL
//! y se exponen en la API con los literales en mayúsculas.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::spare_part::SparePart;
use crate::utils::errors::AppError;

/// Tipo de mantenimiento - fijado al crear el registro
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    #[default]
    Preventive,
    Corrective,
    Accident,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "PREVENTIVE",
            MaintenanceType::Corrective => "CORRECTIVE",
            MaintenanceType::Accident => "ACCIDENT",
        }
    }
}

impl FromStr for MaintenanceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PREVENTIVE" => Ok(MaintenanceType::Preventive),
            "CORRECTIVE" => Ok(MaintenanceType::Corrective),
            "ACCIDENT" => Ok(MaintenanceType::Accident),
            other => Err(AppError::Validation(format!(
                "Invalid maintenance type '{}'. Valid values: PREVENTIVE, CORRECTIVE, ACCIDENT",
                other
            ))),
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado del mantenimiento - sólo lo modifica el motor de transiciones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub const ALL: [MaintenanceStatus; 4] = [
        MaintenanceStatus::Scheduled,
        MaintenanceStatus::InProgress,
        MaintenanceStatus::Completed,
        MaintenanceStatus::Cancelled,
    ];

    /// Estados que todavía ocupan el vehículo
    pub const OPEN: [MaintenanceStatus; 2] =
        [MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "SCHEDULED",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Completed => "COMPLETED",
            MaintenanceStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Completed | MaintenanceStatus::Cancelled)
    }

    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Grafo estricto de transiciones, sólo aplicado cuando
    /// `MaintenanceSettings::strict_transitions` está activo.
    /// Los estados abiertos pueden ir a cualquier estado; los terminales a ninguno.
    pub fn can_transition_to(&self, target: MaintenanceStatus) -> bool {
        match (self, target) {
            (MaintenanceStatus::Completed | MaintenanceStatus::Cancelled, _) => false,
            (MaintenanceStatus::Scheduled | MaintenanceStatus::InProgress, _) => true,
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaintenanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::InvalidStatus(format!(
                    "'{}'. Valid values: SCHEDULED, IN_PROGRESS, COMPLETED, CANCELLED",
                    s
                ))
            })
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prioridad del mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenancePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl MaintenancePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenancePriority::Low => "LOW",
            MaintenancePriority::Medium => "MEDIUM",
            MaintenancePriority::High => "HIGH",
            MaintenancePriority::Urgent => "URGENT",
        }
    }
}

impl FromStr for MaintenancePriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(MaintenancePriority::Low),
            "MEDIUM" => Ok(MaintenancePriority::Medium),
            "HIGH" => Ok(MaintenancePriority::High),
            "URGENT" => Ok(MaintenancePriority::Urgent),
            other => Err(AppError::Validation(format!(
                "Invalid priority '{}'. Valid values: LOW, MEDIUM, HIGH, URGENT",
                other
            ))),
        }
    }
}

impl fmt::Display for MaintenancePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registro de mantenimiento - entidad principal del servicio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub vehicle_id: i64,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub priority: MaintenancePriority,
    pub scheduled_date: DateTime<Utc>,
    /// Se fija al completar; nunca se borra después
    pub completed_date: Option<DateTime<Utc>>,
    pub estimated_cost: Decimal,
    pub actual_cost: Option<Decimal>,
    pub current_mileage: i32,
    pub description: String,
    pub mechanic_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub spare_parts: Vec<SparePart>,
}

impl MaintenanceRecord {
    /// Costo base: el real si existe, si no el estimado
    pub fn base_cost(&self) -> Decimal {
        self.actual_cost.unwrap_or(self.estimated_cost)
    }

    /// Repuestos añadidos en memoria que todavía no tienen id en el store
    pub fn unsaved_parts(&self) -> impl Iterator<Item = &SparePart> {
        self.spare_parts.iter().filter(|part| part.id.is_none())
    }
}

/// Datos para insertar un nuevo registro (el store asigna id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenance {
    pub vehicle_id: i64,
    pub maintenance_type: MaintenanceType,
    pub priority: MaintenancePriority,
    pub scheduled_date: DateTime<Utc>,
    pub estimated_cost: Decimal,
    pub current_mileage: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewMaintenance {
    /// Materializa el registro con el id asignado por el store, en estado SCHEDULED
    pub fn into_record(self, id: i64) -> MaintenanceRecord {
        MaintenanceRecord {
            id,
            vehicle_id: self.vehicle_id,
            maintenance_type: self.maintenance_type,
            status: MaintenanceStatus::Scheduled,
            priority: self.priority,
            scheduled_date: self.scheduled_date,
            completed_date: None,
            estimated_cost: self.estimated_cost,
            actual_cost: None,
            current_mileage: self.current_mileage,
            description: self.description,
            mechanic_notes: String::new(),
            created_at: self.created_at,
            updated_at: self.created_at,
            spare_parts: Vec::new(),
        }
    }
}
