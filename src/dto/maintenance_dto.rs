use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    MaintenancePriority, MaintenanceRecord, MaintenanceStatus, MaintenanceType, NewSparePart,
    SparePart,
};

// Request para programar un mantenimiento
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MaintenanceRequest {
    pub vehicle_id: i64,

    #[serde(default)]
    pub maintenance_type: MaintenanceType,

    pub scheduled_date: DateTime<Utc>,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    #[serde(default)]
    pub priority: MaintenancePriority,

    #[serde(default)]
    pub estimated_cost: Decimal,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub current_mileage: i32,
}

// Request para cambiar el estado (el literal se valida en el motor)
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// Request para registrar una reparación
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RepairRequest {
    pub maintenance_id: i64,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub mechanic_notes: String,

    #[serde(default)]
    pub actual_cost: Decimal,

    #[serde(default)]
    pub spare_parts: Vec<SparePartRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparePartRequest {
    pub name: String,
    #[serde(default)]
    pub part_number: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl From<SparePartRequest> for NewSparePart {
    fn from(request: SparePartRequest) -> Self {
        Self {
            name: request.name,
            part_number: request.part_number,
            quantity: request.quantity,
            unit_price: request.unit_price,
        }
    }
}

// Reporte de inspección del vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConditionReport {
    pub vehicle_id: i64,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub current_mileage: i32,

    /// EXCELLENT, GOOD, FAIR, POOR
    #[serde(default)]
    pub general_condition: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub issues_found: Vec<String>,

    #[serde(default = "Utc::now")]
    pub inspection_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// Requests legacy (compatibilidad con los clientes SOAP antiguos)
#[derive(Debug, Deserialize)]
pub struct LegacyCreateRequest {
    pub vehicle_id: i64,
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyCloseRequest {
    pub date_fin: DateTime<Utc>,
}

// Response de repuesto
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparePartDto {
    pub id: Option<i64>,
    pub maintenance_id: i64,
    pub name: String,
    pub part_number: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&SparePart> for SparePartDto {
    fn from(part: &SparePart) -> Self {
        Self {
            id: part.id,
            maintenance_id: part.maintenance_id,
            name: part.name.clone(),
            part_number: part.part_number.clone(),
            quantity: part.quantity,
            unit_price: part.unit_price,
            total_price: part.total_price,
            created_at: part.created_at,
        }
    }
}

// Response de mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceResponse {
    pub id: i64,
    pub vehicle_id: i64,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub status: MaintenanceStatus,
    pub estimated_cost: Decimal,
    pub actual_cost: Option<Decimal>,
    pub current_mileage: i32,
    pub description: String,
    pub mechanic_notes: String,
    pub priority: MaintenancePriority,
    pub spare_parts: Vec<SparePartDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&MaintenanceRecord> for MaintenanceResponse {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            vehicle_id: record.vehicle_id,
            maintenance_type: record.maintenance_type,
            scheduled_date: record.scheduled_date,
            completed_date: record.completed_date,
            status: record.status,
            estimated_cost: record.estimated_cost,
            actual_cost: record.actual_cost,
            current_mileage: record.current_mileage,
            description: record.description.clone(),
            mechanic_notes: record.mechanic_notes.clone(),
            priority: record.priority,
            spare_parts: record.spare_parts.iter().map(SparePartDto::from).collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// El DTO legacy tiene exactamente la misma forma que la respuesta actual
pub type MaintenanceDto = MaintenanceResponse;

// Response de reparación
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairResponse {
    pub maintenance_id: i64,
    pub status: MaintenanceStatus,
    pub total_cost: Decimal,
    pub completed_date: Option<DateTime<Utc>>,
    pub spare_parts: Vec<SparePartDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostResponse {
    pub maintenance_id: i64,
    pub total_cost: Decimal,
}

// Reporte por rango de fechas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub generated_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_maintenances: usize,
    pub completed_maintenances: usize,
    pub pending_maintenances: usize,
    pub total_cost: Decimal,
    pub entries: Vec<MaintenanceReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceReportEntry {
    pub maintenance_id: i64,
    pub vehicle_id: i64,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub status: MaintenanceStatus,
    pub cost: Decimal,
    pub priority: MaintenancePriority,
}
