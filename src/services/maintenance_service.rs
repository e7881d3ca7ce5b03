//! Servicio de mantenimiento
//!
//! Fachada de las operaciones públicas: valida la entrada, delega en el motor
//! de transiciones y en el cálculo de costos, persiste, y al final notifica
//! al registro de vehículos en modo best-effort.
//!
//! No hay control de concurrencia sobre un mismo registro: dos
//! actualizaciones simultáneas se resuelven por "última escritura gana".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use validator::Validate;

use crate::clients::VehicleRegistry;
use crate::config::MaintenanceSettings;
use crate::dto::{
    ConditionReport, MaintenanceDto, MaintenanceReport, MaintenanceRequest, MaintenanceResponse,
    RepairRequest, RepairResponse, SparePartDto,
};
use crate::models::{
    MaintenancePriority, MaintenanceRecord, MaintenanceStatus, MaintenanceType, NewMaintenance,
};
use crate::repositories::MaintenanceStore;
use crate::services::cost_calculator;
use crate::services::report_builder;
use crate::services::spare_part_ledger::SparePartLedger;
use crate::services::status_transition::{SideEffect, StatusTransitionEngine, Transition};
use crate::services::vehicle_sync::VehicleSync;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{check_field, validate_date_range, validate_money};

const INSPECTION_PREFIX: &str = "Issues found during inspection: ";
const MAX_DESCRIPTION_LEN: usize = 500;

pub struct MaintenanceService {
    store: Arc<dyn MaintenanceStore>,
    vehicle_sync: VehicleSync,
    engine: StatusTransitionEngine,
    settings: MaintenanceSettings,
}

impl MaintenanceService {
    pub fn new(
        store: Arc<dyn MaintenanceStore>,
        registry: Arc<dyn VehicleRegistry>,
        settings: MaintenanceSettings,
    ) -> Self {
        Self {
            store,
            vehicle_sync: VehicleSync::new(registry),
            engine: StatusTransitionEngine::new(settings.strict_transitions),
            settings,
        }
    }

    /// Programa un mantenimiento nuevo en estado SCHEDULED
    pub async fn schedule_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> AppResult<MaintenanceResponse> {
        request.validate()?;
        check_field("estimated_cost", validate_money(request.estimated_cost))?;

        let now = Utc::now();
        if request.scheduled_date < now - self.settings.schedule_grace {
            return Err(AppError::Validation(
                "scheduled_date cannot be in the past".to_string(),
            ));
        }

        self.ensure_vehicle_exists(request.vehicle_id).await?;

        let record = self
            .store
            .insert(NewMaintenance {
                vehicle_id: request.vehicle_id,
                maintenance_type: request.maintenance_type,
                priority: request.priority,
                scheduled_date: request.scheduled_date,
                estimated_cost: request.estimated_cost,
                current_mileage: request.current_mileage,
                description: request.description,
                created_at: now,
            })
            .await?;

        self.vehicle_sync
            .apply(SideEffect::OccupyVehicle(record.vehicle_id))
            .await;

        info!(
            "🔧 Maintenance scheduled for vehicle {}, ID: {}",
            record.vehicle_id, record.id
        );
        Ok(MaintenanceResponse::from(&record))
    }

    /// Cambio de estado genérico (permisivo salvo configuración estricta)
    pub async fn update_status(&self, id: i64, status: &str) -> AppResult<MaintenanceResponse> {
        let record = self.load(id).await?;
        let transition = self.engine.transition(record, status, Utc::now())?;
        let saved = self.commit(transition).await?;

        info!("🔄 Maintenance {} status updated to {}", id, saved.status);
        Ok(MaintenanceResponse::from(&saved))
    }

    /// Registra la reparación: notas, costo real, repuestos y cierre del registro
    pub async fn record_repair(&self, request: RepairRequest) -> AppResult<RepairResponse> {
        request.validate()?;
        check_field("actual_cost", validate_money(request.actual_cost))?;

        let mut record = self.load(request.maintenance_id).await?;
        let now = Utc::now();

        record.mechanic_notes = request.mechanic_notes;
        record.actual_cost = Some(request.actual_cost);
        for part in request.spare_parts {
            SparePartLedger::add_part(&mut record, part.into(), now)?;
        }

        let transition = self.engine.complete(record, now, now);
        let saved = self.commit(transition).await?;

        info!(
            "🔧 Repair recorded for maintenance {} ({} spare parts)",
            saved.id,
            saved.spare_parts.len()
        );

        Ok(RepairResponse {
            maintenance_id: saved.id,
            status: saved.status,
            total_cost: cost_calculator::total_cost(&saved)?,
            completed_date: saved.completed_date,
            spare_parts: saved.spare_parts.iter().map(SparePartDto::from).collect(),
        })
    }

    /// Procesa un reporte de inspección. Si hay problemas, programa un
    /// correctivo de prioridad HIGH; si no, no hace nada.
    pub async fn update_vehicle_condition(
        &self,
        report: ConditionReport,
    ) -> AppResult<Option<MaintenanceResponse>> {
        report.validate()?;
        self.ensure_vehicle_exists(report.vehicle_id).await?;

        let issues: Vec<&str> = report
            .issues_found
            .iter()
            .map(|issue| issue.trim())
            .filter(|issue| !issue.is_empty())
            .collect();

        if issues.is_empty() {
            info!("✅ Vehicle {} inspected, no issues found", report.vehicle_id);
            return Ok(None);
        }

        let now = Utc::now();
        let description: String = format!("{}{}", INSPECTION_PREFIX, issues.join(", "))
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();

        let record = self
            .store
            .insert(NewMaintenance {
                vehicle_id: report.vehicle_id,
                maintenance_type: MaintenanceType::Corrective,
                priority: MaintenancePriority::High,
                scheduled_date: now + self.settings.corrective_lead_time,
                estimated_cost: Decimal::ZERO,
                current_mileage: report.current_mileage,
                description,
                created_at: now,
            })
            .await?;

        info!(
            "🛠️ Corrective maintenance {} scheduled for vehicle {}",
            record.id, record.vehicle_id
        );
        Ok(Some(MaintenanceResponse::from(&record)))
    }

    pub async fn calculate_cost(&self, id: i64) -> AppResult<Decimal> {
        let record = self.load(id).await?;
        cost_calculator::total_cost(&record)
    }

    pub async fn generate_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<MaintenanceReport> {
        check_field("end", validate_date_range(start, end))?;

        let records = self.store.find_scheduled_between(start, end).await?;
        let report = report_builder::build_report(start, end, &records, Utc::now())?;

        info!(
            "📊 Maintenance report generated for period {} to {}",
            start.to_rfc3339(),
            end.to_rfc3339()
        );
        Ok(report)
    }

    pub async fn get_maintenance_history(
        &self,
        vehicle_id: i64,
    ) -> AppResult<Vec<MaintenanceResponse>> {
        if vehicle_id <= 0 {
            return Err(AppError::Validation(format!(
                "vehicle_id must be positive, got {}",
                vehicle_id
            )));
        }

        let records = self.store.find_by_vehicle(vehicle_id).await?;
        Ok(records.iter().map(MaintenanceResponse::from).collect())
    }

    pub async fn get_upcoming_maintenances(&self) -> AppResult<Vec<MaintenanceResponse>> {
        let records = self.store.find_by_statuses(&MaintenanceStatus::OPEN).await?;
        Ok(records.iter().map(MaintenanceResponse::from).collect())
    }

    pub async fn get_maintenance_by_id(&self, id: i64) -> AppResult<MaintenanceResponse> {
        let record = self.load(id).await?;
        Ok(MaintenanceResponse::from(&record))
    }

    pub async fn cancel_maintenance(&self, id: i64, reason: &str) -> AppResult<MaintenanceResponse> {
        let record = self.load(id).await?;
        let transition = self.engine.cancel(record, reason, Utc::now())?;
        let saved = self.commit(transition).await?;

        info!("🚫 Maintenance {} cancelled. Reason: {}", id, reason.trim());
        Ok(MaintenanceResponse::from(&saved))
    }

    /// Legacy: crear mantenimiento con valores por defecto
    pub async fn create_maintenance(
        &self,
        vehicle_id: i64,
        maintenance_type: Option<&str>,
        description: Option<String>,
        scheduled_date: DateTime<Utc>,
    ) -> AppResult<MaintenanceDto> {
        let maintenance_type = match maintenance_type {
            Some(raw) => raw.parse()?,
            None => MaintenanceType::Preventive,
        };

        self.schedule_maintenance(MaintenanceRequest {
            vehicle_id,
            maintenance_type,
            scheduled_date,
            description: description.unwrap_or_default(),
            priority: MaintenancePriority::Medium,
            estimated_cost: Decimal::ZERO,
            current_mileage: 0,
        })
        .await
    }

    /// Legacy: cerrar mantenimiento con una fecha de fin explícita
    pub async fn close_maintenance(
        &self,
        id: i64,
        date_fin: DateTime<Utc>,
    ) -> AppResult<MaintenanceDto> {
        let record = self.load(id).await?;
        let transition = self.engine.complete(record, date_fin, Utc::now());
        let saved = self.commit(transition).await?;

        info!("🔒 Maintenance {} closed (legacy)", id);
        Ok(MaintenanceResponse::from(&saved))
    }

    async fn load(&self, id: i64) -> AppResult<MaintenanceRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance", id))
    }

    async fn ensure_vehicle_exists(&self, vehicle_id: i64) -> AppResult<()> {
        if self.vehicle_sync.vehicle_exists(vehicle_id).await {
            Ok(())
        } else {
            Err(AppError::VehicleNotFound(vehicle_id))
        }
    }

    /// Persiste la transición y después ejecuta su efecto. El estado local
    /// ya está confirmado cuando se habla con el registro.
    async fn commit(&self, transition: Transition) -> AppResult<MaintenanceRecord> {
        let saved = self.store.update(&transition.record).await?;
        let effect = self.resolve(transition.side_effect, &saved).await;
        self.vehicle_sync.apply(effect).await;
        Ok(saved)
    }

    async fn resolve(&self, effect: SideEffect, record: &MaintenanceRecord) -> SideEffect {
        if !matches!(effect, SideEffect::ReleaseVehicle(_)) {
            return effect;
        }

        match self.store.has_other_open(record.vehicle_id, record.id).await {
            Ok(other_open) => effect.unless_vehicle_busy(other_open),
            Err(e) => {
                warn!(
                    "⚠️ Could not check open maintenances for vehicle {}: {}",
                    record.vehicle_id, e
                );
                SideEffect::None
            }
        }
    }
}
