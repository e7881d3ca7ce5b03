//! Reportes de mantenimiento por rango de fechas

use chrono::{DateTime, Utc};

use crate::dto::{MaintenanceReport, MaintenanceReportEntry};
use crate::models::MaintenanceRecord;
use crate::services::cost_calculator::{self, CostSummary};
use crate::utils::errors::AppResult;
use crate::utils::validation::{check_field, validate_date_range};

/// Construye el reporte de los registros con `scheduled_date` en `[start, end]`
pub fn build_report(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    records: &[MaintenanceRecord],
    generated_at: DateTime<Utc>,
) -> AppResult<MaintenanceReport> {
    check_field("end", validate_date_range(start, end))?;

    let in_range: Vec<&MaintenanceRecord> = records
        .iter()
        .filter(|record| record.scheduled_date >= start && record.scheduled_date <= end)
        .collect();

    let CostSummary {
        count,
        completed_count,
        pending_count,
        total_cost,
    } = cost_calculator::aggregate(in_range.iter().copied())?;

    let entries = in_range
        .into_iter()
        .map(|record| -> AppResult<MaintenanceReportEntry> {
            Ok(MaintenanceReportEntry {
                maintenance_id: record.id,
                vehicle_id: record.vehicle_id,
                maintenance_type: record.maintenance_type,
                scheduled_date: record.scheduled_date,
                completed_date: record.completed_date,
                status: record.status,
                cost: cost_calculator::total_cost(record)?,
                priority: record.priority,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(MaintenanceReport {
        generated_date: generated_at,
        start_date: start,
        end_date: end,
        total_maintenances: count,
        completed_maintenances: completed_count,
        pending_maintenances: pending_count,
        total_cost,
        entries,
    })
}
