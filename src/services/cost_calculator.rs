//! Cálculo de costos de mantenimiento

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{MaintenanceRecord, MaintenanceStatus};
use crate::services::spare_part_ledger::SparePartLedger;
use crate::utils::errors::{AppError, AppResult};

/// Totales agregados sobre una colección de registros
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostSummary {
    pub count: usize,
    pub completed_count: usize,
    /// SCHEDULED + IN_PROGRESS
    pub pending_count: usize,
    pub total_cost: Decimal,
}

/// Costo base (real o estimado) más la suma de los repuestos
pub fn total_cost(record: &MaintenanceRecord) -> AppResult<Decimal> {
    let parts = SparePartLedger::parts_total(&record.spare_parts)?;
    record
        .base_cost()
        .checked_add(parts)
        .ok_or_else(|| overflow(record.id))
}

pub fn aggregate<'a, I>(records: I) -> AppResult<CostSummary>
where
    I: IntoIterator<Item = &'a MaintenanceRecord>,
{
    records
        .into_iter()
        .try_fold(CostSummary::default(), |mut summary, record| {
            summary.count += 1;
            match record.status {
                MaintenanceStatus::Completed => summary.completed_count += 1,
                MaintenanceStatus::Scheduled | MaintenanceStatus::InProgress => {
                    summary.pending_count += 1
                }
                MaintenanceStatus::Cancelled => {}
            }
            summary.total_cost = summary
                .total_cost
                .checked_add(total_cost(record)?)
                .ok_or_else(|| overflow(record.id))?;
            Ok(summary)
        })
}

fn overflow(maintenance_id: i64) -> AppError {
    AppError::Internal(format!(
        "cost total overflowed at maintenance {}",
        maintenance_id
    ))
}
