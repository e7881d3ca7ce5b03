//! Libro de repuestos de un registro de mantenimiento
//!
//! Sólo se añaden repuestos; los ya registrados no se modifican.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{MaintenanceRecord, NewSparePart, SparePart};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    max_part_total, validate_max_length, validate_money, validate_not_empty, validate_positive,
};

const MAX_NAME_LEN: usize = 200;
const MAX_PART_NUMBER_LEN: usize = 100;

pub struct SparePartLedger;

impl SparePartLedger {
    /// Rechaza cantidades no positivas, precios fuera de NUMERIC(10,2) y nombres vacíos
    pub fn validate(spec: &NewSparePart) -> AppResult<()> {
        let invalid = |msg: String| AppError::InvalidPartSpec(msg);

        validate_not_empty(&spec.name)
            .map_err(|_| invalid("name is required".to_string()))?;
        validate_max_length(&spec.name, MAX_NAME_LEN)
            .map_err(|_| invalid(format!("name exceeds {} characters", MAX_NAME_LEN)))?;
        validate_max_length(&spec.part_number, MAX_PART_NUMBER_LEN).map_err(|_| {
            invalid(format!("part number exceeds {} characters", MAX_PART_NUMBER_LEN))
        })?;
        validate_positive(spec.quantity)
            .map_err(|_| invalid(format!("quantity must be positive, got {}", spec.quantity)))?;
        validate_money(spec.unit_price).map_err(|e| {
            invalid(format!(
                "unit price {} failed '{}' check",
                spec.unit_price, e.code
            ))
        })?;

        match spec.total_price() {
            Some(total) if total <= max_part_total() => Ok(()),
            _ => Err(invalid(format!(
                "total of {} × {} exceeds {}",
                spec.quantity,
                spec.unit_price,
                max_part_total()
            ))),
        }
    }

    /// Añade un repuesto al registro y devuelve la entrada creada
    pub fn add_part(
        record: &mut MaintenanceRecord,
        spec: NewSparePart,
        now: DateTime<Utc>,
    ) -> AppResult<&SparePart> {
        Self::validate(&spec)?;
        record.spare_parts.push(SparePart::new(record.id, spec, now)?);
        let index = record.spare_parts.len() - 1;
        Ok(&record.spare_parts[index])
    }

    pub fn parts_total(parts: &[SparePart]) -> AppResult<Decimal> {
        parts
            .iter()
            .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(part.total_price))
            .ok_or_else(|| AppError::Internal("spare part total overflowed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenancePriority, MaintenanceType, NewMaintenance};

    fn record() -> MaintenanceRecord {
        let now = Utc::now();
        NewMaintenance {
            vehicle_id: 42,
            maintenance_type: MaintenanceType::Preventive,
            priority: MaintenancePriority::Medium,
            scheduled_date: now,
            estimated_cost: Decimal::ZERO,
            current_mileage: 0,
            description: String::new(),
            created_at: now,
        }
        .into_record(1)
    }

    fn part(name: &str, quantity: i32, unit_price: Decimal) -> NewSparePart {
        NewSparePart {
            name: name.to_string(),
            part_number: "PN-1".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_total_price_is_quantity_times_unit_price() {
        let mut record = record();
        let added = SparePartLedger::add_part(&mut record, part("Filter", 3, Decimal::new(1250, 2)), Utc::now())
            .unwrap();

        assert_eq!(added.total_price, Decimal::new(3750, 2));
        assert_eq!(added.maintenance_id, 1);
        assert!(added.id.is_none());
    }

    #[test]
    fn test_add_part_does_not_touch_existing_parts() {
        let mut record = record();
        SparePartLedger::add_part(&mut record, part("Filter", 2, Decimal::new(1000, 2)), Utc::now()).unwrap();
        let before = record.spare_parts[0].clone();

        SparePartLedger::add_part(&mut record, part("Oil", 1, Decimal::new(3000, 2)), Utc::now()).unwrap();

        assert_eq!(record.spare_parts[0], before);
        assert_eq!(
            SparePartLedger::parts_total(&record.spare_parts).unwrap(),
            Decimal::new(5000, 2)
        );
    }

    #[test]
    fn test_rejects_invalid_specs() {
        let mut record = record();
        for spec in [
            part("Filter", 0, Decimal::ONE),
            part("Filter", -2, Decimal::ONE),
            part("Filter", 1, Decimal::new(-1, 2)),
            part("  ", 1, Decimal::ONE),
            // Más de dos decimales: NUMERIC(10,2) lo redondearía
            part("Washer", 3, Decimal::new(125, 3)),
            part("Engine", 1, Decimal::new(10_000_000_000, 2)),
            part("Engine", 2, Decimal::MAX),
            // Precio válido pero total fuera de NUMERIC(12,2)
            part("Bolt", i32::MAX, Decimal::new(9_999_999_999, 2)),
        ] {
            let err = SparePartLedger::add_part(&mut record, spec, Utc::now()).unwrap_err();
            assert!(matches!(err, AppError::InvalidPartSpec(_)));
        }
        assert!(record.spare_parts.is_empty());
    }

    #[test]
    fn test_free_part_is_accepted() {
        let mut record = record();
        let added = SparePartLedger::add_part(&mut record, part("Clip", 4, Decimal::ZERO), Utc::now()).unwrap();
        assert_eq!(added.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_largest_valid_part_fits_part_total_column() {
        let mut record = record();
        let added = SparePartLedger::add_part(
            &mut record,
            part("Gearbox", 100, Decimal::new(9_999_999_999, 2)),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(added.total_price, Decimal::new(999_999_999_900, 2));
    }
}
