//! Motor de transiciones de estado
//!
//! Valida y aplica los cambios de estado de un registro y devuelve el efecto
//! que el llamador debe ejecutar sobre el registro de vehículos.
//!
//! La transición genérica es permisiva: acepta cualquiera de los cuatro
//! estados como destino, incluso desde COMPLETED o CANCELLED. Sólo la
//! cancelación protege los estados terminales. El modo estricto
//! (`StatusTransitionEngine::new(true)`) aplica además
//! `MaintenanceStatus::can_transition_to`.

use chrono::{DateTime, Utc};

use crate::models::{MaintenanceRecord, MaintenanceStatus};
use crate::utils::errors::{AppError, AppResult};

const CANCELLATION_PREFIX: &str = "Cancelled: ";
/// Columna `mechanic_notes` VARCHAR(1000)
const MAX_NOTES_LEN: usize = 1000;

/// Instrucción para el registro de vehículos tras persistir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// Marcar el vehículo como en mantenimiento
    OccupyVehicle(i64),
    /// Liberar el vehículo si no queda otro registro abierto
    ReleaseVehicle(i64),
}

impl SideEffect {
    /// Anula la liberación cuando otro registro abierto sigue ocupando el vehículo
    pub fn unless_vehicle_busy(self, other_open: bool) -> Self {
        match self {
            SideEffect::ReleaseVehicle(_) if other_open => SideEffect::None,
            effect => effect,
        }
    }
}

/// Registro ya modificado más el efecto pendiente
#[derive(Debug, Clone)]
pub struct Transition {
    pub record: MaintenanceRecord,
    pub side_effect: SideEffect,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTransitionEngine {
    strict: bool,
}

impl StatusTransitionEngine {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Transición genérica a partir del literal recibido
    pub fn transition(
        &self,
        mut record: MaintenanceRecord,
        requested: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Transition> {
        let target: MaintenanceStatus = requested.parse()?;

        if self.strict && !record.status.can_transition_to(target) {
            return Err(AppError::InvalidState(format!(
                "Cannot move maintenance {} from {} to {}",
                record.id, record.status, target
            )));
        }

        if target == MaintenanceStatus::Completed {
            return Ok(self.complete(record, now, now));
        }

        // completed_date nunca se borra, aunque el registro salga de COMPLETED
        record.status = target;
        record.updated_at = now;

        Ok(Transition {
            record,
            side_effect: SideEffect::None,
        })
    }

    /// Completa el registro sin mirar el estado actual
    pub fn complete(
        &self,
        mut record: MaintenanceRecord,
        completed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Transition {
        record.status = MaintenanceStatus::Completed;
        record.completed_date = Some(completed_at);
        record.updated_at = now;

        let vehicle_id = record.vehicle_id;
        Transition {
            record,
            side_effect: SideEffect::ReleaseVehicle(vehicle_id),
        }
    }

    /// Cancelación: protege estados terminales y reemplaza las notas del mecánico
    pub fn cancel(
        &self,
        mut record: MaintenanceRecord,
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Transition> {
        if record.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Cannot cancel maintenance with status {}",
                record.status
            )));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::MissingReason);
        }

        let max_reason_len = MAX_NOTES_LEN - CANCELLATION_PREFIX.len();
        if reason.chars().count() > max_reason_len {
            return Err(AppError::Validation(format!(
                "reason exceeds {} characters",
                max_reason_len
            )));
        }

        record.status = MaintenanceStatus::Cancelled;
        record.mechanic_notes = format!("{}{}", CANCELLATION_PREFIX, reason);
        record.updated_at = now;

        let vehicle_id = record.vehicle_id;
        Ok(Transition {
            record,
            side_effect: SideEffect::ReleaseVehicle(vehicle_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenancePriority, MaintenanceType, NewMaintenance};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn record_with_status(status: MaintenanceStatus) -> MaintenanceRecord {
        let created = Utc::now() - Duration::days(2);
        let mut record = NewMaintenance {
            vehicle_id: 42,
            maintenance_type: MaintenanceType::Preventive,
            priority: MaintenancePriority::Medium,
            scheduled_date: created + Duration::days(1),
            estimated_cost: Decimal::new(10000, 2),
            current_mileage: 15000,
            description: "révision".to_string(),
            created_at: created,
        }
        .into_record(5);
        record.status = status;
        record
    }

    #[test]
    fn test_completion_stamps_date_and_releases_vehicle() {
        let engine = StatusTransitionEngine::default();
        let now = Utc::now();
        let transition = engine
            .transition(record_with_status(MaintenanceStatus::InProgress), "COMPLETED", now)
            .unwrap();

        assert_eq!(transition.record.status, MaintenanceStatus::Completed);
        assert_eq!(transition.record.completed_date, Some(now));
        assert_eq!(transition.record.updated_at, now);
        assert_eq!(transition.side_effect, SideEffect::ReleaseVehicle(42));
    }

    #[test]
    fn test_non_completion_leaves_completed_date_untouched() {
        let engine = StatusTransitionEngine::default();
        let now = Utc::now();

        let transition = engine
            .transition(record_with_status(MaintenanceStatus::Scheduled), "IN_PROGRESS", now)
            .unwrap();
        assert_eq!(transition.record.completed_date, None);
        assert_eq!(transition.record.updated_at, now);
        assert_eq!(transition.side_effect, SideEffect::None);

        // Una vez fijada, la fecha de cierre sobrevive a cambios posteriores
        let mut completed = record_with_status(MaintenanceStatus::Completed);
        let stamped = now - Duration::hours(3);
        completed.completed_date = Some(stamped);
        let reopened = engine.transition(completed, "SCHEDULED", now).unwrap();
        assert_eq!(reopened.record.status, MaintenanceStatus::Scheduled);
        assert_eq!(reopened.record.completed_date, Some(stamped));
    }

    #[test]
    fn test_permissive_mode_accepts_moves_out_of_terminal_states() {
        let engine = StatusTransitionEngine::default();
        for (from, to) in [
            (MaintenanceStatus::Completed, "IN_PROGRESS"),
            (MaintenanceStatus::Cancelled, "SCHEDULED"),
            (MaintenanceStatus::Cancelled, "COMPLETED"),
        ] {
            let transition = engine.transition(record_with_status(from), to, Utc::now()).unwrap();
            assert_eq!(transition.record.status.as_str(), to);
        }
    }

    #[test]
    fn test_strict_mode_rejects_moves_out_of_terminal_states() {
        let engine = StatusTransitionEngine::new(true);
        assert!(engine.is_strict());

        let err = engine
            .transition(record_with_status(MaintenanceStatus::Completed), "IN_PROGRESS", Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let ok = engine
            .transition(record_with_status(MaintenanceStatus::Scheduled), "IN_PROGRESS", Utc::now())
            .unwrap();
        assert_eq!(ok.record.status, MaintenanceStatus::InProgress);
    }

    #[test]
    fn test_unknown_status_literal_is_rejected() {
        let engine = StatusTransitionEngine::default();
        for literal in ["DONE", "", "completed"] {
            let err = engine
                .transition(record_with_status(MaintenanceStatus::Scheduled), literal, Utc::now())
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidStatus(_)), "literal {literal:?}");
        }
    }

    #[test]
    fn test_cancel_scheduled_record_overwrites_notes() {
        let engine = StatusTransitionEngine::default();
        let mut record = record_with_status(MaintenanceStatus::Scheduled);
        record.mechanic_notes = "pièces commandées".to_string();
        let now = Utc::now();

        let transition = engine.cancel(record, "client absent", now).unwrap();

        assert_eq!(transition.record.status, MaintenanceStatus::Cancelled);
        assert_eq!(transition.record.mechanic_notes, "Cancelled: client absent");
        assert_eq!(transition.record.completed_date, None);
        assert_eq!(transition.record.updated_at, now);
        assert_eq!(transition.side_effect, SideEffect::ReleaseVehicle(42));
    }

    #[test]
    fn test_cancel_guards_terminal_states_and_reason() {
        let engine = StatusTransitionEngine::default();

        for status in [MaintenanceStatus::Completed, MaintenanceStatus::Cancelled] {
            let err = engine
                .cancel(record_with_status(status), "trop tard", Utc::now())
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidState(_)));
        }

        let err = engine
            .cancel(record_with_status(MaintenanceStatus::InProgress), "   ", Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::MissingReason));
    }

    #[test]
    fn test_release_is_dropped_when_vehicle_still_busy() {
        assert_eq!(
            SideEffect::ReleaseVehicle(1).unless_vehicle_busy(true),
            SideEffect::None
        );
        assert_eq!(
            SideEffect::ReleaseVehicle(1).unless_vehicle_busy(false),
            SideEffect::ReleaseVehicle(1)
        );
        assert_eq!(
            SideEffect::OccupyVehicle(1).unless_vehicle_busy(true),
            SideEffect::OccupyVehicle(1)
        );
    }

    #[test]
    fn test_cancel_reason_must_fit_mechanic_notes() {
        let engine = StatusTransitionEngine::default();
        let longest = "x".repeat(MAX_NOTES_LEN - CANCELLATION_PREFIX.len());

        let transition = engine
            .cancel(record_with_status(MaintenanceStatus::Scheduled), &longest, Utc::now())
            .unwrap();
        assert_eq!(transition.record.mechanic_notes.chars().count(), MAX_NOTES_LEN);

        let too_long = "é".repeat(990);
        let err = engine
            .cancel(record_with_status(MaintenanceStatus::Scheduled), &too_long, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
