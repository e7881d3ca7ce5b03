use anyhow::Result;
use chrono::Duration;

use super::environment::env_or;

/// Reglas de negocio configurables del servicio de mantenimiento
#[derive(Debug, Clone)]
pub struct MaintenanceSettings {
    /// Rechaza salidas de estados terminales en la actualización genérica.
    /// Desactivado por defecto: cualquier estado es un destino válido.
    pub strict_transitions: bool,
    /// Tolerancia de reloj para la regla "no programar en el pasado"
    pub schedule_grace: Duration,
    /// Antelación del correctivo creado desde un reporte de inspección
    pub corrective_lead_time: Duration,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            schedule_grace: Duration::seconds(60),
            corrective_lead_time: Duration::hours(24),
        }
    }
}

impl MaintenanceSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            strict_transitions: env_or("MAINTENANCE_STRICT_TRANSITIONS", false)?,
            schedule_grace: Duration::seconds(env_or("MAINTENANCE_SCHEDULE_GRACE_SECS", 60i64)?),
            corrective_lead_time: Duration::hours(env_or(
                "MAINTENANCE_CORRECTIVE_LEAD_HOURS",
                24i64,
            )?),
        })
    }
}
