//! Repositorios
//!
//! Acceso a datos de los registros de mantenimiento. El servicio depende
//! sólo del trait `MaintenanceStore`; hay una implementación PostgreSQL y
//! otra en memoria (tests y arranque sin `DATABASE_URL`).

pub mod maintenance_repository;
pub mod memory_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{MaintenanceRecord, MaintenanceStatus, NewMaintenance};
use crate::utils::errors::AppResult;

pub use maintenance_repository::PgMaintenanceRepository;
pub use memory_repository::InMemoryMaintenanceStore;

#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Inserta un registro nuevo en estado SCHEDULED
    async fn insert(&self, new: NewMaintenance) -> AppResult<MaintenanceRecord>;

    /// Busca un registro con sus repuestos
    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceRecord>>;

    /// Historial de un vehículo, `scheduled_date` descendente
    async fn find_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>>;

    /// Registros en alguno de los estados dados, `scheduled_date` ascendente
    async fn find_by_statuses(
        &self,
        statuses: &[MaintenanceStatus],
    ) -> AppResult<Vec<MaintenanceRecord>>;

    /// Registros con `scheduled_date` en `[start, end]`
    async fn find_scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceRecord>>;

    /// ¿Existe otro registro abierto (ni COMPLETED ni CANCELLED) para el vehículo?
    async fn has_other_open(&self, vehicle_id: i64, exclude_id: i64) -> AppResult<bool>;

    /// Guarda los campos mutables y persiste los repuestos sin id.
    /// Última escritura gana: no hay token de versión.
    async fn update(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord>;

    /// Borrado administrativo; los repuestos se eliminan en cascada
    async fn delete(&self, id: i64) -> AppResult<bool>;
}
