use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::MaintenanceStore;
use crate::models::{
    MaintenancePriority, MaintenanceRecord, MaintenanceStatus, MaintenanceType, NewMaintenance,
    SparePart,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

// Fila de la tabla maintenances; los enums viajan como TEXT
#[derive(Debug, sqlx::FromRow)]
struct MaintenanceRow {
    id: i64,
    vehicle_id: i64,
    maintenance_type: String,
    status: String,
    priority: String,
    scheduled_date: DateTime<Utc>,
    completed_date: Option<DateTime<Utc>>,
    estimated_cost: Decimal,
    actual_cost: Option<Decimal>,
    current_mileage: i32,
    description: String,
    mechanic_notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SparePartRow {
    id: i64,
    maintenance_id: i64,
    name: String,
    part_number: String,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl MaintenanceRow {
    fn into_record(self, spare_parts: Vec<SparePart>) -> AppResult<MaintenanceRecord> {
        // Un literal desconocido en la base es corrupción, no un error del cliente
        let id = self.id;
        let corrupt = move |e: AppError| AppError::Internal(format!("maintenance {}: {}", id, e));

        Ok(MaintenanceRecord {
            id: self.id,
            vehicle_id: self.vehicle_id,
            maintenance_type: self.maintenance_type.parse::<MaintenanceType>().map_err(corrupt)?,
            status: self.status.parse::<MaintenanceStatus>().map_err(corrupt)?,
            priority: self.priority.parse::<MaintenancePriority>().map_err(corrupt)?,
            scheduled_date: self.scheduled_date,
            completed_date: self.completed_date,
            estimated_cost: self.estimated_cost,
            actual_cost: self.actual_cost,
            current_mileage: self.current_mileage,
            description: self.description,
            mechanic_notes: self.mechanic_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            spare_parts,
        })
    }
}

impl From<SparePartRow> for SparePart {
    fn from(row: SparePartRow) -> Self {
        Self {
            id: Some(row.id),
            maintenance_id: row.maintenance_id,
            name: row.name,
            part_number: row.part_number,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            created_at: row.created_at,
        }
    }
}

pub struct PgMaintenanceRepository {
    pool: PgPool,
}

impl PgMaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Carga los repuestos de varios registros en una sola consulta
    async fn attach_parts(&self, rows: Vec<MaintenanceRow>) -> AppResult<Vec<MaintenanceRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let parts = sqlx::query_as::<_, SparePartRow>(
            "SELECT * FROM spare_parts WHERE maintenance_id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_record: HashMap<i64, Vec<SparePart>> = HashMap::new();
        for part in parts {
            by_record
                .entry(part.maintenance_id)
                .or_default()
                .push(SparePart::from(part));
        }

        rows.into_iter()
            .map(|row| {
                let parts = by_record.remove(&row.id).unwrap_or_default();
                row.into_record(parts)
            })
            .collect()
    }
}

#[async_trait]
impl MaintenanceStore for PgMaintenanceRepository {
    async fn insert(&self, new: NewMaintenance) -> AppResult<MaintenanceRecord> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO maintenances
                (vehicle_id, maintenance_type, status, priority, scheduled_date,
                 estimated_cost, current_mileage, description, mechanic_notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '', $9, $9)
            RETURNING id
            "#,
        )
        .bind(new.vehicle_id)
        .bind(new.maintenance_type.as_str())
        .bind(MaintenanceStatus::Scheduled.as_str())
        .bind(new.priority.as_str())
        .bind(new.scheduled_date)
        .bind(new.estimated_cost)
        .bind(new.current_mileage)
        .bind(&new.description)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(new.into_record(id))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceRecord>> {
        let row = sqlx::query_as::<_, MaintenanceRow>("SELECT * FROM maintenances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_parts(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRow>(
            "SELECT * FROM maintenances WHERE vehicle_id = $1 ORDER BY scheduled_date DESC, id DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_parts(rows).await
    }

    async fn find_by_statuses(
        &self,
        statuses: &[MaintenanceStatus],
    ) -> AppResult<Vec<MaintenanceRecord>> {
        let literals: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, MaintenanceRow>(
            "SELECT * FROM maintenances WHERE status = ANY($1) ORDER BY scheduled_date ASC, id ASC",
        )
        .bind(literals)
        .fetch_all(&self.pool)
        .await?;

        self.attach_parts(rows).await
    }

    async fn find_scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRow>(
            r#"
            SELECT * FROM maintenances
            WHERE scheduled_date >= $1 AND scheduled_date <= $2
            ORDER BY scheduled_date ASC, id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        self.attach_parts(rows).await
    }

    async fn has_other_open(&self, vehicle_id: i64, exclude_id: i64) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM maintenances
                WHERE vehicle_id = $1 AND id <> $2 AND status NOT IN ('COMPLETED', 'CANCELLED')
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE maintenances
            SET status = $2, priority = $3, scheduled_date = $4, completed_date = $5,
                estimated_cost = $6, actual_cost = $7, current_mileage = $8,
                description = $9, mechanic_notes = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(record.priority.as_str())
        .bind(record.scheduled_date)
        .bind(record.completed_date)
        .bind(record.estimated_cost)
        .bind(record.actual_cost)
        .bind(record.current_mileage)
        .bind(&record.description)
        .bind(&record.mechanic_notes)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Maintenance", record.id));
        }

        for part in record.unsaved_parts() {
            sqlx::query(
                r#"
                INSERT INTO spare_parts
                    (maintenance_id, name, part_number, quantity, unit_price, total_price, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(&part.name)
            .bind(&part.part_number)
            .bind(part.quantity)
            .bind(part.unit_price)
            .bind(part.total_price)
            .bind(part.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(record.id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance", record.id))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM maintenances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
