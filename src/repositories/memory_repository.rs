use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::MaintenanceStore;
use crate::models::{MaintenanceRecord, MaintenanceStatus, NewMaintenance};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    last_record_id: i64,
    last_part_id: i64,
    records: BTreeMap<i64, MaintenanceRecord>,
}

/// Store en memoria con la misma semántica que el repositorio PostgreSQL
#[derive(Debug, Default)]
pub struct InMemoryMaintenanceStore {
    state: RwLock<MemoryState>,
}

impl InMemoryMaintenanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sorted_by_schedule(mut records: Vec<MaintenanceRecord>, descending: bool) -> Vec<MaintenanceRecord> {
    records.sort_by(|a, b| {
        let ordering = a
            .scheduled_date
            .cmp(&b.scheduled_date)
            .then_with(|| a.id.cmp(&b.id));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    records
}

#[async_trait]
impl MaintenanceStore for InMemoryMaintenanceStore {
    async fn insert(&self, new: NewMaintenance) -> AppResult<MaintenanceRecord> {
        let mut state = self.state.write().await;
        state.last_record_id += 1;
        let record = new.into_record(state.last_record_id);
        state.records.insert(record.id, record.clone());
        debug!("💾 Maintenance {} guardado en memoria", record.id);
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceRecord>> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn find_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>> {
        let state = self.state.read().await;
        let records = state
            .records
            .values()
            .filter(|record| record.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        Ok(sorted_by_schedule(records, true))
    }

    async fn find_by_statuses(
        &self,
        statuses: &[MaintenanceStatus],
    ) -> AppResult<Vec<MaintenanceRecord>> {
        let state = self.state.read().await;
        let records = state
            .records
            .values()
            .filter(|record| statuses.contains(&record.status))
            .cloned()
            .collect();
        Ok(sorted_by_schedule(records, false))
    }

    async fn find_scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceRecord>> {
        let state = self.state.read().await;
        let records = state
            .records
            .values()
            .filter(|record| record.scheduled_date >= start && record.scheduled_date <= end)
            .cloned()
            .collect();
        Ok(sorted_by_schedule(records, false))
    }

    async fn has_other_open(&self, vehicle_id: i64, exclude_id: i64) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.records.values().any(|record| {
            record.vehicle_id == vehicle_id && record.id != exclude_id && record.status.is_open()
        }))
    }

    async fn update(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord> {
        let mut state = self.state.write().await;
        if !state.records.contains_key(&record.id) {
            return Err(not_found_error("Maintenance", record.id));
        }

        let mut stored = record.clone();
        for part in stored.spare_parts.iter_mut().filter(|part| part.id.is_none()) {
            state.last_part_id += 1;
            part.id = Some(state.last_part_id);
        }

        state.records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.write().await.records.remove(&id).is_some())
    }
}
