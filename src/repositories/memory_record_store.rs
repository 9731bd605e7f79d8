//! Record Store en memoria
//!
//! Backend por defecto en desarrollo y en tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::record_store::RecordStore;
use crate::models::{sort_for_computation, FuelRecord, NewFuelRecord, NewVehicle, Vehicle};
use crate::utils::errors::{not_found_error, AppError};

#[derive(Default)]
struct Tables {
    vehicles: HashMap<Uuid, Vehicle>,
    records: HashMap<Uuid, FuelRecord>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(vehicles)
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let vehicle = vehicle.into_vehicle(Uuid::new_v4());
        self.tables
            .write()
            .await
            .vehicles
            .insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.vehicles.get_mut(&vehicle.id) else {
            return Err(not_found_error("Vehicle", &vehicle.id.to_string()));
        };
        *slot = vehicle.clone();
        Ok(vehicle)
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let existed = tables.vehicles.remove(&id).is_some();
        if existed {
            tables.records.retain(|_, record| record.vehicle_id != id);
        }
        Ok(existed)
    }

    async fn insert_record(&self, record: NewFuelRecord) -> Result<Uuid, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&record.vehicle_id) {
            return Err(not_found_error("Vehicle", &record.vehicle_id.to_string()));
        }
        let id = Uuid::new_v4();
        tables.records.insert(id, record.into_record(id));
        Ok(id)
    }

    async fn insert_records(&self, records: Vec<NewFuelRecord>) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = records.iter().find(|r| !tables.vehicles.contains_key(&r.vehicle_id)) {
            return Err(not_found_error("Vehicle", &missing.vehicle_id.to_string()));
        }
        let inserted = records.len() as u64;
        for record in records {
            let id = Uuid::new_v4();
            tables.records.insert(id, record.into_record(id));
        }
        Ok(inserted)
    }

    async fn update_record(&self, record: FuelRecord) -> Result<FuelRecord, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&record.vehicle_id) {
            return Err(not_found_error("Vehicle", &record.vehicle_id.to_string()));
        }
        let Some(slot) = tables.records.get_mut(&record.id) else {
            return Err(not_found_error("Fuel record", &record.id.to_string()));
        };
        *slot = record.clone();
        Ok(record)
    }

    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.records.remove(&id).is_some())
    }

    async fn delete_all_records(&self) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let removed = tables.records.len() as u64;
        tables.records.clear();
        Ok(removed)
    }

    async fn find_record(&self, id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        Ok(self.tables.read().await.records.get(&id).cloned())
    }

    async fn records_ascending(&self, vehicle_id: Option<Uuid>) -> Result<Vec<FuelRecord>, AppError> {
        let tables = self.tables.read().await;
        let mut records: Vec<FuelRecord> = tables
            .records
            .values()
            .filter(|r| vehicle_id.map_or(true, |id| r.vehicle_id == id))
            .cloned()
            .collect();
        sort_for_computation(&mut records);
        Ok(records)
    }

    async fn last_record_for_vehicle(&self, vehicle_id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .values()
            .filter(|r| r.vehicle_id == vehicle_id)
            .max_by(|a, b| a.odometer.total_cmp(&b.odometer))
            .cloned())
    }
}
