//! Store de pruebas cuyas lecturas se pueden hacer fallar

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::models::{FuelRecord, NewFuelRecord, NewVehicle, Vehicle};
use crate::repositories::{MemoryRecordStore, RecordStore};
use crate::utils::errors::AppError;

/// Envuelve un `MemoryRecordStore`; con `fail_reads(true)` los listados
/// completos fallan como si se agotara el pool
#[derive(Default)]
pub struct FlakyRecordStore {
    pub inner: MemoryRecordStore,
    failing: AtomicBool,
}

impl FlakyRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyRecordStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        self.check()?;
        self.inner.list_vehicles().await
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        self.inner.find_vehicle(id).await
    }

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        self.inner.insert_vehicle(vehicle).await
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        self.inner.update_vehicle(vehicle).await
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_vehicle(id).await
    }

    async fn insert_record(&self, record: NewFuelRecord) -> Result<Uuid, AppError> {
        self.inner.insert_record(record).await
    }

    async fn insert_records(&self, records: Vec<NewFuelRecord>) -> Result<u64, AppError> {
        self.inner.insert_records(records).await
    }

    async fn update_record(&self, record: FuelRecord) -> Result<FuelRecord, AppError> {
        self.inner.update_record(record).await
    }

    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_record(id).await
    }

    async fn delete_all_records(&self) -> Result<u64, AppError> {
        self.inner.delete_all_records().await
    }

    async fn find_record(&self, id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        self.inner.find_record(id).await
    }

    async fn records_ascending(&self, vehicle_id: Option<Uuid>) -> Result<Vec<FuelRecord>, AppError> {
        self.check()?;
        self.inner.records_ascending(vehicle_id).await
    }

    async fn last_record_for_vehicle(&self, vehicle_id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        self.inner.last_record_for_vehicle(vehicle_id).await
    }
}
