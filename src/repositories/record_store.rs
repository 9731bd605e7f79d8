//! Puerto del Record Store
//!
//! Contrato que el motor necesita del almacenamiento. Las escrituras se
//! serializan fuera de aquí, en `services::write_queue`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{FuelRecord, NewFuelRecord, NewVehicle, Vehicle};
use crate::utils::errors::AppError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Nombre corto del backend, para logs y health
    fn backend(&self) -> &'static str;

    /// Vehículos ordenados por nombre sin distinguir mayúsculas
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError>;
    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;
    async fn insert_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError>;
    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError>;
    /// Borra el vehículo y, en cascada, sus repostajes. Devuelve si existía.
    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_record(&self, record: NewFuelRecord) -> Result<Uuid, AppError>;
    /// Inserta todos los registros o ninguno. Devuelve cuántos se insertaron.
    async fn insert_records(&self, records: Vec<NewFuelRecord>) -> Result<u64, AppError>;
    async fn update_record(&self, record: FuelRecord) -> Result<FuelRecord, AppError>;
    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError>;
    /// Devuelve cuántos registros se borraron
    async fn delete_all_records(&self) -> Result<u64, AppError>;
    async fn find_record(&self, id: Uuid) -> Result<Option<FuelRecord>, AppError>;

    /// Registros de un vehículo (o de todos) por vehículo y odómetro ascendentes
    async fn records_ascending(&self, vehicle_id: Option<Uuid>) -> Result<Vec<FuelRecord>, AppError>;
    /// Registro con mayor odómetro del vehículo
    async fn last_record_for_vehicle(&self, vehicle_id: Uuid) -> Result<Option<FuelRecord>, AppError>;
}

/// Foto completa del store que se publica a los suscriptores
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub revision: u64,
    pub vehicles: Vec<Vehicle>,
    /// Orden de cálculo: vehículo y odómetro ascendentes
    pub records: Vec<FuelRecord>,
}

impl StoreSnapshot {
    /// Lee vehículos y registros en el orden que necesita el motor
    pub async fn load(store: &dyn RecordStore, revision: u64) -> Result<Self, AppError> {
        let vehicles = store.list_vehicles().await?;
        let records = store.records_ascending(None).await?;
        Ok(Self {
            revision,
            vehicles,
            records,
        })
    }
}
