//! Modelo de FuelRecord
//!
//! Esquema canónico de un repostaje. Cualquier forma antigua de registro
//! pasa por `migration::legacy_records` antes de llegar aquí.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registro de repostaje - mapea a la tabla fuel_records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FuelRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[sqlx(rename = "record_date")]
    pub date: NaiveDate,
    pub volume: f64,
    pub cost: f64,
    pub odometer: f64,
    pub created_at: DateTime<Utc>,
}

/// Repostaje ya validado, pendiente de insertar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFuelRecord {
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub volume: f64,
    pub cost: f64,
    pub odometer: f64,
}

impl NewFuelRecord {
    pub fn into_record(self, id: Uuid) -> FuelRecord {
        FuelRecord {
            id,
            vehicle_id: self.vehicle_id,
            date: self.date,
            volume: self.volume,
            cost: self.cost,
            odometer: self.odometer,
            created_at: Utc::now(),
        }
    }
}

/// Ordenación canónica de lectura: vehículo ascendente y luego odómetro ascendente
pub fn sort_for_computation(records: &mut [FuelRecord]) {
    records.sort_by(|a, b| {
        a.vehicle_id
            .cmp(&b.vehicle_id)
            .then(a.odometer.total_cmp(&b.odometer))
    });
}
