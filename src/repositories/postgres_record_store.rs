//! Record Store sobre PostgreSQL
//!
//! Las tablas se crean en `database::connection::ensure_schema`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::record_store::RecordStore;
use crate::models::{FuelRecord, NewFuelRecord, NewVehicle, Vehicle};
use crate::utils::errors::{not_found_error, AppError};

const RECORD_COLUMNS: &str = "id, vehicle_id, record_date, volume, cost, odometer, created_at";

pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY LOWER(name) ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let vehicle = vehicle.into_vehicle(Uuid::new_v4());

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, vehicle_type, color_hex, plate_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.name)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.color_hex)
        .bind(vehicle.plate_number)
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let id = vehicle.id;
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = $2, vehicle_type = $3, color_hex = $4, plate_number = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.name)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.color_hex)
        .bind(vehicle.plate_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError> {
        // fuel_records tiene ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_record(&self, record: NewFuelRecord) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let record = record.into_record(id);

        sqlx::query(
            r#"
            INSERT INTO fuel_records (id, vehicle_id, record_date, volume, cost, odometer, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.vehicle_id)
        .bind(record.date)
        .bind(record.volume)
        .bind(record.cost)
        .bind(record.odometer)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_records(&self, records: Vec<NewFuelRecord>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for record in records {
            let record = record.into_record(Uuid::new_v4());
            sqlx::query(
                r#"
                INSERT INTO fuel_records (id, vehicle_id, record_date, volume, cost, odometer, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(record.vehicle_id)
            .bind(record.date)
            .bind(record.volume)
            .bind(record.cost)
            .bind(record.odometer)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        // Si algo falla antes, el drop de `tx` hace rollback
        tx.commit().await?;
        Ok(inserted)
    }

    async fn update_record(&self, record: FuelRecord) -> Result<FuelRecord, AppError> {
        let id = record.id;
        sqlx::query_as::<_, FuelRecord>(&format!(
            r#"
            UPDATE fuel_records
            SET vehicle_id = $2, record_date = $3, volume = $4, cost = $5, odometer = $6
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(record.vehicle_id)
        .bind(record.date)
        .bind(record.volume)
        .bind(record.cost)
        .bind(record.odometer)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Fuel record", &id.to_string()))
    }

    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM fuel_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_records(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM fuel_records")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_record(&self, id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        let record = sqlx::query_as::<_, FuelRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM fuel_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn records_ascending(&self, vehicle_id: Option<Uuid>) -> Result<Vec<FuelRecord>, AppError> {
        let records = sqlx::query_as::<_, FuelRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM fuel_records
            WHERE ($1::uuid IS NULL OR vehicle_id = $1)
            ORDER BY vehicle_id ASC, odometer ASC
            "#
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn last_record_for_vehicle(&self, vehicle_id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        let record = sqlx::query_as::<_, FuelRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM fuel_records
            WHERE vehicle_id = $1
            ORDER BY odometer DESC
            LIMIT 1
            "#
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
