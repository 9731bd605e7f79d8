//! Migración de registros antiguos
//!
//! Las primeras versiones guardaban un único vehículo implícito y una marca
//! de tiempo numérica en vez de fecha. Este módulo convierte esa forma al
//! esquema canónico antes de que el motor vea ningún registro.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewFuelRecord, NewVehicle, FALLBACK_COLOR_HEX};
use crate::repositories::RecordStore;
use crate::services::record_validator::{parse_candidate, NumericInput, RecordCandidate, ValidationContext};
use crate::utils::errors::{AppError, AppResult};

/// Versión del esquema que produce esta migración
pub const CANONICAL_SCHEMA_VERSION: u32 = 2;

/// Registro de la versión 1: un solo vehículo, timestamp en milisegundos
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LegacyFuelRecord {
    pub timestamp: i64,
    pub liters: f64,
    pub cost_rm: f64,
    pub odometer_km: f64,
}

/// Archivo exportado por la versión 1
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyExport {
    #[serde(default = "default_legacy_version")]
    pub schema_version: u32,
    pub records: Vec<LegacyFuelRecord>,
}

fn default_legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub converted: usize,
    pub skipped: usize,
    /// El vehículo destino ya tenía registros: no se importó nada
    pub already_applied: bool,
}

/// Día UTC de una marca de tiempo en milisegundos
fn legacy_date(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

/// Convierte registros v1 en registros canónicos para `vehicle_id`.
///
/// Se ordenan por odómetro y se validan como cualquier alta nueva; los que
/// no pasan (valores no positivos, odómetro repetido, fecha inválida) se
/// descartan y se cuentan en el informe.
pub fn convert_legacy_records(
    records: &[LegacyFuelRecord],
    vehicle_id: Uuid,
    today: NaiveDate,
) -> (Vec<NewFuelRecord>, MigrationReport) {
    let mut sorted: Vec<&LegacyFuelRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.odometer_km.total_cmp(&b.odometer_km));

    let mut converted: Vec<NewFuelRecord> = Vec::with_capacity(sorted.len());
    let mut report = MigrationReport::default();
    let mut last_odometer: Option<f64> = None;

    for legacy in sorted {
        let candidate = RecordCandidate {
            vehicle_id: Some(vehicle_id),
            date: legacy_date(legacy.timestamp).map(|d| d.format("%Y-%m-%d").to_string()),
            volume: Some(NumericInput::Number(legacy.liters)),
            cost: Some(NumericInput::Number(legacy.cost_rm)),
            odometer: Some(NumericInput::Number(legacy.odometer_km)),
        };

        let outcome = match last_odometer {
            Some(threshold) if legacy.odometer_km <= threshold => Err(()),
            _ => parse_candidate(&candidate, &ValidationContext::new(None, today)).map_err(|reasons| {
                warn!(timestamp = legacy.timestamp, ?reasons, "Registro antiguo descartado");
            }),
        };

        match outcome {
            Ok(record) => {
                last_odometer = Some(record.odometer);
                converted.push(record);
                report.converted += 1;
            }
            Err(()) => report.skipped += 1,
        }
    }

    (converted, report)
}

/// Importa un export v1 al store en el vehículo `vehicle_name`.
///
/// Se ejecuta al arrancar, antes de levantar la cola de escritura. Es
/// idempotente: si el vehículo destino ya tiene registros no se toca nada, y
/// los registros se insertan en bloque, todos o ninguno.
pub async fn import_legacy_file(
    store: &Arc<dyn RecordStore>,
    path: &Path,
    vehicle_name: &str,
    today: NaiveDate,
) -> AppResult<MigrationReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Internal(format!("cannot read {}: {}", path.display(), e)))?;
    let export: LegacyExport = serde_json::from_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("invalid legacy export: {}", e)))?;

    if export.schema_version >= CANONICAL_SCHEMA_VERSION {
        info!(version = export.schema_version, "Export ya está en el esquema canónico, nada que migrar");
        return Ok(MigrationReport::default());
    }

    let existing = store
        .list_vehicles()
        .await?
        .into_iter()
        .find(|v| v.name == vehicle_name);

    let vehicle = match existing {
        Some(vehicle) => {
            if !store.records_ascending(Some(vehicle.id)).await?.is_empty() {
                info!(vehicle_id = %vehicle.id, "Migración ya aplicada, se omite");
                return Ok(MigrationReport {
                    already_applied: true,
                    ..MigrationReport::default()
                });
            }
            vehicle
        }
        None => {
            store
                .insert_vehicle(NewVehicle {
                    name: vehicle_name.to_string(),
                    vehicle_type: "Car".to_string(),
                    color_hex: FALLBACK_COLOR_HEX.to_string(),
                    plate_number: None,
                })
                .await?
        }
    };

    let (records, report) = convert_legacy_records(&export.records, vehicle.id, today);
    store.insert_records(records).await?;

    info!(
        vehicle_id = %vehicle.id,
        converted = report.converted,
        skipped = report.skipped,
        "📦 Migración de registros antiguos completada"
    );
    Ok(report)
}
