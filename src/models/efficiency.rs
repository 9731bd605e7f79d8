//! Modelos derivados de eficiencia
//!
//! Nada de lo que vive aquí se persiste: se recalcula en cada cambio del
//! stream de registros.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::vehicle::{Vehicle, VehicleMeta};

/// Métricas atribuibles al hueco entre dos repostajes consecutivos del mismo vehículo
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub record_id: Uuid,
    pub distance: Option<f64>,
    pub consumption_per_100: Option<f64>,
    pub cost_per_distance: Option<f64>,
}

impl Interval {
    /// Intervalo sin datos de eficiencia (primer repostaje o hueco no positivo)
    pub fn empty(record_id: Uuid) -> Self {
        Self {
            record_id,
            distance: None,
            consumption_per_100: None,
            cost_per_distance: None,
        }
    }

    pub fn has_efficiency(&self) -> bool {
        self.distance.is_some()
    }
}

/// Totales y medias ponderadas por distancia
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_distance: f64,
    pub total_volume: f64,
    pub total_cost: f64,
    pub avg_consumption_per_100: Option<f64>,
    pub avg_cost_per_distance: Option<f64>,
    /// Sin ningún intervalo válido: la presentación debe ocultar el resumen
    pub insufficient_data: bool,
}

impl Summary {
    pub fn insufficient() -> Self {
        Self {
            total_distance: 0.0,
            total_volume: 0.0,
            total_cost: 0.0,
            avg_consumption_per_100: None,
            avg_cost_per_distance: None,
            insufficient_data: true,
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::insufficient()
    }
}

/// Fila lista para mostrar: registro + vehículo + intervalo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelLogRow {
    pub record_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_meta: VehicleMeta,
    pub date: NaiveDate,
    pub volume: f64,
    pub cost: f64,
    pub odometer: f64,
    pub distance: Option<f64>,
    pub consumption_per_100: Option<f64>,
    pub cost_per_distance: Option<f64>,
    pub has_efficiency: bool,
}

/// Orden de presentación del log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    /// Más reciente primero por fecha; empates por odómetro descendente
    #[default]
    DateDesc,
    OdometerDesc,
}

/// Vista derivada que el motor republica tras cada cambio del store
#[derive(Debug, Clone, Default, Serialize)]
pub struct EfficiencyView {
    pub revision: u64,
    pub vehicles: Vec<Vehicle>,
    /// Filas en orden de cálculo (vehículo y odómetro ascendentes)
    pub rows: Vec<FuelLogRow>,
    pub vehicle_summaries: HashMap<Uuid, Summary>,
    pub fleet_summary: Summary,
}

impl EfficiencyView {
    pub fn summary_for(&self, vehicle_id: Option<Uuid>) -> Summary {
        match vehicle_id {
            Some(id) => self.vehicle_summaries.get(&id).copied().unwrap_or_default(),
            None => self.fleet_summary,
        }
    }
}
