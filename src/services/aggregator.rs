//! Agregador de resúmenes
//!
//! Fórmula única para todo el sistema: medias ponderadas por distancia.
//! Se suman distancia, volumen y coste de los intervalos válidos y las
//! medias salen de los totales. El dashboard por vehículo y la tarjeta del
//! log usan esta misma función.

use crate::models::{FuelRecord, Interval, Summary};
use crate::services::interval_calculator::compute_intervals;

/// Reduce registros y sus intervalos (mismo orden) a un `Summary`.
///
/// Los pares cuyo `record_id` no coincide se ignoran.
pub fn summarize(records: &[FuelRecord], intervals: &[Interval]) -> Summary {
    let mut total_distance = 0.0;
    let mut total_volume = 0.0;
    let mut total_cost = 0.0;
    let mut valid_intervals = 0usize;

    for (record, interval) in records.iter().zip(intervals) {
        if record.id != interval.record_id {
            continue;
        }
        let Some(distance) = interval.distance else {
            continue;
        };

        total_distance += distance;
        total_volume += record.volume;
        total_cost += record.cost;
        valid_intervals += 1;
    }

    if valid_intervals == 0 || total_distance <= 0.0 {
        return Summary::insufficient();
    }

    Summary {
        total_distance,
        total_volume,
        total_cost,
        avg_consumption_per_100: Some(total_volume / total_distance * 100.0),
        avg_cost_per_distance: Some(total_cost / total_distance),
        insufficient_data: false,
    }
}

/// Calcula los intervalos y resume en un paso
pub fn summarize_records(records: &[FuelRecord]) -> Summary {
    let intervals = compute_intervals(records);
    summarize(records, &intervals)
}
