//! Calculadora de intervalos
//!
//! Recibe los repostajes ordenados por odómetro ascendente (agrupados por
//! vehículo cuando hay varios) y produce un `Interval` por registro, en el
//! mismo orden.

use uuid::Uuid;

use crate::models::{FuelRecord, Interval};

/// Calcula un intervalo por registro.
///
/// Sólo se comparan registros consecutivos del mismo vehículo. Un hueco de
/// distancia no positivo produce un intervalo vacío, nunca un error.
pub fn compute_intervals(records: &[FuelRecord]) -> Vec<Interval> {
    let mut intervals = Vec::with_capacity(records.len());
    let mut previous: Option<(Uuid, f64)> = None;

    for record in records {
        let interval = match previous {
            Some((vehicle_id, odometer)) if vehicle_id == record.vehicle_id => {
                interval_between(odometer, record)
            }
            _ => Interval::empty(record.id),
        };

        intervals.push(interval);
        previous = Some((record.vehicle_id, record.odometer));
    }

    intervals
}

fn interval_between(previous_odometer: f64, current: &FuelRecord) -> Interval {
    let distance = current.odometer - previous_odometer;
    // También descarta NaN
    if !(distance > 0.0) {
        return Interval::empty(current.id);
    }

    Interval {
        record_id: current.id,
        distance: Some(distance),
        consumption_per_100: Some(current.volume / distance * 100.0),
        cost_per_distance: Some(current.cost / distance),
    }
}
