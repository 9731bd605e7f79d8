//! Proyector del log de repostajes
//!
//! Une cada registro con su vehículo y su intervalo, reordena para
//! presentación y aplica el filtro de vehículo. Nunca recalcula métricas:
//! los intervalos se deciden una sola vez sobre la secuencia completa.

use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{DisplayOrder, FuelLogRow, FuelRecord, Interval, Vehicle, VehicleMeta};
use crate::services::interval_calculator::compute_intervals;

/// Une registros (orden ascendente de cálculo) con vehículo e intervalo.
///
/// Las filas salen en el mismo orden que `records`.
pub fn join_rows(records: &[FuelRecord], intervals: &[Interval], vehicles: &[Vehicle]) -> Vec<FuelLogRow> {
    let vehicle_by_id: HashMap<Uuid, &Vehicle> = vehicles.iter().map(|v| (v.id, v)).collect();
    let interval_by_record: HashMap<Uuid, &Interval> =
        intervals.iter().map(|i| (i.record_id, i)).collect();

    records
        .iter()
        .map(|record| {
            let vehicle_meta = vehicle_by_id
                .get(&record.vehicle_id)
                .map(|v| VehicleMeta::from(*v))
                .unwrap_or_else(VehicleMeta::fallback);
            let interval = interval_by_record
                .get(&record.id)
                .copied()
                .copied()
                .unwrap_or_else(|| Interval::empty(record.id));

            FuelLogRow {
                record_id: record.id,
                vehicle_id: record.vehicle_id,
                vehicle_meta,
                date: record.date,
                volume: record.volume,
                cost: record.cost,
                odometer: record.odometer,
                distance: interval.distance,
                consumption_per_100: interval.consumption_per_100,
                cost_per_distance: interval.cost_per_distance,
                has_efficiency: interval.has_efficiency(),
            }
        })
        .collect()
}

/// Ordena filas ya calculadas para presentación (orden estable)
pub fn sort_rows(rows: &mut [FuelLogRow], order: DisplayOrder) {
    rows.sort_by(|a, b| match order {
        DisplayOrder::DateDesc => b
            .date
            .cmp(&a.date)
            .then_with(|| descending_odometer(a, b)),
        DisplayOrder::OdometerDesc => descending_odometer(a, b),
    });
}

fn descending_odometer(a: &FuelLogRow, b: &FuelLogRow) -> Ordering {
    b.odometer.total_cmp(&a.odometer)
}

/// Conserva sólo las filas del vehículo indicado, sin tocar el orden
pub fn filter_rows(rows: Vec<FuelLogRow>, vehicle_id: Option<Uuid>) -> Vec<FuelLogRow> {
    match vehicle_id {
        Some(id) => rows.into_iter().filter(|row| row.vehicle_id == id).collect(),
        None => rows,
    }
}

/// Reordena y filtra filas ya unidas
pub fn present(mut rows: Vec<FuelLogRow>, vehicle_id: Option<Uuid>, order: DisplayOrder) -> Vec<FuelLogRow> {
    sort_rows(&mut rows, order);
    filter_rows(rows, vehicle_id)
}

/// Pipeline completo: intervalos sobre la secuencia sin filtrar, unión, orden y filtro
pub fn project_log(
    records: &[FuelRecord],
    vehicles: &[Vehicle],
    vehicle_id: Option<Uuid>,
    order: DisplayOrder,
) -> Vec<FuelLogRow> {
    let intervals = compute_intervals(records);
    present(join_rows(records, &intervals, vehicles), vehicle_id, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FALLBACK_COLOR_HEX;
    use chrono::{NaiveDate, Utc};

    fn vehicle(name: &str, vehicle_type: &str) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            name: name.to_string(),
            vehicle_type: vehicle_type.to_string(),
            color_hex: "#FFAA00".to_string(),
            plate_number: None,
            created_at: Utc::now(),
        }
    }

    fn record(vehicle_id: Uuid, day: u32, odometer: f64) -> FuelRecord {
        FuelRecord {
            id: Uuid::new_v4(),
            vehicle_id,
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            volume: 10.0,
            cost: 30.0,
            odometer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_date_desc_order() {
        let car = vehicle("Civic", "Car");
        let records = vec![
            record(car.id, 1, 1000.0),
            record(car.id, 9, 1300.0),
            record(car.id, 5, 1150.0),
        ];

        let rows = project_log(&records, &[car], None, DisplayOrder::DateDesc);

        let days: Vec<_> = rows.iter().map(|r| r.date.format("%d").to_string()).collect();
        assert_eq!(days, vec!["09", "05", "01"]);
    }

    #[test]
    fn test_same_date_breaks_tie_by_odometer() {
        let car = vehicle("Civic", "Car");
        let records = vec![record(car.id, 3, 1000.0), record(car.id, 3, 1200.0)];

        let rows = project_log(&records, &[car], None, DisplayOrder::DateDesc);

        assert_eq!(rows[0].odometer, 1200.0);
        assert_eq!(rows[1].odometer, 1000.0);
    }

    #[test]
    fn test_metadata_join_and_fallback() {
        let bike = vehicle("Scoopy", "Motorcycle");
        let orphan = Uuid::new_v4();
        let records = vec![record(bike.id, 1, 100.0), record(orphan, 2, 50.0)];

        let rows = project_log(&records, &[bike], None, DisplayOrder::OdometerDesc);

        assert_eq!(rows[0].vehicle_meta.name, "Scoopy");
        assert_eq!(rows[0].vehicle_meta.icon, "🏍️");
        assert_eq!(rows[1].vehicle_meta.name, "Vehicle");
        assert_eq!(rows[1].vehicle_meta.color_hex, FALLBACK_COLOR_HEX);
    }

    #[test]
    fn test_filter_keeps_order_and_values() {
        let a = vehicle("A", "Car");
        let b = vehicle("B", "Van");
        let records = vec![
            record(a.id, 1, 1000.0),
            record(a.id, 4, 1300.0),
            record(b.id, 2, 500.0),
            record(b.id, 3, 900.0),
        ];
        let vehicles = vec![a.clone(), b];

        let all = project_log(&records, &vehicles, None, DisplayOrder::DateDesc);
        let only_a = project_log(&records, &vehicles, Some(a.id), DisplayOrder::DateDesc);

        let expected: Vec<_> = all.into_iter().filter(|r| r.vehicle_id == a.id).collect();
        assert_eq!(only_a, expected);
        assert_eq!(only_a.len(), 2);
        assert_eq!(only_a[0].distance, Some(300.0));
        assert!(only_a[1].distance.is_none());
    }
}
