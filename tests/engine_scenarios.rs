use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use fuelwise_log::models::{DisplayOrder, FuelRecord, NewVehicle, ValidationReason, Vehicle};
use fuelwise_log::repositories::{MemoryRecordStore, RecordStore};
use fuelwise_log::services::log_projector::project_log;
use fuelwise_log::services::{
    compute_intervals, summarize_records, validate, EfficiencyEngine, RecordCandidate, RecordFeed,
    WriteQueue,
};
use fuelwise_log::utils::errors::AppError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn record(vehicle_id: Uuid, day: u32, odometer: f64, volume: f64, cost: f64) -> FuelRecord {
    FuelRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        volume,
        cost,
        odometer,
        created_at: Utc::now(),
    }
}

fn vehicle(id: Uuid, name: &str) -> Vehicle {
    Vehicle {
        id,
        name: name.to_string(),
        vehicle_type: "Car".to_string(),
        color_hex: "#3366CC".to_string(),
        plate_number: None,
        created_at: Utc::now(),
    }
}

fn candidate(vehicle_id: Uuid, odometer: f64) -> RecordCandidate {
    RecordCandidate {
        vehicle_id: Some(vehicle_id),
        date: Some("2024-03-10".to_string()),
        volume: Some(11.0.into()),
        cost: Some(35.0.into()),
        odometer: Some(odometer.into()),
    }
}

#[test]
fn test_second_record_gets_interval() {
    let a = Uuid::new_v4();
    let records = vec![record(a, 1, 1000.0, 10.0, 30.0), record(a, 5, 1300.0, 12.0, 40.0)];

    let intervals = compute_intervals(&records);

    assert!(!intervals[0].has_efficiency());
    assert_eq!(intervals[1].distance, Some(300.0));
    assert!((intervals[1].consumption_per_100.unwrap() - 4.0).abs() < 1e-9);
    assert!((intervals[1].cost_per_distance.unwrap() - 40.0 / 300.0).abs() < 1e-9);
}

#[test]
fn test_lower_odometer_is_rejected_with_threshold() {
    let a = Uuid::new_v4();
    let last = record(a, 5, 1300.0, 12.0, 40.0);

    let reasons = validate(&candidate(a, 1250.0), Some(&last), today());

    assert_eq!(reasons, vec![ValidationReason::OdometerMustIncrease { threshold: 1300.0 }]);
}

#[test]
fn test_first_record_accepts_any_positive_odometer() {
    let reasons = validate(&candidate(Uuid::new_v4(), 0.5), None, today());
    assert!(reasons.is_empty());
}

#[test]
fn test_filter_keeps_order_and_interval_values() {
    let a = Uuid::from_u128(1);
    let b = Uuid::from_u128(2);
    let records = vec![
        record(a, 1, 1000.0, 10.0, 30.0),
        record(a, 8, 1300.0, 12.0, 40.0),
        record(b, 2, 500.0, 20.0, 60.0),
        record(b, 9, 900.0, 25.0, 70.0),
    ];
    let vehicles = vec![vehicle(a, "Myvi"), vehicle(b, "Hilux")];

    let all = project_log(&records, &vehicles, None, DisplayOrder::DateDesc);
    let only_a = project_log(&records, &vehicles, Some(a), DisplayOrder::DateDesc);

    let expected: Vec<_> = all.iter().filter(|row| row.vehicle_id == a).cloned().collect();
    assert_eq!(only_a.len(), 2);
    assert_eq!(only_a, expected);
    assert_eq!(only_a[0].odometer, 1300.0);
    assert_eq!(only_a[0].distance, Some(300.0));
}

#[test]
fn test_single_record_vehicle_has_insufficient_data() {
    let summary = summarize_records(&[record(Uuid::new_v4(), 1, 1000.0, 10.0, 30.0)]);

    assert!(summary.insufficient_data);
    assert_eq!(summary.avg_consumption_per_100, None);
    assert_eq!(summary.avg_cost_per_distance, None);
    assert_eq!(summary.total_distance, 0.0);
}

#[tokio::test]
async fn test_writes_flow_through_engine() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let feed = RecordFeed::new();
    let engine = EfficiencyEngine::spawn(feed.clone());
    let (writes, _writer) = WriteQueue::spawn(store.clone(), feed.clone(), 8);

    let myvi = writes
        .insert_vehicle(NewVehicle {
            name: "Myvi".to_string(),
            vehicle_type: "Car".to_string(),
            color_hex: "#3366CC".to_string(),
            plate_number: Some("WXY 1234".to_string()),
        })
        .await
        .unwrap();

    writes.insert_record(candidate(myvi.id, 1000.0), today()).await.unwrap();
    writes.insert_record(candidate(myvi.id, 1300.0), today()).await.unwrap();
    let rejected = writes.insert_record(candidate(myvi.id, 1250.0), today()).await;

    match rejected {
        Err(AppError::RecordRejected(reasons)) => assert_eq!(
            reasons,
            vec![ValidationReason::OdometerMustIncrease { threshold: 1300.0 }]
        ),
        other => panic!("expected rejection, got {:?}", other),
    }

    let view = engine.latest().await;
    assert_eq!(view.rows.len(), 2);
    let summary = view.summary_for(Some(myvi.id));
    assert_eq!(summary.total_distance, 300.0);
    assert!(!summary.insufficient_data);
    engine.shutdown();
}
