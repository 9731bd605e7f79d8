use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use fuelwise_log::config::EnvironmentConfig;
use fuelwise_log::repositories::{MemoryRecordStore, RecordStore};
use fuelwise_log::routes::create_app;
use fuelwise_log::state::AppState;

async fn create_test_app() -> Router {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let state = AppState::build(store, EnvironmentConfig::default())
        .await
        .unwrap();
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_vehicle(app: &Router, name: &str, vehicle_type: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/vehicles",
        Some(json!({
            "name": name,
            "vehicle_type": vehicle_type,
            "color_hex": "#3366cc",
            "plate_number": "wxy 1234"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn record(vehicle_id: &str, date: &str, odometer: f64, volume: f64, cost: f64) -> Value {
    json!({
        "vehicle_id": vehicle_id,
        "date": date,
        "volume": volume,
        "cost": cost,
        "odometer": odometer
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_create_vehicle_invalid_color() {
    let app = create_test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({ "name": "Myvi", "vehicle_type": "Car", "color_hex": "blue" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vehicle_crud() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color_hex"], "#3366CC");
    assert_eq!(body["kind"], "car");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/vehicles/{}", id),
        Some(json!({ "name": "Myvi SE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Myvi SE");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_records_log_and_summary() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;

    for (date, odometer, volume, cost) in [("2024-03-01", 1000.0, 10.0, 30.0), ("2024-03-08", 1300.0, 12.0, 40.0)] {
        let (status, _) = send(&app, Method::POST, "/api/records", Some(record(&id, date, odometer, volume, cost))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, &format!("/api/records?vehicle_id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["rows"][0]["odometer"], 1300.0);
    assert_eq!(body["rows"][0]["distance"], 300.0);
    let consumption = body["rows"][0]["consumption_per_100"].as_f64().unwrap();
    assert!((consumption - 4.0).abs() < 1e-9);
    assert_eq!(body["rows"][1]["has_efficiency"], false);
    assert_eq!(body["rows"][0]["vehicle_meta"]["name"], "Myvi");

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}/summary", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_distance"], 300.0);
    assert_eq!(body["insufficient_data"], false);

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}/last-record", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["odometer"], 1300.0);
}

#[tokio::test]
async fn test_rejected_record_returns_reasons() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;
    send(&app, Method::POST, "/api/records", Some(record(&id, "2024-03-08", 1300.0, 12.0, 40.0))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/records",
        Some(record(&id, "2024-03-09", 1250.0, -1.0, 40.0)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "RECORD_REJECTED");
    let reasons = body["details"]["reasons"].as_array().unwrap();
    assert!(reasons.contains(&json!({ "code": "MUST_BE_POSITIVE", "field": "volume" })));
    assert!(reasons.contains(&json!({ "code": "ODOMETER_MUST_INCREASE", "threshold": 1300.0 })));
}

#[tokio::test]
async fn test_validate_endpoint_does_not_write() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/records/validate",
        Some(record(&id, "2024-03-08", 1300.0, 12.0, 40.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);

    let (status, body) = send(&app, Method::POST, "/api/records/validate", Some(json!({ "date": "not-a-date" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    let codes: Vec<&str> = body["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["code"].as_str())
        .collect();
    assert!(codes.contains(&"NO_VEHICLE_SELECTED"));
    assert!(codes.contains(&"INVALID_DATE"));

    let (_, body) = send(&app, Method::GET, "/api/records", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_fleet_summary_and_delete_all() {
    let app = create_test_app().await;
    let car = create_vehicle(&app, "Myvi", "Car").await;
    let lorry = create_vehicle(&app, "Hilux", "Truck").await;

    for (vehicle, odometer, volume, cost) in [
        (&car, 1000.0, 10.0, 30.0),
        (&car, 1300.0, 12.0, 40.0),
        (&lorry, 500.0, 20.0, 60.0),
        (&lorry, 900.0, 30.0, 90.0),
    ] {
        send(&app, Method::POST, "/api/records", Some(record(vehicle, "2024-03-01", odometer, volume, cost))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_distance"], 700.0);

    let (status, body) = send(&app, Method::DELETE, "/api/records", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 4);

    let (_, body) = send(&app, Method::GET, "/api/summary", None).await;
    assert_eq!(body["insufficient_data"], true);
}

#[tokio::test]
async fn test_delete_unknown_record() {
    let app = create_test_app().await;
    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/records/00000000-0000-0000-0000-000000000001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Lee el siguiente evento SSE completo y devuelve (nombre, data JSON)
async fn next_event<S>(body: &mut S, buffer: &mut String) -> (String, Value)
where
    S: Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    loop {
        if let Some(end) = buffer.find("\n\n") {
            let raw: String = buffer.drain(..end + 2).collect();
            let mut name = String::new();
            let mut data = String::new();
            for line in raw.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    name = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push_str(value.trim());
                }
            }
            if data.is_empty() {
                continue;
            }
            return (name, serde_json::from_str(&data).unwrap());
        }
        let chunk = body.next().await.unwrap().unwrap();
        buffer.push_str(&String::from_utf8_lossy(&chunk));
    }
}

#[tokio::test]
async fn test_stream_emits_initial_log_and_updates() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;

    let request = Request::builder()
        .uri(format!("/api/records/stream?vehicle_id={}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");

    let mut body = response.into_body().into_data_stream();
    let mut buffer = String::new();

    let (name, first) = next_event(&mut body, &mut buffer).await;
    assert_eq!(name, "log");
    assert_eq!(first["count"], 0);

    let (status, _) = send(&app, Method::POST, "/api/records", Some(record(&id, "2024-03-01", 1000.0, 10.0, 30.0))).await;
    assert_eq!(status, StatusCode::OK);

    // Puede llegar antes un recálculo pendiente de la creación del vehículo
    let update = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (name, event) = next_event(&mut body, &mut buffer).await;
            if event["count"] == 1 {
                return (name, event);
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(update.0, "log");
    assert_eq!(update.1["rows"][0]["odometer"], 1000.0);
    assert_eq!(update.1["summary"]["insufficient_data"], true);
}

#[tokio::test]
async fn test_update_vehicle_can_clear_plate() {
    let app = create_test_app().await;
    let id = create_vehicle(&app, "Myvi", "Car").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/vehicles/{}", id),
        Some(json!({ "plate_number": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plate_number"], Value::Null);
    assert_eq!(body["data"]["name"], "Myvi");
}
