use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Json, Router,
};
use futures::stream::{self, Stream};
use tracing::debug;
use uuid::Uuid;

use crate::controllers::fuel_record_controller::{fuel_log_from_view, FuelRecordController};
use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_record_dto::{
    DeleteAllResponse, FuelLogQuery, FuelLogResponse, SummaryQuery, ValidateRecordResponse,
};
use crate::models::{FuelRecord, Summary};
use crate::services::record_validator::RecordCandidate;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_record_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_records).post(create_record).delete(delete_all_records),
        )
        .route("/validate", post(validate_record))
        .route("/stream", get(stream_records))
        .route("/:id", put(update_record).delete(delete_record))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.summary(query).await?;
    Ok(Json(response))
}

async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<FuelLogQuery>,
) -> Result<Json<FuelLogResponse>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.log(query).await?;
    Ok(Json(response))
}

async fn create_record(
    State(state): State<AppState>,
    Json(candidate): Json<RecordCandidate>,
) -> Result<Json<ApiResponse<FuelRecord>>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.create(candidate).await?;
    Ok(Json(response))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(candidate): Json<RecordCandidate>,
) -> Result<Json<ApiResponse<FuelRecord>>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.update(id, candidate).await?;
    Ok(Json(response))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = FuelRecordController::new(&state);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Fuel record deleted"
    })))
}

async fn delete_all_records(
    State(state): State<AppState>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.delete_all().await?;
    Ok(Json(response))
}

async fn validate_record(
    State(state): State<AppState>,
    Json(candidate): Json<RecordCandidate>,
) -> Result<Json<ValidateRecordResponse>, AppError> {
    let controller = FuelRecordController::new(&state);
    let response = controller.validate(candidate).await?;
    Ok(Json(response))
}

/// Server-Sent Events: un evento `log` con la vista actual y otro por cada recálculo
async fn stream_records(
    State(state): State<AppState>,
    Query(query): Query<FuelLogQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.engine.subscribe();

    let events = stream::unfold((receiver, query, true), |(mut receiver, query, first)| async move {
        if !first && receiver.changed().await.is_err() {
            return None;
        }
        let view = receiver.borrow_and_update().clone();
        let payload = fuel_log_from_view(&view, &query);
        debug!(revision = view.revision, rows = payload.count, "📡 Evento de log enviado");

        let event = match serde_json::to_string(&payload) {
            Ok(data) => Event::default()
                .event("log")
                .id(view.revision.to_string())
                .data(data),
            Err(e) => Event::default().event("error").data(e.to_string()),
        };
        Some((Ok(event), (receiver, query, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
