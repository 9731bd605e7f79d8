use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_record_dto::{
    DeleteAllResponse, FuelLogQuery, FuelLogResponse, SummaryQuery, ValidateRecordResponse,
};
use crate::models::{EfficiencyView, FuelRecord, Summary};
use crate::services::log_projector::present;
use crate::services::record_validator::{validate_with, RecordCandidate, ValidationContext};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct FuelRecordController<'a> {
    state: &'a AppState,
}

/// Filas y resumen para un filtro, sin recalcular intervalos
pub fn fuel_log_from_view(view: &EfficiencyView, query: &FuelLogQuery) -> FuelLogResponse {
    let rows = present(view.rows.clone(), query.vehicle_id, query.order);
    FuelLogResponse {
        revision: view.revision,
        count: rows.len(),
        rows,
        summary: view.summary_for(query.vehicle_id),
    }
}

impl<'a> FuelRecordController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn log(&self, query: FuelLogQuery) -> Result<FuelLogResponse, AppError> {
        let view = self.state.current_view().await;
        Ok(fuel_log_from_view(&view, &query))
    }

    pub async fn summary(&self, query: SummaryQuery) -> Result<Summary, AppError> {
        let view = self.state.current_view().await;
        Ok(view.summary_for(query.vehicle_id))
    }

    pub async fn create(&self, candidate: RecordCandidate) -> Result<ApiResponse<FuelRecord>, AppError> {
        let record = self
            .state
            .writes
            .insert_record(candidate, self.state.today())
            .await?;
        Ok(ApiResponse::success_with_message(record, "Record added"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        candidate: RecordCandidate,
    ) -> Result<ApiResponse<FuelRecord>, AppError> {
        let record = self
            .state
            .writes
            .update_record(id, candidate, self.state.today())
            .await?;
        Ok(ApiResponse::success_with_message(record, "Record updated"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.state.writes.delete_record(id).await? {
            return Err(not_found_error("Fuel record", &id.to_string()));
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<DeleteAllResponse, AppError> {
        let deleted = self.state.writes.delete_all_records().await?;
        Ok(DeleteAllResponse { deleted })
    }

    /// Validación síncrona contra el último registro conocido, sin escribir
    pub async fn validate(&self, candidate: RecordCandidate) -> Result<ValidateRecordResponse, AppError> {
        let (vehicle_exists, last) = match candidate.vehicle_id {
            Some(vehicle_id) => (
                self.state.store.find_vehicle(vehicle_id).await?.is_some(),
                self.state.store.last_record_for_vehicle(vehicle_id).await?,
            ),
            None => (false, None),
        };

        let ctx = ValidationContext {
            vehicle_exists,
            ..ValidationContext::new(last.as_ref(), self.state.today())
        };
        let reasons = validate_with(&candidate, &ctx);

        Ok(ValidateRecordResponse {
            valid: reasons.is_empty(),
            reasons,
        })
    }
}
