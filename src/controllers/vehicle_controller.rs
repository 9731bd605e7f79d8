use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::{FuelRecord, Summary};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController<'a> {
    state: &'a AppState,
}

impl<'a> VehicleController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self.state.writes.insert_vehicle(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle created",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .state
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.state.store.list_vehicles().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self.state.writes.patch_vehicle(id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle updated",
        ))
    }

    /// Borra el vehículo y sus repostajes
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.state.writes.delete_vehicle(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        Ok(())
    }

    /// Resumen del dashboard del vehículo
    pub async fn summary(&self, id: Uuid) -> Result<Summary, AppError> {
        let view = self.state.current_view().await;
        if !view.vehicles.iter().any(|v| v.id == id) {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        Ok(view.summary_for(Some(id)))
    }

    /// Último repostaje (mayor odómetro), el que usa el validador
    pub async fn last_record(&self, id: Uuid) -> Result<Option<FuelRecord>, AppError> {
        if self.state.store.find_vehicle(id).await?.is_none() {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        self.state.store.last_record_for_vehicle(id).await
    }
}
