use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewVehicle, Vehicle, VehicleKind, VehiclePatch};
use crate::utils::validation::{validate_not_blank, validate_plate_number, validate_plate_number_or_blank};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 60), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 1, max = 30), custom = "validate_not_blank")]
    pub vehicle_type: String,

    #[validate(regex = "crate::utils::validation::COLOR_HEX_RE")]
    pub color_hex: String,

    #[validate(length(max = 20), custom = "validate_plate_number")]
    pub plate_number: Option<String>,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            vehicle_type: request.vehicle_type.trim().to_string(),
            color_hex: request.color_hex.to_uppercase(),
            plate_number: normalize_plate(request.plate_number),
        }
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 60), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 30), custom = "validate_not_blank")]
    pub vehicle_type: Option<String>,

    #[validate(regex = "crate::utils::validation::COLOR_HEX_RE")]
    pub color_hex: Option<String>,

    /// Una cadena vacía borra la matrícula; ausente la deja como está
    #[validate(length(max = 20), custom = "validate_plate_number_or_blank")]
    pub plate_number: Option<String>,
}

impl From<UpdateVehicleRequest> for VehiclePatch {
    fn from(request: UpdateVehicleRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            vehicle_type: request.vehicle_type.map(|t| t.trim().to_string()),
            color_hex: request.color_hex.map(|c| c.to_uppercase()),
            plate_number: request.plate_number.map(|p| normalize_plate(Some(p))),
        }
    }
}

fn normalize_plate(plate: Option<String>) -> Option<String> {
    plate
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty())
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub name: String,
    pub vehicle_type: String,
    pub kind: VehicleKind,
    pub icon: &'static str,
    pub color_hex: String,
    pub plate_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        let kind = VehicleKind::from_type_label(&vehicle.vehicle_type);
        Self {
            id: vehicle.id,
            name: vehicle.name,
            vehicle_type: vehicle.vehicle_type,
            kind,
            icon: kind.icon(),
            color_hex: vehicle.color_hex,
            plate_number: vehicle.plate_number,
            created_at: vehicle.created_at,
        }
    }
}
