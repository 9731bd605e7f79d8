use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DisplayOrder, FuelLogRow, Summary, ValidationReason};

// Query del log: filtro por vehículo y orden de presentación
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuelLogQuery {
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub order: DisplayOrder,
}

// Query del resumen
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub vehicle_id: Option<Uuid>,
}

// Response del log
#[derive(Debug, Serialize)]
pub struct FuelLogResponse {
    pub revision: u64,
    pub count: usize,
    pub rows: Vec<FuelLogRow>,
    pub summary: Summary,
}

// Response de la validación síncrona
#[derive(Debug, Serialize)]
pub struct ValidateRecordResponse {
    pub valid: bool,
    pub reasons: Vec<ValidationReason>,
}

// Response de un borrado masivo
#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub deleted: u64,
}
