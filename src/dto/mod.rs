//! DTOs de la API
//!
//! Requests y responses de los endpoints HTTP.

pub mod api_response;
pub mod fuel_record_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
