//! Controladores
//!
//! Orquestan store, cola de escritura y motor para cada endpoint.

pub mod fuel_record_controller;
pub mod vehicle_controller;

pub use fuel_record_controller::FuelRecordController;
pub use vehicle_controller::VehicleController;
