//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su metadata de presentación y
//! la clasificación por tipo usada para escoger el icono.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Color por defecto cuando el vehículo de un registro ya no existe
pub const FALLBACK_COLOR_HEX: &str = "#B4A7D6";

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub vehicle_type: String,
    pub color_hex: String,
    pub plate_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos de un vehículo antes de ser persistido
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub name: String,
    pub vehicle_type: String,
    pub color_hex: String,
    pub plate_number: Option<String>,
}

impl NewVehicle {
    pub fn into_vehicle(self, id: Uuid) -> Vehicle {
        Vehicle {
            id,
            name: self.name,
            vehicle_type: self.vehicle_type,
            color_hex: self.color_hex,
            plate_number: self.plate_number,
            created_at: Utc::now(),
        }
    }
}

/// Cambios parciales de un vehículo, aplicados dentro de la cola de escritura
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePatch {
    pub name: Option<String>,
    pub vehicle_type: Option<String>,
    pub color_hex: Option<String>,
    /// `Some(None)` borra la matrícula
    pub plate_number: Option<Option<String>>,
}

impl VehiclePatch {
    pub fn apply(self, current: Vehicle) -> Vehicle {
        Vehicle {
            name: self.name.unwrap_or(current.name),
            vehicle_type: self.vehicle_type.unwrap_or(current.vehicle_type),
            color_hex: self.color_hex.unwrap_or(current.color_hex),
            plate_number: self.plate_number.unwrap_or(current.plate_number),
            ..current
        }
    }
}

/// Categoría del vehículo derivada del texto libre `vehicle_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Motorcycle,
    Lorry,
    Van,
    Car,
    Other,
}

impl VehicleKind {
    /// Clasifica por subcadena, en el mismo orden de prioridad que la app móvil
    /// ("motorcar" es moto, "car van" es van).
    pub fn from_type_label(label: &str) -> Self {
        let t = label.trim().to_lowercase();
        if t.contains("motor") {
            Self::Motorcycle
        } else if t.contains("lorry") || t.contains("truck") {
            Self::Lorry
        } else if t.contains("van") {
            Self::Van
        } else if t.contains("car") {
            Self::Car
        } else {
            Self::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Motorcycle => "🏍️",
            Self::Lorry => "🚛",
            Self::Van => "🚐",
            Self::Car => "🚗",
            Self::Other => "🛞",
        }
    }
}

/// Metadata del vehículo que acompaña cada fila del log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMeta {
    pub name: String,
    pub vehicle_type: String,
    pub color_hex: String,
    pub kind: VehicleKind,
    pub icon: &'static str,
}

impl VehicleMeta {
    /// Metadata usada cuando el registro apunta a un vehículo desconocido
    pub fn fallback() -> Self {
        Self::from_parts("Vehicle", "Other", FALLBACK_COLOR_HEX)
    }

    fn from_parts(name: &str, vehicle_type: &str, color_hex: &str) -> Self {
        let kind = VehicleKind::from_type_label(vehicle_type);
        Self {
            name: name.to_string(),
            vehicle_type: vehicle_type.to_string(),
            color_hex: color_hex.to_string(),
            kind,
            icon: kind.icon(),
        }
    }
}

impl From<&Vehicle> for VehicleMeta {
    fn from(vehicle: &Vehicle) -> Self {
        Self::from_parts(&vehicle.name, &vehicle.vehicle_type, &vehicle.color_hex)
    }
}
