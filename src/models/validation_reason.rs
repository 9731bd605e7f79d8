//! Códigos de rechazo del validador de repostajes

use serde::Serialize;
use std::fmt;

/// Campo numérico de un repostaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Volume,
    Cost,
    Odometer,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Cost => "cost",
            Self::Odometer => "odometer",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motivo por el que un candidato no puede escribirse
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationReason {
    MustBePositive { field: RecordField },
    InvalidNumber { field: RecordField },
    OdometerMustIncrease { threshold: f64 },
    OdometerMustBeBelow { threshold: f64 },
    InvalidDate,
    NoVehicleSelected,
    UnknownVehicle,
}

impl ValidationReason {
    /// Nombre del campo del formulario al que se asocia el motivo
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::MustBePositive { field } | Self::InvalidNumber { field } => field.as_str(),
            Self::OdometerMustIncrease { .. } | Self::OdometerMustBeBelow { .. } => "odometer",
            Self::InvalidDate => "date",
            Self::NoVehicleSelected | Self::UnknownVehicle => "vehicle_id",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MustBePositive { .. } => "MUST_BE_POSITIVE",
            Self::InvalidNumber { .. } => "INVALID_NUMBER",
            Self::OdometerMustIncrease { .. } => "ODOMETER_MUST_INCREASE",
            Self::OdometerMustBeBelow { .. } => "ODOMETER_MUST_BE_BELOW",
            Self::InvalidDate => "INVALID_DATE",
            Self::NoVehicleSelected => "NO_VEHICLE_SELECTED",
            Self::UnknownVehicle => "UNKNOWN_VEHICLE",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustBePositive { field } => write!(f, "{} must be greater than 0", field),
            Self::InvalidNumber { field } => write!(f, "{} is not a valid number", field),
            Self::OdometerMustIncrease { threshold } => {
                write!(f, "odometer must be greater than {}", threshold)
            }
            Self::OdometerMustBeBelow { threshold } => {
                write!(f, "odometer must be less than {}", threshold)
            }
            Self::InvalidDate => f.write_str("date is missing, malformed or in the future"),
            Self::NoVehicleSelected => f.write_str("select a vehicle"),
            Self::UnknownVehicle => f.write_str("vehicle does not exist"),
        }
    }
}
