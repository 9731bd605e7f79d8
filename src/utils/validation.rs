//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::models::ValidationReason;

lazy_static! {
    /// Color en formato `#RRGGBB`
    pub static ref COLOR_HEX_RE: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// Validar y convertir string a fecha ISO
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if !(value > T::zero()) {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula (letras, dígitos, espacios y guiones)
pub fn validate_plate_number(value: &str) -> Result<(), ValidationError> {
    let clean_plate: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if clean_plate.is_empty() || !clean_plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("plate_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Como `validate_plate_number`, pero en blanco es válido (borra la matrícula)
pub fn validate_plate_number_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_plate_number(value)
}

/// Agrupa los motivos del validador de repostajes por campo
pub fn reasons_to_errors(reasons: &[ValidationReason]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for reason in reasons {
        let mut error = ValidationError::new(reason.code());
        error.message = Some(reason.to_string().into());
        if let ValidationReason::OdometerMustIncrease { threshold }
        | ValidationReason::OdometerMustBeBelow { threshold } = reason
        {
            error.add_param("threshold".into(), threshold);
        }
        errors.add(reason.field_name(), error);
    }
    errors
}
