//! Validador de repostajes
//!
//! Se consulta antes de cualquier escritura. Revisa todos los campos en una
//! sola pasada y devuelve la lista completa de motivos, sin cortar en el
//! primero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{FuelRecord, NewFuelRecord, RecordField, ValidationReason};
use crate::utils::validation::{parse_iso_date, validate_positive};

/// Valor numérico tal como llega del cliente: número JSON o texto de formulario
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn parse(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Candidato a repostaje, todavía sin validar
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordCandidate {
    pub vehicle_id: Option<Uuid>,
    /// Fecha ISO `YYYY-MM-DD`
    pub date: Option<String>,
    pub volume: Option<NumericInput>,
    pub cost: Option<NumericInput>,
    pub odometer: Option<NumericInput>,
}

/// Lo que el validador necesita saber del store
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Registro con mayor odómetro por debajo del candidato (o el último del vehículo)
    pub last_for_vehicle: Option<&'a FuelRecord>,
    /// Registro siguiente; sólo existe al editar un registro intermedio
    pub next_for_vehicle: Option<&'a FuelRecord>,
    pub vehicle_exists: bool,
    pub today: NaiveDate,
}

impl<'a> ValidationContext<'a> {
    pub fn new(last_for_vehicle: Option<&'a FuelRecord>, today: NaiveDate) -> Self {
        Self {
            last_for_vehicle,
            next_for_vehicle: None,
            vehicle_exists: true,
            today,
        }
    }
}

/// Valida un candidato contra el último registro conocido de su vehículo
pub fn validate(
    candidate: &RecordCandidate,
    last_for_vehicle: Option<&FuelRecord>,
    today: NaiveDate,
) -> Vec<ValidationReason> {
    validate_with(candidate, &ValidationContext::new(last_for_vehicle, today))
}

pub fn validate_with(candidate: &RecordCandidate, ctx: &ValidationContext<'_>) -> Vec<ValidationReason> {
    match parse_candidate(candidate, ctx) {
        Ok(_) => Vec::new(),
        Err(reasons) => reasons,
    }
}

/// Convierte el candidato en un `NewFuelRecord` o devuelve todos los motivos de rechazo
pub fn parse_candidate(
    candidate: &RecordCandidate,
    ctx: &ValidationContext<'_>,
) -> Result<NewFuelRecord, Vec<ValidationReason>> {
    let mut reasons = Vec::new();

    let vehicle_id = match candidate.vehicle_id {
        None => {
            reasons.push(ValidationReason::NoVehicleSelected);
            None
        }
        Some(_) if !ctx.vehicle_exists => {
            reasons.push(ValidationReason::UnknownVehicle);
            None
        }
        Some(id) => Some(id),
    };

    let date = candidate
        .date
        .as_deref()
        .and_then(|raw| parse_iso_date(raw).ok())
        .filter(|date| *date <= ctx.today);
    if date.is_none() {
        reasons.push(ValidationReason::InvalidDate);
    }

    let volume = positive_field(candidate.volume.as_ref(), RecordField::Volume, &mut reasons);
    let cost = positive_field(candidate.cost.as_ref(), RecordField::Cost, &mut reasons);
    let odometer = positive_field(candidate.odometer.as_ref(), RecordField::Odometer, &mut reasons);

    // El orden del odómetro sólo se revisa si el valor en sí es válido
    if let Some(odometer) = odometer {
        if let Some(last) = ctx.last_for_vehicle {
            if odometer <= last.odometer {
                reasons.push(ValidationReason::OdometerMustIncrease {
                    threshold: last.odometer,
                });
            }
        }
        if let Some(next) = ctx.next_for_vehicle {
            if odometer >= next.odometer {
                reasons.push(ValidationReason::OdometerMustBeBelow {
                    threshold: next.odometer,
                });
            }
        }
    }

    match (vehicle_id, date, volume, cost, odometer) {
        (Some(vehicle_id), Some(date), Some(volume), Some(cost), Some(odometer)) if reasons.is_empty() => {
            Ok(NewFuelRecord {
                vehicle_id,
                date,
                volume,
                cost,
                odometer,
            })
        }
        _ => Err(reasons),
    }
}

fn positive_field(
    input: Option<&NumericInput>,
    field: RecordField,
    reasons: &mut Vec<ValidationReason>,
) -> Option<f64> {
    let Some(value) = input.and_then(NumericInput::parse) else {
        reasons.push(ValidationReason::InvalidNumber { field });
        return None;
    };
    if validate_positive(value).is_err() {
        reasons.push(ValidationReason::MustBePositive { field });
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn candidate(odometer: f64) -> RecordCandidate {
        RecordCandidate {
            vehicle_id: Some(Uuid::new_v4()),
            date: Some("2024-05-30".to_string()),
            volume: Some(NumericInput::Number(12.0)),
            cost: Some(NumericInput::Number(40.0)),
            odometer: Some(NumericInput::Number(odometer)),
        }
    }

    fn last(odometer: f64) -> FuelRecord {
        FuelRecord {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            volume: 10.0,
            cost: 30.0,
            odometer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_accepts_first_record_with_any_positive_odometer() {
        assert!(validate(&candidate(0.1), None, today()).is_empty());
        assert!(validate(&candidate(250_000.0), None, today()).is_empty());
    }

    #[test]
    fn test_rejects_non_increasing_odometer() {
        let previous = last(1300.0);

        assert_eq!(
            validate(&candidate(1250.0), Some(&previous), today()),
            vec![ValidationReason::OdometerMustIncrease { threshold: 1300.0 }]
        );
        assert_eq!(
            validate(&candidate(1300.0), Some(&previous), today()),
            vec![ValidationReason::OdometerMustIncrease { threshold: 1300.0 }]
        );
        assert!(validate(&candidate(1300.5), Some(&previous), today()).is_empty());
    }

    #[test]
    fn test_collects_every_reason_in_one_pass() {
        let bad = RecordCandidate {
            vehicle_id: None,
            date: None,
            volume: Some(NumericInput::Number(0.0)),
            cost: Some(NumericInput::Number(-3.0)),
            odometer: Some(NumericInput::Text("abc".to_string())),
        };

        let reasons = validate(&bad, None, today());

        assert_eq!(
            reasons,
            vec![
                ValidationReason::NoVehicleSelected,
                ValidationReason::InvalidDate,
                ValidationReason::MustBePositive { field: RecordField::Volume },
                ValidationReason::MustBePositive { field: RecordField::Cost },
                ValidationReason::InvalidNumber { field: RecordField::Odometer },
            ]
        );
    }

    #[test]
    fn test_future_date_is_invalid() {
        let mut future = candidate(100.0);
        future.date = Some("2024-06-02".to_string());
        assert_eq!(validate(&future, None, today()), vec![ValidationReason::InvalidDate]);

        let mut same_day = candidate(100.0);
        same_day.date = Some("2024-06-01".to_string());
        assert!(validate(&same_day, None, today()).is_empty());
    }

    #[test]
    fn test_malformed_date_is_invalid() {
        let mut c = candidate(100.0);
        c.date = Some("01/06/2024".to_string());
        assert_eq!(validate(&c, None, today()), vec![ValidationReason::InvalidDate]);
    }

    #[test]
    fn test_text_numbers_are_parsed() {
        let c = RecordCandidate {
            volume: Some(NumericInput::Text(" 12.5 ".to_string())),
            cost: Some(NumericInput::Text("40".to_string())),
            odometer: Some(NumericInput::Text("1400".to_string())),
            ..candidate(1.0)
        };

        let parsed = parse_candidate(&c, &ValidationContext::new(None, today())).unwrap();

        assert_eq!(parsed.volume, 12.5);
        assert_eq!(parsed.cost, 40.0);
        assert_eq!(parsed.odometer, 1400.0);
    }

    #[test]
    fn test_missing_number_is_invalid_number() {
        let mut c = candidate(100.0);
        c.cost = None;
        assert_eq!(
            validate(&c, None, today()),
            vec![ValidationReason::InvalidNumber { field: RecordField::Cost }]
        );
    }

    #[test]
    fn test_non_positive_odometer_skips_order_check() {
        let previous = last(1300.0);
        assert_eq!(
            validate(&candidate(0.0), Some(&previous), today()),
            vec![ValidationReason::MustBePositive { field: RecordField::Odometer }]
        );
    }

    #[test]
    fn test_update_bounded_by_next_record() {
        let previous = last(1000.0);
        let next = last(1300.0);
        let ctx = ValidationContext {
            last_for_vehicle: Some(&previous),
            next_for_vehicle: Some(&next),
            vehicle_exists: true,
            today: today(),
        };

        assert!(validate_with(&candidate(1200.0), &ctx).is_empty());
        assert_eq!(
            validate_with(&candidate(1300.0), &ctx),
            vec![ValidationReason::OdometerMustBeBelow { threshold: 1300.0 }]
        );
    }

    #[test]
    fn test_unknown_vehicle() {
        let ctx = ValidationContext {
            vehicle_exists: false,
            ..ValidationContext::new(None, today())
        };
        assert_eq!(
            validate_with(&candidate(100.0), &ctx),
            vec![ValidationReason::UnknownVehicle]
        );
    }
}
