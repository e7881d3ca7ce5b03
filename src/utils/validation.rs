//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no cubre el derive de `validator` (montos `Decimal`, fechas, rangos).

use chrono::{DateTime, Utc};
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud máxima (en caracteres)
pub fn validate_max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        let mut error = ValidationError::new("length");
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Decimales admitidos en los montos (columnas NUMERIC(_, 2))
pub const MONEY_SCALE: u32 = 2;

/// Mayor monto de una columna NUMERIC(10,2): 99.999.999,99
pub fn max_money() -> Decimal {
    Decimal::new(9_999_999_999, MONEY_SCALE)
}

/// Mayor total de repuesto, NUMERIC(12,2): 9.999.999.999,99
pub fn max_part_total() -> Decimal {
    Decimal::new(999_999_999_999, MONEY_SCALE)
}

/// Validar un monto: no negativo, como mucho dos decimales y dentro de NUMERIC(10,2)
pub fn validate_money(value: Decimal) -> Result<(), ValidationError> {
    validate_non_negative(value)?;

    if value.normalize().scale() > MONEY_SCALE {
        let mut error = ValidationError::new("money_scale");
        error.add_param("value".into(), &value);
        return Err(error);
    }

    if value > max_money() {
        let mut error = ValidationError::new("money_range");
        error.add_param("value".into(), &value);
        error.add_param("max".into(), &max_money());
        return Err(error);
    }

    Ok(())
}

/// Validar que un rango de fechas esté ordenado (`start <= end`)
pub fn validate_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        let mut error = ValidationError::new("date_range");
        error.add_param("start".into(), &start.to_rfc3339());
        error.add_param("end".into(), &end.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Convierte el resultado de una validación de campo en `AppError::Validation`
pub fn check_field(field: &str, result: Result<(), ValidationError>) -> AppResult<()> {
    result.map_err(|e| AppError::Validation(format!("{}: failed '{}' check", field, e.code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("brake wear").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_max_length() {
        assert!(validate_max_length("filtre", 10).is_ok());
        assert!(validate_max_length("filtre à huile", 5).is_err());
    }

    #[test]
    fn test_validate_positive_and_non_negative() {
        assert!(validate_positive(1_i64).is_ok());
        assert!(validate_positive(0_i64).is_err());
        assert!(validate_non_negative(Decimal::ZERO).is_ok());
        assert!(validate_non_negative(Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(Decimal::ZERO).is_ok());
        assert!(validate_money(Decimal::from_str("19.90").unwrap()).is_ok());
        // Ceros a la derecha no cuentan como decimales
        assert!(validate_money(Decimal::from_str("1.500").unwrap()).is_ok());
        assert!(validate_money(max_money()).is_ok());

        assert_eq!(
            validate_money(Decimal::from_str("0.125").unwrap()).unwrap_err().code,
            "money_scale"
        );
        assert_eq!(
            validate_money(Decimal::from_str("100000000.00").unwrap()).unwrap_err().code,
            "money_range"
        );
        assert_eq!(validate_money(Decimal::MAX).unwrap_err().code, "money_range");
        assert_eq!(
            validate_money(Decimal::from_str("-1").unwrap()).unwrap_err().code,
            "non_negative"
        );
    }

    #[test]
    fn test_validate_date_range() {
        let now = Utc::now();
        assert!(validate_date_range(now, now).is_ok());
        assert!(validate_date_range(now, now - chrono::Duration::seconds(1)).is_err());
    }

    #[test]
    fn test_check_field_message() {
        let err = check_field("vehicle_id", validate_positive(-1_i64)).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("vehicle_id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
