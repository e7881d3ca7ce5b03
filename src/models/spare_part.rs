//! Modelo de SparePart
//!
//! Un repuesto consumido durante una reparación. Pertenece a un único
//! registro de mantenimiento y es inmutable una vez creado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::errors::{AppError, AppResult};

/// Repuesto registrado en un mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparePart {
    /// `None` hasta que el store lo persiste
    pub id: Option<i64>,
    pub maintenance_id: i64,
    pub name: String,
    pub part_number: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Siempre `quantity × unit_price`, calculado al construir
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl SparePart {
    pub fn new(
        maintenance_id: i64,
        spec: NewSparePart,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let total_price = spec.total_price().ok_or_else(|| {
            AppError::InvalidPartSpec(format!(
                "total of {} × {} overflows",
                spec.quantity, spec.unit_price
            ))
        })?;

        Ok(Self {
            id: None,
            maintenance_id,
            name: spec.name,
            part_number: spec.part_number,
            quantity: spec.quantity,
            unit_price: spec.unit_price,
            total_price,
            created_at,
        })
    }
}

/// Especificación de un repuesto a añadir
#[derive(Debug, Clone, PartialEq)]
pub struct NewSparePart {
    pub name: String,
    pub part_number: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewSparePart {
    /// `quantity × unit_price`, `None` si desborda
    pub fn total_price(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}
