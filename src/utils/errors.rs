//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del servicio de mantenimiento
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vehicle {0} not found")]
    VehicleNotFound(i64),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("A cancellation reason is required")]
    MissingReason,

    #[error("Invalid spare part: {0}")]
    InvalidPartSpec(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl AppError {
    /// Código estable expuesto a los clientes
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::VehicleNotFound(_) => "VEHICLE_NOT_FOUND",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::MissingReason => "MISSING_REASON",
            AppError::InvalidPartSpec(_) => "INVALID_PART_SPEC",
            AppError::Database(_) => "DB_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidStatus(_) | AppError::MissingReason => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) | AppError::VehicleNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::InvalidPartSpec(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Los detalles de infraestructura se quedan en los logs
        let message = match &self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                "An error occurred while accessing the database".to_string()
            }
            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                "An unexpected error occurred".to_string()
            }
            other => {
                warn!("⚠️ Request rejected: {}", other);
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message,
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found_error("Maintenance", 7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::VehicleNotFound(-1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidState("COMPLETED".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::MissingReason.code(), "MISSING_REASON");
    }

    #[test]
    fn test_not_found_message() {
        let err = not_found_error("Maintenance", 12);
        assert_eq!(err.to_string(), "Not found: Maintenance 12 not found");
    }
}
