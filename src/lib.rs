//! Servicio de mantenimiento de flota
//!
//! Programa, ejecuta y cierra los mantenimientos de los vehículos, calcula
//! sus costos y mantiene sincronizado el estado de disponibilidad en el
//! registro de vehículos.

pub mod clients;
pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_for;
use crate::state::AppState;

/// Construye el router completo de la API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_for(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/maintenance", routes::create_maintenance_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "service": "fleet-maintenance",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
