use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::{
    ApiResponse, CancelRequest, ConditionReport, CostResponse, LegacyCloseRequest,
    LegacyCreateRequest, MaintenanceDto, MaintenanceReport, MaintenanceRequest,
    MaintenanceResponse, RepairRequest, RepairResponse, ReportQuery, StatusUpdateRequest,
};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_maintenance))
        .route("/upcoming", get(get_upcoming_maintenances))
        .route("/report", get(generate_report))
        .route("/repair", post(record_repair))
        .route("/condition", post(update_vehicle_condition))
        .route("/legacy", post(create_maintenance_legacy))
        .route("/vehicle/:vehicle_id", get(get_maintenance_history))
        .route("/:id", get(get_maintenance))
        .route("/:id/status", put(update_status))
        .route("/:id/cost", get(calculate_cost))
        .route("/:id/cancel", post(cancel_maintenance))
        .route("/:id/close", post(close_maintenance_legacy))
}

/// Body ausente o ilegible: se responde con el mismo error de validación
fn required<T>(body: Option<Json<T>>) -> Result<T, AppError> {
    body.map(|Json(request)| request)
        .ok_or_else(|| validation_error("request is required"))
}

async fn schedule_maintenance(
    State(state): State<AppState>,
    body: Option<Json<MaintenanceRequest>>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let request = required(body)?;
    let response = state.maintenance.schedule_maintenance(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Maintenance scheduled".to_string(),
    )))
}

async fn get_upcoming_maintenances(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaintenanceResponse>>, AppError> {
    let response = state.maintenance.get_upcoming_maintenances().await?;
    Ok(Json(response))
}

async fn generate_report(
    State(state): State<AppState>,
    query: Option<Query<ReportQuery>>,
) -> Result<Json<MaintenanceReport>, AppError> {
    let Query(range) =
        query.ok_or_else(|| validation_error("start and end query parameters are required"))?;
    let report = state
        .maintenance
        .generate_report(range.start, range.end)
        .await?;
    Ok(Json(report))
}

async fn get_maintenance_history(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<Vec<MaintenanceResponse>>, AppError> {
    let response = state.maintenance.get_maintenance_history(vehicle_id).await?;
    Ok(Json(response))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MaintenanceResponse>, AppError> {
    let response = state.maintenance.get_maintenance_by_id(id).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<StatusUpdateRequest>>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let request = required(body)?;
    let response = state.maintenance.update_status(id, &request.status).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Maintenance status updated".to_string(),
    )))
}

async fn record_repair(
    State(state): State<AppState>,
    body: Option<Json<RepairRequest>>,
) -> Result<Json<ApiResponse<RepairResponse>>, AppError> {
    let request = required(body)?;
    let response = state.maintenance.record_repair(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Repair recorded".to_string(),
    )))
}

async fn update_vehicle_condition(
    State(state): State<AppState>,
    body: Option<Json<ConditionReport>>,
) -> Result<Json<ApiResponse<Option<MaintenanceResponse>>>, AppError> {
    let report = required(body)?;
    let created = state.maintenance.update_vehicle_condition(report).await?;
    let message = match &created {
        Some(_) => "Corrective maintenance scheduled",
        None => "No issues found",
    };
    Ok(Json(ApiResponse::success_with_message(
        created,
        message.to_string(),
    )))
}

async fn calculate_cost(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CostResponse>, AppError> {
    let total_cost = state.maintenance.calculate_cost(id).await?;
    Ok(Json(CostResponse {
        maintenance_id: id,
        total_cost,
    }))
}

async fn cancel_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<CancelRequest>>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let request = required(body)?;
    let response = state
        .maintenance
        .cancel_maintenance(id, &request.reason)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Maintenance cancelled".to_string(),
    )))
}

async fn create_maintenance_legacy(
    State(state): State<AppState>,
    body: Option<Json<LegacyCreateRequest>>,
) -> Result<Json<ApiResponse<MaintenanceDto>>, AppError> {
    let request = required(body)?;
    let response = state
        .maintenance
        .create_maintenance(
            request.vehicle_id,
            request.maintenance_type.as_deref(),
            request.description,
            request.scheduled_date,
        )
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn close_maintenance_legacy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<LegacyCloseRequest>>,
) -> Result<Json<ApiResponse<MaintenanceDto>>, AppError> {
    let request = required(body)?;
    let response = state
        .maintenance
        .close_maintenance(id, request.date_fin)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}
