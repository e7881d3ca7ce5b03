use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::Value;

use fleet_maintenance::clients::{
    HttpVehicleRegistry, RegistryError, VehicleAvailability, VehicleRegistry,
};
use fleet_maintenance::config::RegistryConfig;

type Received = Arc<Mutex<Vec<(i64, Value)>>>;

async fn get_vehicle(Path(id): Path<i64>) -> StatusCode {
    match id {
        1 => StatusCode::OK,
        3 => StatusCode::INTERNAL_SERVER_ERROR,
        4 => StatusCode::FORBIDDEN,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn set_status(
    State(received): State<Received>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> StatusCode {
    received.lock().unwrap().push((id, body));
    if id == 3 {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Levanta un registro falso en un puerto efímero
async fn spawn_registry() -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/api/vehicles/:id", get(get_vehicle))
        .route("/api/vehicles/:id/status", patch(set_status))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

fn client_for(base_url: String) -> HttpVehicleRegistry {
    HttpVehicleRegistry::new(&RegistryConfig {
        base_url,
        exists_timeout: Duration::from_secs(2),
        status_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn test_exists_maps_status_codes() {
    let (base_url, _) = spawn_registry().await;
    let client = client_for(base_url);

    assert!(client.exists(1).await.unwrap());
    assert!(!client.exists(2).await.unwrap());
    assert!(!client.exists(4).await.unwrap());
    assert!(matches!(
        client.exists(3).await,
        Err(RegistryError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_set_status_sends_registry_literal() {
    let (base_url, received) = spawn_registry().await;
    let client = client_for(format!("{}/", base_url));

    client
        .set_status(1, VehicleAvailability::InMaintenance)
        .await
        .unwrap();
    client
        .set_status(2, VehicleAvailability::Available)
        .await
        .unwrap();

    let received = received.lock().unwrap().clone();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].0, 1);
    assert_eq!(received[0].1["status"], "MAINTENANCE");
    assert_eq!(received[1].0, 2);
    assert_eq!(received[1].1["status"], "DISPONIBLE");
}

#[tokio::test]
async fn test_set_status_failure_is_reported() {
    let (base_url, _) = spawn_registry().await;
    let client = client_for(base_url);

    let err = client
        .set_status(3, VehicleAvailability::Available)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_unreachable_registry_is_a_transport_error() {
    // Puerto liberado inmediatamente: la conexión es rechazada
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}", addr));
    assert!(matches!(client.exists(1).await, Err(RegistryError::Http(_))));
}
