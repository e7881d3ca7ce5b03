use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_maintenance::clients::{HttpVehicleRegistry, VehicleRegistry};
use fleet_maintenance::config::{DatabaseConfig, EnvironmentConfig};
use fleet_maintenance::create_app;
use fleet_maintenance::database::DatabaseConnection;
use fleet_maintenance::repositories::{
    InMemoryMaintenanceStore, MaintenanceStore, PgMaintenanceRepository,
};
use fleet_maintenance::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🔧 Fleet Maintenance Service");
    info!("============================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Store: PostgreSQL si hay DATABASE_URL, memoria si no
    let store: Arc<dyn MaintenanceStore> = match DatabaseConfig::from_env()? {
        Some(db_config) => {
            let connection = DatabaseConnection::connect(&db_config).await?;
            Arc::new(PgMaintenanceRepository::new(connection.pool().clone()))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando store en memoria (los datos no persisten)");
            Arc::new(InMemoryMaintenanceStore::new())
        }
    };

    let registry: Arc<dyn VehicleRegistry> = Arc::new(HttpVehicleRegistry::new(&config.registry)?);
    info!("🚗 Registro de vehículos: {}", config.registry.base_url);
    if config.maintenance.strict_transitions {
        info!("🔒 Transiciones de estado en modo estricto");
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    let app = create_app(AppState::new(config, store, registry));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   POST /api/maintenance - Programar mantenimiento");
    info!("   GET  /api/maintenance/upcoming - Mantenimientos abiertos");
    info!("   GET  /api/maintenance/report?start&end - Reporte por fechas");
    info!("   GET  /api/maintenance/vehicle/:vehicle_id - Historial del vehículo");
    info!("   GET  /api/maintenance/:id - Obtener mantenimiento");
    info!("   PUT  /api/maintenance/:id/status - Cambiar estado");
    info!("   POST /api/maintenance/repair - Registrar reparación");
    info!("   POST /api/maintenance/condition - Reporte de inspección");
    info!("   GET  /api/maintenance/:id/cost - Costo total");
    info!("   POST /api/maintenance/:id/cancel - Cancelar");
    info!("   POST /api/maintenance/legacy - Crear (legacy)");
    info!("   POST /api/maintenance/:id/close - Cerrar (legacy)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
