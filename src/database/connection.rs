//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y aplica las migraciones del esquema de mantenimiento.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Conexión a la base de datos con el esquema ya migrado
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abre el pool y ejecuta las migraciones pendientes
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error conectando a la base de datos")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Error ejecutando migraciones")?;

        info!("✅ Base de datos lista");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
