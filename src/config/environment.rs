//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y del registro de vehículos.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use super::maintenance::MaintenanceSettings;

/// Leer una variable de entorno con valor por defecto
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", key, raw)),
        _ => Ok(default),
    }
}

/// Configuración del registro de vehículos
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub exists_timeout: Duration,
    pub status_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082".to_string(),
            exists_timeout: Duration::from_secs(2),
            status_timeout: Duration::from_secs(5),
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: env::var("VEHICLE_SERVICE_BASEURL").unwrap_or(defaults.base_url),
            exists_timeout: Duration::from_millis(env_or("VEHICLE_EXISTS_TIMEOUT_MS", 2000u64)?),
            status_timeout: Duration::from_millis(env_or("VEHICLE_STATUS_TIMEOUT_MS", 5000u64)?),
        })
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub registry: RegistryConfig,
    pub maintenance: MaintenanceSettings,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            registry: RegistryConfig::default(),
            maintenance: MaintenanceSettings::default(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env_or("PORT", 5000u16)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            registry: RegistryConfig::from_env()?,
            maintenance: MaintenanceSettings::from_env()?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert_eq!(config.registry.exists_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u64 = env_or("FLEET_MAINTENANCE_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(value, 42);
    }
}
