//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Los valores inválidos se reportan como `ConfigError` en vez de abortar.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Backend del Record Store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub write_queue_capacity: usize,
    pub legacy_import_path: Option<PathBuf>,
    pub legacy_vehicle_name: String,
    /// Desfase del usuario respecto a UTC, en minutos; define qué es "hoy"
    pub utc_offset_minutes: i32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            store_backend: StoreBackend::Memory,
            write_queue_capacity: 64,
            legacy_import_path: None,
            legacy_vehicle_name: "My Vehicle".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Lee la configuración del entorno, con valores por defecto para desarrollo
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parsed("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            store_backend: parsed("STORE_BACKEND", defaults.store_backend)?,
            write_queue_capacity: parsed("WRITE_QUEUE_CAPACITY", defaults.write_queue_capacity)?,
            legacy_import_path: env::var("LEGACY_IMPORT_PATH").ok().map(PathBuf::from),
            legacy_vehicle_name: env::var("LEGACY_VEHICLE_NAME").unwrap_or(defaults.legacy_vehicle_name),
            utc_offset_minutes: parse_utc_offset(parsed("UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Los husos reales van de UTC-12 a UTC+14
fn parse_utc_offset(minutes: i32) -> Result<i32, ConfigError> {
    if !(-12 * 60..=14 * 60).contains(&minutes) {
        return Err(ConfigError::InvalidValue {
            name: "UTC_OFFSET_MINUTES",
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
