//! Billing API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Per-tenant business configuration (approval rules, GST rate)
//! lives in the database, not here.

use serde::{Deserialize, Serialize};
use std::env;

use salon_core::DEFAULT_TENANT_ID;

/// Billing API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Tenant served by this instance (single-tenant runtime)
    pub tenant_id: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./salon.db".to_string()),

            tenant_id: env::var("TENANT_ID").unwrap_or_else(|_| DEFAULT_TENANT_ID.to_string()),
        };

        if config.tenant_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue("TENANT_ID".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
