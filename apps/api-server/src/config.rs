//! Application configuration loaded from environment variables.

use std::env;

use sparkblog_infra::{DatabaseConfig, GenerationConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on in-memory storage.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            generation: GenerationConfig::from_env(),
        }
    }
}
