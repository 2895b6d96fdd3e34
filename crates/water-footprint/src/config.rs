use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, WaterError};
use crate::models::MAX_READINGS_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origin: String,
    pub readings_default_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding model.json, feature_columns.json and primary_categories.json
    pub artifact_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: match std::env::var("SERVER_PORT") {
                    Ok(v) => v
                        .parse()
                        .map_err(|e| WaterError::config(format!("Invalid port: {}", e)))?,
                    Err(_) => defaults.server.port,
                },
                cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                    .unwrap_or(defaults.server.cors_allowed_origin),
                readings_default_limit: match std::env::var("READINGS_DEFAULT_LIMIT") {
                    Ok(v) => parse_readings_limit(&v)?,
                    Err(_) => defaults.server.readings_default_limit,
                },
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: std::env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
            },
            model: ModelConfig {
                artifact_dir: std::env::var("MODEL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.model.artifact_dir),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.auth.jwt_secret),
                access_token_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.auth.access_token_expire_minutes),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse a default listing limit, which must itself be a valid `?limit` value.
fn parse_readings_limit(raw: &str) -> Result<i64> {
    let limit: i64 = raw
        .trim()
        .parse()
        .map_err(|e| WaterError::config(format!("Invalid readings default limit: {}", e)))?;
    if !(1..=MAX_READINGS_LIMIT).contains(&limit) {
        return Err(WaterError::config(format!(
            "Invalid readings default limit: {} is outside 1..={}",
            limit, MAX_READINGS_LIMIT
        )));
    }
    Ok(limit)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_allowed_origin: "https://waterfootprintcalc.netlify.app".to_string(),
                readings_default_limit: 50,
            },
            database: DatabaseConfig {
                url: "sqlite://water_footprint.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            model: ModelConfig {
                artifact_dir: PathBuf::from("data"),
            },
            auth: AuthConfig {
                jwt_secret: "change_this_secret_for_prod".to_string(),
                access_token_expire_minutes: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.readings_default_limit, 50);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.model.artifact_dir, PathBuf::from("data"));
        assert_eq!(config.auth.access_token_expire_minutes, 60);
    }

    #[test]
    fn test_server_address() {
        let config = Config::default();
        assert_eq!(config.server_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_readings_limit_accepts_range_bounds() {
        assert_eq!(parse_readings_limit("1").unwrap(), 1);
        assert_eq!(parse_readings_limit(" 50 ").unwrap(), 50);
        assert_eq!(parse_readings_limit("1000").unwrap(), MAX_READINGS_LIMIT);
    }

    #[test]
    fn test_readings_limit_rejects_out_of_range() {
        for raw in ["0", "-3", "5000"] {
            let err = parse_readings_limit(raw).unwrap_err();
            assert!(matches!(err, WaterError::Config(_)), "{raw} accepted");
        }
    }

    #[test]
    fn test_readings_limit_rejects_garbage() {
        let err = parse_readings_limit("fifty").unwrap_err();
        assert!(matches!(err, WaterError::Config(_)));
    }

    #[test]
    fn test_database_url_is_sqlite() {
        let config = Config::default();
        assert!(config.database.url.starts_with("sqlite:"));
    }
}
