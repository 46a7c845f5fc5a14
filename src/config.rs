//! On-disk configuration (§1.2): a TOML file loaded at startup, with an
//! `OCPP_CONFIG` env override and a logged fallback to defaults when no file
//! is present — the same shape the reference server's `main.rs` uses.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::database::DatabaseConfig;
use crate::interfaces::ws::WsServerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ws_host: String,
    pub ws_port: u16,
    pub api_host: String,
    pub api_port: u16,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ws_host: "0.0.0.0".to_string(),
            ws_port: 9000,
            api_host: "0.0.0.0".to_string(),
            api_port: 9001,
            shutdown_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Filesystem path to the SQLite database file.
    pub path: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "./data/evcs-ocpp.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// SHA-256 hash of the admin API key presented as `Authorization: Bearer
    /// <key>` on every `/api/*` route (§1.2, §6). Empty means "not yet
    /// bootstrapped" — `main` generates and logs a fresh key once on first run.
    pub api_key_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info"` or
    /// `"evcs_ocpp=debug,tower_http=info"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// WS handshakes accepted per source IP per minute (§4.5).
    pub ws_connections_per_minute: u32,
    /// `/api/*` requests accepted per source IP per minute (§6).
    pub api_requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            ws_connections_per_minute: 30,
            api_requests_per_minute: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Empty or containing `"*"` means "allow any origin" (dev mode).
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Loads and parses `path`. A missing or malformed file is returned as
    /// an error; callers fall back to `AppConfig::default()` with a logged
    /// warning rather than treating it as fatal.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: AppConfig = toml::from_str(&text)?;
        Ok(cfg)
    }

    /// `$OCPP_CONFIG`, else `<OS config dir>/evcs-ocpp/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = std::env::var("OCPP_CONFIG") {
            return PathBuf::from(path);
        }
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("evcs-ocpp")
            .join("config.toml")
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::sqlite(&self.database.path)
    }

    pub fn ws_server_config(&self) -> WsServerConfig {
        WsServerConfig {
            bind_addr: format!("{}:{}", self.server.ws_host, self.server.ws_port),
            admission_token: None,
        }
    }

    pub fn api_bind_addr(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}
