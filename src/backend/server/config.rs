/**
 * Server Configuration
 *
 * Configuration is read from an optional TOML file named by
 * `NOTES_COLLAB_CONFIG` and then overridden by environment variables, so
 * a deployment can ship a file and still tweak single values per host.
 *
 * | Variable                   | Field                      | Default                 |
 * |----------------------------|----------------------------|-------------------------|
 * | `HOST`                     | `host`                     | `0.0.0.0`               |
 * | `PORT`                     | `port`                     | `5000`                  |
 * | `CORS_ORIGINS`             | `allowed_origins`          | `http://localhost:5173` |
 * | `JWT_SECRET`               | `jwt_secret`               | unset (open server)     |
 * | `ROOM_CAPACITY`            | `room_capacity`            | `100`                   |
 * | `MAX_CONTENT_BYTES`        | `max_content_bytes`        | `1048576`               |
 * | `MAX_ROOMS_PER_CONNECTION` | `max_rooms_per_connection` | `64`                    |
 * | `CLEANUP_INTERVAL_SECS`    | `cleanup_interval_secs`    | `300`                   |
 */
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "NOTES_COLLAB_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

/// Collaboration server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to make credentialed cross-site requests
    pub allowed_origins: Vec<String>,
    /// HS256 secret; when unset the socket and room endpoints are open
    pub jwt_secret: Option<String>,
    /// Buffered updates per room before slow subscribers start lagging
    pub room_capacity: usize,
    pub max_content_bytes: usize,
    pub max_rooms_per_connection: usize,
    pub cleanup_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            jwt_secret: None,
            room_capacity: 100,
            max_content_bytes: 1024 * 1024,
            max_rooms_per_connection: 64,
            cleanup_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_file(path.trim())?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `KEY=value` overrides from `lookup`
    ///
    /// Empty values are ignored so that `JWT_SECRET=` in a `.env` file does
    /// not switch authentication on with an empty key.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            self.port = parse_number("PORT", &port)?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(capacity) = get("ROOM_CAPACITY") {
            self.room_capacity = parse_number("ROOM_CAPACITY", &capacity)?;
        }
        if let Some(limit) = get("MAX_CONTENT_BYTES") {
            self.max_content_bytes = parse_number("MAX_CONTENT_BYTES", &limit)?;
        }
        if let Some(limit) = get("MAX_ROOMS_PER_CONNECTION") {
            self.max_rooms_per_connection = parse_number("MAX_ROOMS_PER_CONNECTION", &limit)?;
        }
        if let Some(interval) = get("CLEANUP_INTERVAL_SECS") {
            self.cleanup_interval_secs = parse_number("CLEANUP_INTERVAL_SECS", &interval)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_capacity == 0 {
            return Err(ConfigError::invalid("room_capacity", "must be at least 1"));
        }
        if self.max_content_bytes == 0 {
            return Err(ConfigError::invalid("max_content_bytes", "must be at least 1"));
        }
        if self.max_rooms_per_connection == 0 {
            return Err(ConfigError::invalid(
                "max_rooms_per_connection",
                "must be at least 1",
            ));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid("cleanup_interval_secs", "must be at least 1"));
        }
        if matches!(&self.jwt_secret, Some(secret) if secret.is_empty()) {
            return Err(ConfigError::invalid("jwt_secret", "must not be empty"));
        }
        for origin in &self.allowed_origins {
            HeaderValue::from_str(origin)
                .map_err(|e| ConfigError::invalid("allowed_origins", format!("{}: {}", origin, e)))?;
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("host", format!("{}: {}", self.host, e)))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("{:?}: {}", raw, e)))
}
