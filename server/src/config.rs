//! Server configuration from environment variables.

use std::env;
use std::str::FromStr;

use notebook_core::PhotoSettings;
use thiserror::Error;

/// Default SQLite database file.
pub const DEFAULT_DATABASE_URL: &str = "notebook.db";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default number of pooled SQLite connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite file path, or `:memory:`.
    pub database_url: String,
    pub bind_addr: String,
    pub pool_size: u32,
    pub photo: PhotoSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `DATABASE_URL`: SQLite database path (default: "notebook.db")
    /// - `NOTEBOOK_BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `NOTEBOOK_DB_POOL_SIZE`: pooled connections (default: 4)
    /// - `NOTEBOOK_PHOTO_MAX_DIMENSION`: longest photo edge, clamped to 500..=800 (default: 500)
    /// - `NOTEBOOK_PHOTO_QUALITY`: JPEG quality, clamped to 50..=80 (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr =
            lookup("NOTEBOOK_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let pool_size = parse_var(&lookup, "NOTEBOOK_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?.max(1);

        let defaults = PhotoSettings::default();
        let photo = PhotoSettings::new(
            parse_var(&lookup, "NOTEBOOK_PHOTO_MAX_DIMENSION", defaults.max_dimension)?,
            parse_var(&lookup, "NOTEBOOK_PHOTO_QUALITY", defaults.quality)?,
        );

        Ok(Self {
            database_url,
            bind_addr,
            pool_size,
            photo,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.photo, PhotoSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "/tmp/recipes.db"),
            ("NOTEBOOK_BIND_ADDR", "127.0.0.1:8080"),
            ("NOTEBOOK_DB_POOL_SIZE", "8"),
            ("NOTEBOOK_PHOTO_MAX_DIMENSION", "700"),
            ("NOTEBOOK_PHOTO_QUALITY", "75"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "/tmp/recipes.db");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.photo, PhotoSettings::new(700, 75));
    }

    #[test]
    fn test_photo_settings_are_clamped() {
        let config = config_from(&[
            ("NOTEBOOK_PHOTO_MAX_DIMENSION", "4000"),
            ("NOTEBOOK_PHOTO_QUALITY", "20"),
        ])
        .unwrap();
        assert_eq!(config.photo.max_dimension, 800);
        assert_eq!(config.photo.quality, 50);
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[("NOTEBOOK_DB_POOL_SIZE", "lots")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "NOTEBOOK_DB_POOL_SIZE".to_string(),
                value: "lots".to_string(),
            }
        );
    }
}
