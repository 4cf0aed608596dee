//! Configuration Management
//!
//! This module resolves the database connection settings used by the store.
//! Host, user, password, database name, and pool bounds are externally
//! supplied configuration, never hard-coded.
//!
//! # Resolution Precedence
//! 1. `CADRE_DB_*` / `CADRE_POOL_*` environment variables (highest priority)
//! 2. User config file (`~/.config/cadre/config.json`)
//! 3. Built-in defaults (`localhost:3306`, pool bounds 1..10)
//!
//! The stored file may reference the password indirectly through an
//! environment variable (`password_env`) instead of embedding it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{CadreError, Result};

/// Default MySQL host
pub const DEFAULT_HOST: &str = "localhost";
/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;
/// Default database name
pub const DEFAULT_DATABASE: &str = "cadre";
/// Default lower bound for the connection pool
pub const DEFAULT_POOL_MIN: usize = 1;
/// Default upper bound for the connection pool
pub const DEFAULT_POOL_MAX: usize = 10;

/// Resolved runtime database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// MySQL hostname
    pub host: String,

    /// MySQL port
    pub port: u16,

    /// Username
    pub user: String,

    /// Password
    /// WARNING: Sensitive data, do not log or include in error messages
    pub password: String,

    /// Database name
    pub database: String,

    /// Lower bound on pooled connections
    pub pool_min: usize,

    /// Upper bound on pooled connections
    pub pool_max: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: "root".to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            pool_min: DEFAULT_POOL_MIN,
            pool_max: DEFAULT_POOL_MAX,
        }
    }
}

/// Stored configuration file contents
///
/// Mirrors [`DbConfig`] with every field optional; unset fields fall back to
/// the defaults. The password may be supplied directly or through the
/// environment variable named by `password_env`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name for the password (if not stored directly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_min: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_max: Option<usize>,
}

impl StoredConfig {
    /// Overlay the stored values onto a resolved config
    ///
    /// Fields left unset in the file keep their current (default) values.
    /// Returns an error if `password_env` names a variable that is not set.
    pub fn apply(&self, config: &mut DbConfig) -> Result<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(env_var) = &self.password_env {
            match std::env::var(env_var) {
                Ok(password) => config.password = password,
                Err(_) => {
                    return Err(CadreError::config_error(format!(
                        "Environment variable {env_var} not found for password"
                    )));
                }
            }
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(pool_min) = self.pool_min {
            config.pool_min = pool_min;
        }
        if let Some(pool_max) = self.pool_max {
            config.pool_max = pool_max;
        }
        Ok(())
    }
}

/// Get path to the user config file (`~/.config/cadre/config.json`)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| CadreError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("cadre").join("config.json"))
}

/// Load the stored config file, if present
///
/// A missing file is not an error; it simply contributes nothing.
pub fn load_stored(path: &std::path::Path) -> Result<StoredConfig> {
    if !path.exists() {
        return Ok(StoredConfig::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| CadreError::config_error(format!("Could not read config file: {e}")))?;

    serde_json::from_str::<StoredConfig>(&contents)
        .map_err(|e| CadreError::config_error(format!("Invalid config file format: {e}")))
}

/// Overlay `CADRE_DB_*` / `CADRE_POOL_*` environment variables onto a config
///
/// Recognized variables: `CADRE_DB_HOST`, `CADRE_DB_PORT`, `CADRE_DB_USER`,
/// `CADRE_DB_PASSWORD`, `CADRE_DB_NAME`, `CADRE_POOL_MIN`, `CADRE_POOL_MAX`.
pub fn apply_env(config: &mut DbConfig) -> Result<()> {
    if let Ok(host) = std::env::var("CADRE_DB_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("CADRE_DB_PORT") {
        config.port = port.parse().map_err(|_| {
            CadreError::config_error(format!("CADRE_DB_PORT is not a valid port: {port}"))
        })?;
    }
    if let Ok(user) = std::env::var("CADRE_DB_USER") {
        config.user = user;
    }
    if let Ok(password) = std::env::var("CADRE_DB_PASSWORD") {
        config.password = password;
    }
    if let Ok(database) = std::env::var("CADRE_DB_NAME") {
        config.database = database;
    }
    if let Ok(pool_min) = std::env::var("CADRE_POOL_MIN") {
        config.pool_min = pool_min.parse().map_err(|_| {
            CadreError::config_error(format!("CADRE_POOL_MIN is not a number: {pool_min}"))
        })?;
    }
    if let Ok(pool_max) = std::env::var("CADRE_POOL_MAX") {
        config.pool_max = pool_max.parse().map_err(|_| {
            CadreError::config_error(format!("CADRE_POOL_MAX is not a number: {pool_max}"))
        })?;
    }
    Ok(())
}

/// Resolve the effective configuration
///
/// Starts from defaults, overlays the user config file, then overlays the
/// environment, so the environment always wins.
pub fn load() -> Result<DbConfig> {
    let mut config = DbConfig::default();

    let stored = load_stored(&config_path()?)?;
    stored.apply(&mut config)?;

    apply_env(&mut config)?;

    if config.pool_min > config.pool_max || config.pool_max == 0 {
        return Err(CadreError::config_error(format!(
            "Invalid pool bounds {}..{}",
            config.pool_min, config.pool_max
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.database, "cadre");
        assert_eq!(config.pool_min, 1);
        assert_eq!(config.pool_max, 10);
    }

    #[test]
    fn test_stored_config_apply_partial() {
        let stored = StoredConfig {
            host: Some("db.internal".to_string()),
            database: Some("people".to_string()),
            ..Default::default()
        };

        let mut config = DbConfig::default();
        stored.apply(&mut config).unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.database, "people");
        // Untouched fields keep their defaults
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
    }

    #[test]
    fn test_stored_config_password_env() {
        std::env::set_var("CADRE_TEST_PASSWORD", "secret");

        let stored = StoredConfig {
            password_env: Some("CADRE_TEST_PASSWORD".to_string()),
            ..Default::default()
        };

        let mut config = DbConfig::default();
        stored.apply(&mut config).unwrap();
        assert_eq!(config.password, "secret");

        std::env::remove_var("CADRE_TEST_PASSWORD");
    }

    #[test]
    fn test_stored_config_missing_password_env() {
        let stored = StoredConfig {
            password_env: Some("CADRE_NONEXISTENT_VAR".to_string()),
            ..Default::default()
        };

        let mut config = DbConfig::default();
        let result = stored.apply(&mut config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("CADRE_NONEXISTENT_VAR not found"));
    }

    #[test]
    fn test_stored_config_serialization_omits_unset_fields() {
        let stored = StoredConfig {
            host: Some("localhost".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("host"));
        assert!(!json.contains("password"));
        assert!(!json.contains("pool_min"));
    }

    #[test]
    fn test_load_stored_missing_file_is_empty() {
        let stored =
            load_stored(std::path::Path::new("/nonexistent/cadre/config.json")).unwrap();
        assert!(stored.host.is_none());
        assert!(stored.password.is_none());
    }
}
