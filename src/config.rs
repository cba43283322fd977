use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::backend::database::{DatabaseBackendConfig, UserTable};
use crate::backend::DatabaseType;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub table: UserTable,
    #[serde(default)]
    pub bench: BenchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: String,
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BenchConfig {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_iterations() -> u32 {
    1000
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
        }
    }
}

impl DatabaseConfig {
    /// Turn the file-level settings into a backend configuration
    pub fn to_backend_config(&self) -> AppResult<DatabaseBackendConfig> {
        let database_type: DatabaseType = self.db_type.parse()?;

        let mut config = DatabaseBackendConfig::new(database_type, self.url.clone())
            .with_max_connections(self.max_connections)
            .with_connection_timeout(self.connection_timeout);
        if let Some(username) = &self.username {
            config = config.with_credentials(username.clone(), self.password.clone());
        }

        Ok(config)
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, expanding `${VAR}` references first
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let expanded = Self::expand_env_vars(content)?;
        let app_config: AppConfig = serde_yaml::from_str(&expanded)?;

        app_config.table.validate()?;
        app_config
            .database
            .to_backend_config()?
            .validate()
            .map_err(AppError::Configuration)?;

        Ok(app_config)
    }

    /// Create default configuration for in-memory SQLite
    pub fn default_config() -> Self {
        AppConfig {
            database: DatabaseConfig {
                db_type: "sqlite".to_string(),
                url: "sqlite::memory:".to_string(),
                username: None,
                password: None,
                max_connections: 1,
                connection_timeout: default_connection_timeout(),
            },
            table: UserTable {
                id_type: crate::backend::database::KeyType::BigInt,
                ..UserTable::default()
            },
            bench: BenchConfig::default(),
        }
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> AppResult<String> {
        let mut expanded = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            expanded.push_str(&rest[..start]);

            let expr = &rest[start + 2..start + 2 + len];
            let (var_name, default_value) = match expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (expr, None),
            };

            let value = match (std::env::var(var_name), default_value) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => {
                    return Err(AppError::Configuration(format!(
                        "Environment variable {} not found and no default provided",
                        var_name
                    )))
                }
            };
            expanded.push_str(&value);
            rest = &rest[start + 2 + len + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }
}
