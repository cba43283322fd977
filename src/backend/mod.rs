use crate::backend::database::{DatabaseBackendConfig, UserRepository, UserTable};
use crate::bench::BenchTarget;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::str::FromStr;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::PostgreSQL => "postgresql",
            DatabaseType::MySQL => "mysql",
            DatabaseType::SQLite => "sqlite",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(AppError::Configuration(format!(
                "Unsupported database type: {}",
                other
            ))),
        }
    }
}

/// Builds a connection and a matching user repository for one backend
///
/// Every backend implements the same two steps, so callers can swap one
/// factory for another without touching the code that uses the repository:
/// first open the connection, then ask for a repository bound to it.
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Which backend this factory produces
    fn database_type(&self) -> DatabaseType;

    /// Open the connection pool and keep it for later repositories
    async fn create_database_connection(&mut self, config: &DatabaseBackendConfig)
        -> AppResult<()>;

    /// Build a repository over `table` using the connection opened earlier
    fn create_user_repository(&self, table: &UserTable) -> AppResult<Box<dyn UserRepository>>;

    /// Create the users table if missing; integer keys only
    async fn init_schema(&self, table: &UserTable) -> AppResult<()>;

    /// Benchmark driver sharing the connection opened earlier
    fn create_bench_target(&self) -> AppResult<Box<dyn BenchTarget>>;
}

/// Pick the factory for a backend type
pub fn create_factory(database_type: DatabaseType) -> Box<dyn BackendFactory> {
    match database_type {
        DatabaseType::PostgreSQL => Box::new(database::postgres::PostgresFactory::new()),
        DatabaseType::MySQL => Box::new(database::mysql::MySqlFactory::new()),
        DatabaseType::SQLite => Box::new(database::sqlite::SqliteFactory::new()),
    }
}

/// Connect and build a repository in one go
pub async fn connect_user_repository(
    config: &DatabaseBackendConfig,
    table: &UserTable,
) -> AppResult<Box<dyn UserRepository>> {
    let mut factory = create_factory(config.database_type);
    factory.create_database_connection(config).await?;
    factory.create_user_repository(table)
}
