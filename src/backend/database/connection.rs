use sqlx::pool::PoolOptions;
use sqlx::{Database, Pool};
use std::time::Duration;
use tracing::info;

use super::config::DatabaseBackendConfig;
use super::dialect::Dialect;
use crate::error::{AppError, AppResult};

/// A live connection pool together with the SQL dialect it speaks
#[derive(Debug)]
pub struct QueryContext<DB: Database> {
    pool: Pool<DB>,
    dialect: Dialect,
}

impl<DB: Database> Clone for QueryContext<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            dialect: self.dialect,
        }
    }
}

impl<DB: Database> QueryContext<DB> {
    pub fn new(pool: Pool<DB>, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    /// Open a pool for `config` and pair it with the backend's dialect
    pub async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        let pool = connect_pool::<DB>(config).await?;
        Ok(Self::new(pool, Dialect::for_database(config.database_type)))
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Close every connection held by the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Build a connection pool from backend configuration
pub async fn connect_pool<DB: Database>(config: &DatabaseBackendConfig) -> AppResult<Pool<DB>> {
    config
        .validate()
        .map_err(|e| AppError::Configuration(format!("Invalid backend config: {}", e)))?;

    let url = config.connect_url()?;
    info!(
        backend = config.database_type.as_str(),
        target = %config.redacted_url(),
        max_connections = config.max_connections,
        "Connecting to database"
    );

    let pool = PoolOptions::<DB>::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&url)
        .await
        .map_err(AppError::Connection)?;

    Ok(pool)
}
