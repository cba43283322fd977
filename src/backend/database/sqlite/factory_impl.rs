use async_trait::async_trait;
use sqlx::Sqlite;
use tracing::{info, warn};

use crate::backend::database::factory::{
    build_bench_target, build_user_repository, check_database_type, require_context,
};
use crate::backend::database::{DatabaseBackendConfig, QueryContext, UserRepository, UserTable};
use crate::backend::{BackendFactory, DatabaseType};
use crate::bench::BenchTarget;
use crate::error::AppResult;

/// Connection and repository factory for SQLite files and in-memory databases
#[derive(Debug, Default)]
pub struct SqliteFactory {
    context: Option<QueryContext<Sqlite>>,
}

impl SqliteFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&QueryContext<Sqlite>> {
        self.context.as_ref()
    }
}

#[async_trait]
impl BackendFactory for SqliteFactory {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn create_database_connection(&mut self, config: &DatabaseBackendConfig) -> AppResult<()> {
        check_database_type(self.database_type(), config)?;

        // every in-memory connection is a separate database
        if config.is_memory_database() && config.max_connections > 1 {
            warn!(
                max_connections = config.max_connections,
                "In-memory SQLite with several connections; each sees its own empty database"
            );
        }

        let context = QueryContext::<Sqlite>::connect(config).await?;
        info!(memory = config.is_memory_database(), "SQLite connection pool ready");
        self.context = Some(context);
        Ok(())
    }

    fn create_user_repository(&self, table: &UserTable) -> AppResult<Box<dyn UserRepository>> {
        build_user_repository(self.context.as_ref(), table)
    }

    async fn init_schema(&self, table: &UserTable) -> AppResult<()> {
        let context = require_context(self.context.as_ref())?;
        super::schema::init_user_schema(context.pool(), table).await
    }

    fn create_bench_target(&self) -> AppResult<Box<dyn BenchTarget>> {
        build_bench_target(self.context.as_ref())
    }
}
