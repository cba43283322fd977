use async_trait::async_trait;
use sqlx::Postgres;
use tracing::info;

use crate::backend::database::factory::{
    build_bench_target, build_user_repository, check_database_type, require_context,
};
use crate::backend::database::{DatabaseBackendConfig, QueryContext, UserRepository, UserTable};
use crate::backend::{BackendFactory, DatabaseType};
use crate::bench::BenchTarget;
use crate::error::AppResult;

/// Connection and repository factory for PostgreSQL
#[derive(Debug, Default)]
pub struct PostgresFactory {
    context: Option<QueryContext<Postgres>>,
}

impl PostgresFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&QueryContext<Postgres>> {
        self.context.as_ref()
    }
}

#[async_trait]
impl BackendFactory for PostgresFactory {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    async fn create_database_connection(&mut self, config: &DatabaseBackendConfig) -> AppResult<()> {
        check_database_type(self.database_type(), config)?;
        let context = QueryContext::<Postgres>::connect(config).await?;
        info!("PostgreSQL connection pool ready");
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
