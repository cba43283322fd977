use async_trait::async_trait;
use sqlx::MySql;
use tracing::info;

use crate::backend::database::factory::{
    build_bench_target, build_user_repository, check_database_type, require_context,
};
use crate::backend::database::{DatabaseBackendConfig, QueryContext, UserRepository, UserTable};
use crate::backend::{BackendFactory, DatabaseType};
use crate::bench::BenchTarget;
use crate::error::AppResult;

/// Connection and repository factory for MySQL
#[derive(Debug, Default)]
pub struct MySqlFactory {
    context: Option<QueryContext<MySql>>,
}

impl MySqlFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&QueryContext<MySql>> {
        self.context.as_ref()
    }
}

#[async_trait]
impl BackendFactory for MySqlFactory {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    async fn create_database_connection(&mut self, config: &DatabaseBackendConfig) -> AppResult<()> {
        check_database_type(self.database_type(), config)?;
        let context = QueryContext::<MySql>::connect(config).await?;
        info!("MySQL connection pool ready");
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
