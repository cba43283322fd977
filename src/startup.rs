use tracing::info;

use crate::backend::{create_factory, BackendFactory};
use crate::config::AppConfig;
use crate::error::AppResult;

/// Connect the configured backend and return its factory
///
/// With `init_schema` the users table is created when missing, which the
/// in-memory default needs before anything can be stored.
pub async fn open_backend(
    config: &AppConfig,
    init_schema: bool,
) -> AppResult<Box<dyn BackendFactory>> {
    let backend_config = config.database.to_backend_config()?;

    let mut factory = create_factory(backend_config.database_type);
    factory.create_database_connection(&backend_config).await?;

    if init_schema {
        factory.init_schema(&config.table).await?;
        info!(table = %config.table.name, "Users table ready");
    }

    Ok(factory)
}
