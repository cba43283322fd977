use sqlx::{ColumnIndex, Database, Decode, Encode, Executor, FromRow, IntoArguments, Type};
use tracing::info;
use uuid::Uuid;

use super::config::DatabaseBackendConfig;
use super::connection::QueryContext;
use super::id_converter::{DefaultIdConverter, UuidIdConverter};
use super::outcome::QueryOutcome;
use super::repository::{GenericUserRepository, UserRepository};
use super::table::{KeyType, UserTable};
use crate::backend::DatabaseType;
use crate::bench::{BenchTarget, SqlBenchTarget};
use crate::error::{AppError, AppResult};
use crate::models::BenchUser;

/// Reject a configuration meant for another backend
pub fn check_database_type(
    expected: DatabaseType,
    config: &DatabaseBackendConfig,
) -> AppResult<()> {
    if config.database_type != expected {
        return Err(AppError::Configuration(format!(
            "{} factory cannot connect with {} configuration",
            expected.as_str(),
            config.database_type.as_str()
        )));
    }
    Ok(())
}

/// The context a factory stored on connect, or a configuration error
pub fn require_context<DB: Database>(
    context: Option<&QueryContext<DB>>,
) -> AppResult<QueryContext<DB>> {
    context.cloned().ok_or_else(|| {
        AppError::Configuration(format!(
            "{} connection has not been created yet",
            DB::NAME
        ))
    })
}

/// Instantiate the generic repository for the table's configured key type
///
/// UUID keys get the UUID converter; every other key type uses the default
/// numeric strategy.
pub fn build_user_repository<DB>(
    context: Option<&QueryContext<DB>>,
    table: &UserTable,
) -> AppResult<Box<dyn UserRepository>>
where
    DB: Database,
    DB::QueryResult: QueryOutcome,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    i16: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    i32: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    String: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    Uuid: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
{
    let context = require_context(context)?;

    info!(
        backend = DB::NAME,
        table = %table.name,
        id_type = ?table.id_type,
        "Creating user repository"
    );

    let repository: Box<dyn UserRepository> = match table.id_type {
        KeyType::SmallInt => Box::new(GenericUserRepository::<DB, i16, _>::new(
            context,
            table,
            DefaultIdConverter,
        )?),
        KeyType::Int => Box::new(GenericUserRepository::<DB, i32, _>::new(
            context,
            table,
            DefaultIdConverter,
        )?),
        KeyType::BigInt => Box::new(GenericUserRepository::<DB, i64, _>::new(
            context,
            table,
            DefaultIdConverter,
        )?),
        KeyType::Text => Box::new(GenericUserRepository::<DB, String, _>::new(
            context,
            table,
            DefaultIdConverter,
        )?),
        KeyType::Uuid => Box::new(GenericUserRepository::<DB, Uuid, _>::new(
            context,
            table,
            UuidIdConverter,
        )?),
    };

    Ok(repository)
}

pub fn build_bench_target<DB>(context: Option<&QueryContext<DB>>) -> AppResult<Box<dyn BenchTarget>>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    i32: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    String: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
    BenchUser: for<'r> FromRow<'r, DB::Row>,
{
    Ok(Box::new(SqlBenchTarget::new(require_context(context)?)))
}
