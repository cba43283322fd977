use crate::backend::database::dialect::Dialect;
use crate::backend::database::table::{KeyType, UserTable};
use crate::error::{AppError, AppResult};
use sqlx::PgPool;

/// `CREATE TABLE IF NOT EXISTS` for a users table with a serial key
pub fn users_table_ddl(table: &UserTable) -> AppResult<String> {
    let key = match table.id_type {
        KeyType::SmallInt => "SMALLSERIAL",
        KeyType::Int => "SERIAL",
        KeyType::BigInt => "BIGSERIAL",
        other => {
            return Err(AppError::Configuration(format!(
                "PostgreSQL tables keyed by {} must be created externally",
                other.as_str()
            )))
        }
    };
    let q = |ident: &str| Dialect::Postgres.quote(ident);

    Ok(format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            {} {} PRIMARY KEY,
            {} VARCHAR(255) NOT NULL,
            {} VARCHAR(255) NOT NULL
        )
        "#,
        q(&table.name),
        q(&table.id_column),
        key,
        q(&table.name_column),
        q(&table.email_column)
    ))
}

/// Create the users table when it does not exist yet
pub async fn init_user_schema(pool: &PgPool, table: &UserTable) -> AppResult<()> {
    sqlx::query(&users_table_ddl(table)?)
        .execute(pool)
        .await
        .map_err(AppError::repository("create users table"))?;

    Ok(())
}
