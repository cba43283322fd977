use crate::backend::database::dialect::Dialect;
use crate::backend::database::table::{KeyType, UserTable};
use crate::error::{AppError, AppResult};
use sqlx::MySqlPool;

/// `CREATE TABLE IF NOT EXISTS` for a users table with an auto-increment key
pub fn users_table_ddl(table: &UserTable) -> AppResult<String> {
    let key = match table.id_type {
        KeyType::SmallInt => "SMALLINT",
        KeyType::Int => "INT",
        KeyType::BigInt => "BIGINT",
        other => {
            return Err(AppError::Configuration(format!(
                "MySQL tables keyed by {} must be created externally",
                other.as_str()
            )))
        }
    };
    let q = |ident: &str| Dialect::MySql.quote(ident);

    Ok(format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            {} {} AUTO_INCREMENT PRIMARY KEY,
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

pub async fn init_user_schema(pool: &MySqlPool, table: &UserTable) -> AppResult<()> {
    sqlx::query(&users_table_ddl(table)?)
        .execute(pool)
        .await
        .map_err(AppError::repository("create users table"))?;

    Ok(())
}
