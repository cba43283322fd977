use crate::backend::database::dialect::Dialect;
use crate::backend::database::table::{KeyType, UserTable};
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// `CREATE TABLE IF NOT EXISTS` for a users table
///
/// SQLite integers are 64-bit whatever the declared width, so every integer
/// key type maps to the rowid alias.
pub fn users_table_ddl(table: &UserTable) -> AppResult<String> {
    match table.id_type {
        KeyType::SmallInt | KeyType::Int | KeyType::BigInt => {}
        other => {
            return Err(AppError::Configuration(format!(
                "SQLite tables keyed by {} must be created externally",
                other.as_str()
            )))
        }
    }
    let q = |ident: &str| Dialect::Sqlite.quote(ident);

    Ok(format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            {} INTEGER PRIMARY KEY AUTOINCREMENT,
            {} TEXT NOT NULL,
            {} TEXT NOT NULL
        )
        "#,
        q(&table.name),
        q(&table.id_column),
        q(&table.name_column),
        q(&table.email_column)
    ))
}

pub async fn init_user_schema(pool: &SqlitePool, table: &UserTable) -> AppResult<()> {
    sqlx::query(&users_table_ddl(table)?)
        .execute(pool)
        .await
        .map_err(AppError::repository("create users table"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_integer_key_is_a_rowid_alias() {
        for id_type in [KeyType::SmallInt, KeyType::Int, KeyType::BigInt] {
            let ddl = users_table_ddl(&UserTable::new("users", id_type)).unwrap();
            assert!(ddl.contains(r#""id" INTEGER PRIMARY KEY AUTOINCREMENT"#));
        }
    }

    #[test]
    fn test_uuid_key_is_not_bootstrapped() {
        assert!(users_table_ddl(&UserTable::new("users", KeyType::Uuid)).is_err());
    }
}
