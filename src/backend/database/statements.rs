use super::dialect::{Dialect, GeneratedKey};
use super::table::UserTable;

/// Number of rows sent per multi-row INSERT
///
/// Two binds per row keeps every chunk well under the smallest bind limit
/// of the supported drivers.
pub const BATCH_CHUNK_ROWS: usize = 1000;

/// SQL text for every user repository operation
///
/// Rendered once when a repository is built, from the table configuration
/// and the backend dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatements {
    pub select_by_id: String,
    pub select_all: String,
    pub insert: String,
    pub batch_insert_prefix: String,
    pub update: String,
    pub delete_by_id: String,
    pub truncate: String,
    pub count: String,
}

impl UserStatements {
    pub fn render(table: &UserTable, dialect: Dialect) -> Self {
        let t = dialect.quote(&table.name);
        let id = dialect.quote(&table.id_column);
        let name = dialect.quote(&table.name_column);
        let email = dialect.quote(&table.email_column);
        let p = |i| dialect.placeholder(i);

        let columns = format!("{}, {}, {}", id, name, email);

        let mut insert = format!(
            "INSERT INTO {} ({}, {}) VALUES ({}, {})",
            t,
            name,
            email,
            p(1),
            p(2)
        );
        if dialect.generated_key() == GeneratedKey::Returning {
            insert.push_str(&format!(" RETURNING {}", id));
        }

        Self {
            select_by_id: format!("SELECT {} FROM {} WHERE {} = {}", columns, t, id, p(1)),
            select_all: format!("SELECT {} FROM {}", columns, t),
            insert,
            batch_insert_prefix: format!("INSERT INTO {} ({}, {}) ", t, name, email),
            update: format!(
                "UPDATE {} SET {} = {}, {} = {} WHERE {} = {}",
                t,
                name,
                p(1),
                email,
                p(2),
                id,
                p(3)
            ),
            delete_by_id: format!("DELETE FROM {} WHERE {} = {}", t, id, p(1)),
            truncate: dialect.truncate(&t),
            count: format!("SELECT COUNT(*) FROM {}", t),
        }
    }
}

/// `VALUES (..), (..)` clause with `rows` tuples of `columns` placeholders
pub fn values_list(dialect: Dialect, rows: usize, columns: usize) -> String {
    let mut sql = String::from("VALUES ");
    let mut index = 1;
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for column in 0..columns {
            if column > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&dialect.placeholder(index));
            index += 1;
        }
        sql.push(')');
    }
    sql
}
