//! SQL syntax differences between the supported backends

use crate::backend::DatabaseType;

/// How a freshly inserted row reports its generated key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKey {
    /// `INSERT ... RETURNING id` hands the key back as a row
    Returning,
    /// The driver reports the auto-increment value with the query result
    LastInsertId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn for_database(database_type: DatabaseType) -> Self {
        match database_type {
            DatabaseType::PostgreSQL => Dialect::Postgres,
            DatabaseType::MySQL => Dialect::MySql,
            DatabaseType::SQLite => Dialect::Sqlite,
        }
    }

    /// Quote an identifier, doubling any embedded quote character
    pub fn quote(&self, ident: &str) -> String {
        let q = match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        };
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(q);
        for c in ident.chars() {
            if c == q {
                quoted.push(q);
            }
            quoted.push(c);
        }
        quoted.push(q);
        quoted
    }

    /// Bind placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    pub fn generated_key(&self) -> GeneratedKey {
        match self {
            Dialect::Postgres | Dialect::Sqlite => GeneratedKey::Returning,
            Dialect::MySql => GeneratedKey::LastInsertId,
        }
    }

    /// Statement that empties `quoted_table`
    ///
    /// SQLite has no TRUNCATE; an unqualified DELETE takes its truncate
    /// fast path instead.
    pub fn truncate(&self, quoted_table: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::MySql => format!("TRUNCATE TABLE {}", quoted_table),
            Dialect::Sqlite => format!("DELETE FROM {}", quoted_table),
        }
    }
}
