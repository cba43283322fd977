use sqlx::mysql::MySqlQueryResult;
use sqlx::postgres::PgQueryResult;
use sqlx::sqlite::SqliteQueryResult;

/// Uniform view over each driver's query result
///
/// The drivers expose these numbers as inherent methods only, so generic
/// repository code reaches them through this trait.
pub trait QueryOutcome {
    fn affected(&self) -> u64;

    /// Auto-increment value produced by the statement, when the driver reports one
    fn generated_key(&self) -> Option<u64>;
}

impl QueryOutcome for PgQueryResult {
    fn affected(&self) -> u64 {
        self.rows_affected()
    }

    fn generated_key(&self) -> Option<u64> {
        None
    }
}

impl QueryOutcome for MySqlQueryResult {
    fn affected(&self) -> u64 {
        self.rows_affected()
    }

    fn generated_key(&self) -> Option<u64> {
        match self.last_insert_id() {
            0 => None,
            id => Some(id),
        }
    }
}

impl QueryOutcome for SqliteQueryResult {
    fn affected(&self) -> u64 {
        self.rows_affected()
    }

    fn generated_key(&self) -> Option<u64> {
        u64::try_from(self.last_insert_rowid()).ok().filter(|id| *id != 0)
    }
}
