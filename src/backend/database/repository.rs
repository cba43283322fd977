//! Generic CRUD repository over a configurable user table

use async_trait::async_trait;
use sqlx::{ColumnIndex, Database, Decode, Encode, Executor, IntoArguments, Row, Type};
use std::marker::PhantomData;
use tracing::{debug, info};

use super::connection::QueryContext;
use super::dialect::GeneratedKey;
use super::id_converter::IdConverter;
use super::outcome::QueryOutcome;
use super::statements::{values_list, UserStatements, BATCH_CHUNK_ROWS};
use super::table::UserTable;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// User persistence as seen by the application
///
/// Ids are always application ids (`i64`); converting them to the table's
/// native key is the implementation's business.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id, `None` when no row matches
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Every user in the table, in backend order
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Insert a transient user and assign the generated id onto it
    async fn save(&self, user: &mut User) -> AppResult<()>;

    /// Insert many users as multi-row statements in one transaction
    ///
    /// Generated ids are not written back.
    async fn save_all(&self, users: &[User]) -> AppResult<()>;

    /// Overwrite name and email of the row with the user's id
    ///
    /// Returns `false` when no row has that id.
    async fn update(&self, user: &User) -> AppResult<bool>;

    /// Delete a user by id, returning whether a row was removed
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;

    /// Remove every row; meant for test and benchmark resets
    async fn truncate(&self) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;

    async fn health_check(&self) -> AppResult<()>;

    /// Release the underlying connections
    async fn close(&self);
}

/// The one repository implementation shared by every backend
///
/// `DB` is the driver, `I` the native key type of the id column and `C`
/// the converter between `I` and application ids. Backends differ only in
/// the values this is built with.
pub struct GenericUserRepository<DB: Database, I, C> {
    context: QueryContext<DB>,
    table: UserTable,
    statements: UserStatements,
    converter: C,
    _key: PhantomData<fn() -> I>,
}

impl<DB: Database, I, C> std::fmt::Debug for GenericUserRepository<DB, I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericUserRepository")
            .field("backend", &DB::NAME)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<DB: Database, I, C: IdConverter<I>> GenericUserRepository<DB, I, C> {
    pub fn new(context: QueryContext<DB>, table: &UserTable, converter: C) -> AppResult<Self> {
        table.validate()?;
        let statements = UserStatements::render(table, context.dialect());

        Ok(Self {
            context,
            table: table.clone(),
            statements,
            converter,
            _key: PhantomData,
        })
    }

    fn map_row(&self, row: &DB::Row) -> AppResult<User>
    where
        I: for<'r> Decode<'r, DB> + Type<DB>,
        String: for<'r> Decode<'r, DB> + Type<DB>,
        usize: ColumnIndex<DB::Row>,
    {
        let key: I = row
            .try_get(0)
            .map_err(AppError::repository("decode id column"))?;
        let name: String = row
            .try_get(1)
            .map_err(AppError::repository("decode name column"))?;
        let email: String = row
            .try_get(2)
            .map_err(AppError::repository("decode email column"))?;

        Ok(User::with_id(self.converter.to_app(&key)?, name, email))
    }
}

#[async_trait]
impl<DB, I, C> UserRepository for GenericUserRepository<DB, I, C>
where
    DB: Database,
    DB::QueryResult: QueryOutcome,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    I: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB> + Send + Sync + 'static,
    C: IdConverter<I> + 'static,
    String: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    i64: for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
{
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let key = self.converter.from_app(id)?;
        debug!(sql = %self.statements.select_by_id, id, "find_by_id");

        let row = sqlx::query::<DB>(&self.statements.select_by_id)
            .bind(key)
            .fetch_optional(self.context.pool())
            .await
            .map_err(AppError::repository("find_by_id"))?;

        row.map(|row| self.map_row(&row)).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        debug!(sql = %self.statements.select_all, "find_all");

        let rows = sqlx::query::<DB>(&self.statements.select_all)
            .fetch_all(self.context.pool())
            .await
            .map_err(AppError::repository("find_all"))?;

        rows.iter().map(|row| self.map_row(row)).collect()
    }

    async fn save(&self, user: &mut User) -> AppResult<()> {
        debug!(sql = %self.statements.insert, "save");
        let query = sqlx::query::<DB>(&self.statements.insert)
            .bind(user.name.clone())
            .bind(user.email.clone());

        let id = match self.context.dialect().generated_key() {
            GeneratedKey::Returning => {
                let row = query
                    .fetch_one(self.context.pool())
                    .await
                    .map_err(AppError::repository("save"))?;
                let key: I = row
                    .try_get(0)
                    .map_err(AppError::repository("decode generated key"))?;
                self.converter.to_app(&key)?
            }
            GeneratedKey::LastInsertId => {
                // the row must not outlive a key we cannot hand back
                let mut tx = self
                    .context
                    .pool()
                    .begin()
                    .await
                    .map_err(AppError::repository("save: begin"))?;
                let result = query
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::repository("save"))?;

                match result.generated_key().and_then(|key| i64::try_from(key).ok()) {
                    Some(id) => {
                        tx.commit()
                            .await
                            .map_err(AppError::repository("save: commit"))?;
                        id
                    }
                    None => {
                        tx.rollback()
                            .await
                            .map_err(AppError::repository("save: rollback"))?;
                        return Err(AppError::Conversion(format!(
                            "{} did not report a usable generated key for table {}",
                            DB::NAME,
                            self.table.name
                        )));
                    }
                }
            }
        };

        user.id = Some(id);
        Ok(())
    }

    async fn save_all(&self, users: &[User]) -> AppResult<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .context
            .pool()
            .begin()
            .await
            .map_err(AppError::repository("save_all: begin"))?;

        let dialect = self.context.dialect();
        for chunk in users.chunks(BATCH_CHUNK_ROWS) {
            let sql = format!(
                "{}{}",
                self.statements.batch_insert_prefix,
                values_list(dialect, chunk.len(), 2)
            );
            debug!(rows = chunk.len(), "save_all chunk");

            let mut query = sqlx::query::<DB>(&sql);
            for user in chunk {
                query = query.bind(user.name.clone()).bind(user.email.clone());
            }
            query
                .execute(&mut *tx)
                .await
                .map_err(AppError::repository("save_all"))?;
        }

        tx.commit()
            .await
            .map_err(AppError::repository("save_all: commit"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<bool> {
        let id = user
            .id
            .ok_or_else(|| AppError::InvalidInput("cannot update a user without an id".to_string()))?;
        let key = self.converter.from_app(id)?;
        debug!(sql = %self.statements.update, id, "update");

        let result = sqlx::query::<DB>(&self.statements.update)
            .bind(user.name.clone())
            .bind(user.email.clone())
            .bind(key)
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("update"))?;

        Ok(result.affected() > 0)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let key = self.converter.from_app(id)?;
        debug!(sql = %self.statements.delete_by_id, id, "delete_by_id");

        let result = sqlx::query::<DB>(&self.statements.delete_by_id)
            .bind(key)
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("delete_by_id"))?;

        Ok(result.affected() > 0)
    }

    async fn truncate(&self) -> AppResult<()> {
        info!(table = %self.table.name, "Truncating table");

        sqlx::query::<DB>(&self.statements.truncate)
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("truncate"))?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let row = sqlx::query::<DB>(&self.statements.count)
            .fetch_one(self.context.pool())
            .await
            .map_err(AppError::repository("count"))?;

        row.try_get(0).map_err(AppError::repository("count"))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query::<DB>("SELECT 1")
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("health_check"))?;
        Ok(())
    }

    async fn close(&self) {
        self.context.close().await;
    }
}
