//! Insert/select throughput comparison between two data-access approaches
//!
//! Both approaches talk to the same `bench_users` table through the same
//! pool. `Statement` sends one hand-written statement per row and decodes
//! rows column by column; `Builder` renders multi-row `VALUES` lists and
//! maps rows through `FromRow`.

use async_trait::async_trait;
use sqlx::{ColumnIndex, Database, Decode, Encode, Executor, FromRow, IntoArguments, Row, Type};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::backend::database::statements::{values_list, BATCH_CHUNK_ROWS};
use crate::backend::database::QueryContext;
use crate::error::{AppError, AppResult};
use crate::logging::log_timing;
use crate::models::BenchUser;

/// Table the benchmark owns; created on demand and truncated per run
pub const BENCH_TABLE: &str = "bench_users";

/// Ages strictly above this are selected by the SELECT step
pub const SELECT_MIN_AGE: i32 = 30;

const BENCH_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    Statement,
    Builder,
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approach::Statement => write!(f, "Statement"),
            Approach::Builder => write!(f, "Builder"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    ListInsert,
    Select,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert => write!(f, "INSERT"),
            Operation::ListInsert => write!(f, "LIST INSERT"),
            Operation::Select => write!(f, "SELECT"),
        }
    }
}

/// One measured benchmark step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub approach: Approach,
    pub operation: Operation,
    pub elapsed: Duration,
    /// Rows returned, reported for selects only
    pub count: Option<usize>,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}ms",
            self.approach,
            self.operation,
            self.elapsed.as_millis()
        )?;
        if let Some(count) = self.count {
            write!(f, ", count={}", count)?;
        }
        Ok(())
    }
}

/// Backend operations the benchmark drives
#[async_trait]
pub trait BenchTarget: Send + Sync {
    /// Create the benchmark table when missing and empty it
    async fn prepare(&self) -> AppResult<()>;

    /// Insert rows one statement at a time
    async fn insert_each(&self, approach: Approach, rows: &[BenchUser]) -> AppResult<()>;

    /// Insert rows as one unit of work
    async fn insert_list(&self, approach: Approach, rows: &[BenchUser]) -> AppResult<()>;

    async fn select_older_than(&self, approach: Approach, age: i32) -> AppResult<Vec<BenchUser>>;
}

/// Fixture rows for one benchmark step
///
/// Step `block` (1-based) uses ids starting at `block * stride + 1`, where
/// the stride is 1000 unless `iterations` needs more room. Fails when the
/// block would run past the `INT` id range.
pub fn fixture_block(block: u32, iterations: u32) -> AppResult<Vec<BenchUser>> {
    let stride = i64::from(iterations.max(1000));
    let start = i64::from(block) * stride + 1;
    let out_of_range = |id: i64| {
        AppError::InvalidInput(format!(
            "{} iterations put benchmark id {} past the INT range",
            iterations, id
        ))
    };

    let first = i32::try_from(start).map_err(|_| out_of_range(start))?;
    let last_id = start + i64::from(iterations) - 1;
    let last = i32::try_from(last_id).map_err(|_| out_of_range(last_id))?;

    Ok((first..=last).map(BenchUser::fixture).collect())
}

/// Run every step in order and report each timing as it completes
pub async fn run_benchmark(target: &dyn BenchTarget, iterations: u32) -> AppResult<Vec<Timing>> {
    info!(iterations, "Starting benchmark");
    target.prepare().await?;

    let mut timings = Vec::with_capacity(6);

    for (block, approach) in [(1, Approach::Statement), (2, Approach::Builder)] {
        let rows = fixture_block(block, iterations)?;
        let start = Instant::now();
        target.insert_each(approach, &rows).await?;
        timings.push(record(approach, Operation::Insert, start.elapsed(), None));
    }

    for (block, approach) in [(3, Approach::Statement), (4, Approach::Builder)] {
        let rows = fixture_block(block, iterations)?;
        let start = Instant::now();
        target.insert_list(approach, &rows).await?;
        timings.push(record(approach, Operation::ListInsert, start.elapsed(), None));
    }

    for approach in [Approach::Statement, Approach::Builder] {
        let start = Instant::now();
        let users = target.select_older_than(approach, SELECT_MIN_AGE).await?;
        timings.push(record(
            approach,
            Operation::Select,
            start.elapsed(),
            Some(users.len()),
        ));
    }

    Ok(timings)
}

fn record(
    approach: Approach,
    operation: Operation,
    elapsed: Duration,
    count: Option<usize>,
) -> Timing {
    let timing = Timing {
        approach,
        operation,
        elapsed,
        count,
    };
    log_timing(&timing);
    timing
}

/// `BenchTarget` over any sqlx driver
pub struct SqlBenchTarget<DB: Database> {
    context: QueryContext<DB>,
    insert: String,
    select: String,
}

impl<DB: Database> SqlBenchTarget<DB> {
    pub fn new(context: QueryContext<DB>) -> Self {
        let dialect = context.dialect();
        let insert = format!(
            "INSERT INTO {} (id, name, age, status) VALUES ({}, {}, {}, {})",
            BENCH_TABLE,
            dialect.placeholder(1),
            dialect.placeholder(2),
            dialect.placeholder(3),
            dialect.placeholder(4)
        );
        let select = format!(
            "SELECT id, name, age, status FROM {} WHERE age > {}",
            BENCH_TABLE,
            dialect.placeholder(1)
        );

        Self {
            context,
            insert,
            select,
        }
    }

    fn multi_row_insert(&self, rows: usize) -> String {
        format!(
            "INSERT INTO {} (id, name, age, status) {}",
            BENCH_TABLE,
            values_list(self.context.dialect(), rows, BENCH_COLUMNS)
        )
    }
}

fn bench_table_ddl() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id INT PRIMARY KEY, name VARCHAR(255) NOT NULL, age INT NOT NULL, status VARCHAR(32) NOT NULL)",
        BENCH_TABLE
    )
}

#[async_trait]
impl<DB> BenchTarget for SqlBenchTarget<DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    i32: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    String: for<'q> Encode<'q, DB> + for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
    BenchUser: for<'r> FromRow<'r, DB::Row>,
{
    async fn prepare(&self) -> AppResult<()> {
        sqlx::query::<DB>(&bench_table_ddl())
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("bench: create table"))?;

        sqlx::query::<DB>(&self.context.dialect().truncate(BENCH_TABLE))
            .execute(self.context.pool())
            .await
            .map_err(AppError::repository("bench: truncate"))?;
        Ok(())
    }

    async fn insert_each(&self, approach: Approach, rows: &[BenchUser]) -> AppResult<()> {
        match approach {
            Approach::Statement => {
                for row in rows {
                    sqlx::query::<DB>(&self.insert)
                        .bind(row.id)
                        .bind(row.name.clone())
                        .bind(row.age)
                        .bind(row.status.clone())
                        .execute(self.context.pool())
                        .await
                        .map_err(AppError::repository("bench: insert"))?;
                }
            }
            Approach::Builder => {
                let sql = self.multi_row_insert(1);
                let mut conn = self
                    .context
                    .pool()
                    .acquire()
                    .await
                    .map_err(AppError::repository("bench: acquire"))?;
                for row in rows {
                    sqlx::query::<DB>(&sql)
                        .bind(row.id)
                        .bind(row.name.clone())
                        .bind(row.age)
                        .bind(row.status.clone())
                        .execute(&mut *conn)
                        .await
                        .map_err(AppError::repository("bench: insert"))?;
                }
            }
        }
        Ok(())
    }

    async fn insert_list(&self, approach: Approach, rows: &[BenchUser]) -> AppResult<()> {
        let mut tx = self
            .context
            .pool()
            .begin()
            .await
            .map_err(AppError::repository("bench: begin"))?;

        match approach {
            Approach::Statement => {
                for row in rows {
                    sqlx::query::<DB>(&self.insert)
                        .bind(row.id)
                        .bind(row.name.clone())
                        .bind(row.age)
                        .bind(row.status.clone())
                        .execute(&mut *tx)
                        .await
                        .map_err(AppError::repository("bench: list insert"))?;
                }
            }
            Approach::Builder => {
                for chunk in rows.chunks(BATCH_CHUNK_ROWS) {
                    let sql = self.multi_row_insert(chunk.len());
                    debug!(rows = chunk.len(), "bench list insert chunk");

                    let mut query = sqlx::query::<DB>(&sql);
                    for row in chunk {
                        query = query
                            .bind(row.id)
                            .bind(row.name.clone())
                            .bind(row.age)
                            .bind(row.status.clone());
                    }
                    query
                        .execute(&mut *tx)
                        .await
                        .map_err(AppError::repository("bench: list insert"))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(AppError::repository("bench: commit"))?;
        Ok(())
    }

    async fn select_older_than(&self, approach: Approach, age: i32) -> AppResult<Vec<BenchUser>> {
        match approach {
            Approach::Statement => {
                let rows = sqlx::query::<DB>(&self.select)
                    .bind(age)
                    .fetch_all(self.context.pool())
                    .await
                    .map_err(AppError::repository("bench: select"))?;

                rows.iter()
                    .map(|row| -> Result<BenchUser, sqlx::Error> {
                        Ok(BenchUser {
                            id: row.try_get(0)?,
                            name: row.try_get(1)?,
                            age: row.try_get(2)?,
                            status: row.try_get(3)?,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(AppError::repository("bench: decode"))
            }
            Approach::Builder => sqlx::query_as::<DB, BenchUser>(&self.select)
                .bind(age)
                .fetch_all(self.context.pool())
                .await
                .map_err(AppError::repository("bench: select")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::database::DatabaseBackendConfig;
    use sqlx::Sqlite;

    #[test]
    fn test_timing_line_format() {
        let insert = Timing {
            approach: Approach::Statement,
            operation: Operation::ListInsert,
            elapsed: Duration::from_millis(42),
            count: None,
        };
        assert_eq!(insert.to_string(), "Statement LIST INSERT: 42ms");

        let select = Timing {
            approach: Approach::Builder,
            operation: Operation::Select,
            elapsed: Duration::from_millis(7),
            count: Some(19),
        };
        assert_eq!(select.to_string(), "Builder SELECT: 7ms, count=19");
    }

    #[test]
    fn test_fixture_blocks_do_not_overlap() {
        let first = fixture_block(1, 3).unwrap();
        assert_eq!(
            first.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1001, 1002, 1003]
        );
        assert_eq!(first[0].name, "User1001");
        assert_eq!(first[0].age, 21);

        let wide = fixture_block(2, 1500).unwrap();
        assert_eq!(wide.first().map(|u| u.id), Some(3001));
        assert_eq!(wide.last().map(|u| u.id), Some(4500));
    }

    #[test]
    fn test_fixture_block_rejects_ids_past_int_range() {
        let result = fixture_block(4, 600_000_000);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        // first id fits, last one would wrap
        let result = fixture_block(2, 1_000_000_000);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        assert!(fixture_block(1, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_benchmark_on_memory_sqlite() {
        let context = QueryContext::<Sqlite>::connect(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();
        let target = SqlBenchTarget::new(context);

        let timings = run_benchmark(&target, 50).await.unwrap();
        assert_eq!(timings.len(), 6);

        let counts: Vec<_> = timings.iter().filter_map(|t| t.count).collect();
        // ages cycle through 20..70, so every approach sees the same rows
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], counts[1]);
        assert!(counts[0] > 0);

        let all = target.select_older_than(Approach::Builder, 0).await.unwrap();
        assert_eq!(all.len(), 200);
    }

    #[tokio::test]
    async fn test_prepare_resets_previous_rows() {
        let context = QueryContext::<Sqlite>::connect(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();
        let target = SqlBenchTarget::new(context);

        target.prepare().await.unwrap();
        target
            .insert_list(Approach::Builder, &fixture_block(1, 10).unwrap())
            .await
            .unwrap();
        target.prepare().await.unwrap();

        let rows = target.select_older_than(Approach::Statement, 0).await.unwrap();
        assert!(rows.is_empty());
    }
}
