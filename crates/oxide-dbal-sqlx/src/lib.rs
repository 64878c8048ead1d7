//! # oxide-dbal-sqlx
//!
//! A blocking [`Executor`] for SQLite built on `sqlx`.
//!
//! `oxide-dbal-core` is synchronous. [`SqliteExecutor`] owns a private
//! current-thread `tokio` runtime and a single-connection pool, and blocks
//! on each statement.
//!
//! ```rust
//! use oxide_dbal_core::schema::{Column, Table, Type};
//! use oxide_dbal_sqlx::SqliteExecutor;
//!
//! let mut db = SqliteExecutor::in_memory()?.into_database();
//! db.create_table(
//!     Table::new("users").with_column(Column::new("id", Type::integer()).primary_key())?,
//! )?;
//! assert_eq!(db.list_tables()?, vec!["users"]);
//! # Ok::<(), oxide_dbal_core::DbalError>(())
//! ```

use std::path::Path;

use oxide_dbal_core::{Database, DbalError, Executor, Result, Row, SqlValue};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// URL of a private in-memory database.
pub const MEMORY_URL: &str = "sqlite::memory:";

/// Runs SQL on a SQLite database, blocking the calling thread.
#[derive(Debug)]
pub struct SqliteExecutor {
    pool: SqlitePool,
    runtime: Runtime,
}

impl SqliteExecutor {
    /// Connects to a database URL such as `sqlite://data.db` or
    /// [`MEMORY_URL`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseApi` when the runtime cannot start or the
    /// connection fails.
    pub fn connect(url: &str) -> Result<Self> {
        let runtime = Self::runtime()?;
        let pool = runtime
            .block_on(Self::pool_options().connect(url))
            .map_err(|e| DbalError::database_api(e, None))?;
        info!(url = %url, "Connected to SQLite");
        Ok(Self { pool, runtime })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// See [`SqliteExecutor::connect`].
    pub fn in_memory() -> Result<Self> {
        Self::connect(MEMORY_URL)
    }

    /// Opens a database file, creating it if missing.
    ///
    /// # Errors
    ///
    /// See [`SqliteExecutor::connect`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let runtime = Self::runtime()?;
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = runtime
            .block_on(Self::pool_options().connect_with(options))
            .map_err(|e| DbalError::database_api(e, None))?;
        info!(path = %path.display(), "Opened SQLite database");
        Ok(Self { pool, runtime })
    }

    /// Wraps the executor in a [`Database`] for the `main` schema.
    #[must_use]
    pub fn into_database(self) -> Database {
        Database::sqlite(self)
    }

    fn runtime() -> Result<Runtime> {
        Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbalError::database_api(e, None))
    }

    // One connection that never expires, so an in-memory database lives as
    // long as the executor.
    fn pool_options() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }
}

impl Drop for SqliteExecutor {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
        debug!("Closed SQLite pool");
    }
}

impl Executor for SqliteExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64> {
        debug!(sql = %sql, "Executing SQL");
        let result = self
            .runtime
            .block_on(sqlx::query(sql).execute(&self.pool))
            .map_err(|e| DbalError::database_api(e, Some(sql)))?;
        Ok(result.rows_affected())
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "Running query");
        let rows = self
            .runtime
            .block_on(sqlx::query(sql).fetch_all(&self.pool))
            .map_err(|e| DbalError::database_api(e, Some(sql)))?;
        rows.iter()
            .map(convert_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| DbalError::database_api(e, Some(sql)))
    }
}

/// Converts a row by the storage class of each value.
fn convert_row(row: &SqliteRow) -> std::result::Result<Row, sqlx::Error> {
    let mut converted = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let storage = {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };
        let value = match storage.as_deref() {
            None => SqlValue::Null,
            Some("INTEGER") => SqlValue::Int(row.try_get(index)?),
            Some("REAL") => SqlValue::Float(row.try_get(index)?),
            Some("BLOB") => SqlValue::Blob(row.try_get(index)?),
            Some(_) => SqlValue::Text(row.try_get(index)?),
        };
        converted.push(column.name(), value);
    }
    Ok(converted)
}
