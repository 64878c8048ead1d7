//! A connected database: dialect, executor and schema caches.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::definition::{CreateDatabase, CreateTable, DataDefinition, DropTable};
use crate::dialect::{Dialect, MysqlDialect, SqliteDialect, UnconnectedDialect};
use crate::error::Result;
use crate::executor::{Disconnected, Executor, Row};
use crate::query::Select;
use crate::schema::Table;

/// Names loaded once from the catalog, then kept in sync with the
/// statements run through the owning [`Database`].
#[derive(Debug)]
struct NameCache<T> {
    entries: BTreeMap<String, T>,
    loaded: bool,
}

impl<T> NameCache<T> {
    const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            loaded: false,
        }
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.loaded = false;
    }
}

/// A database reached through an [`Executor`] and rendered with a
/// [`Dialect`].
///
/// Table and database names are listed from the catalog on first use and
/// cached. Table schemas are described lazily, one table at a time.
pub struct Database {
    name: String,
    dialect: Box<dyn Dialect>,
    executor: Box<dyn Executor>,
    /// Table name to schema, `None` until described.
    tables: NameCache<Option<Table>>,
    databases: NameCache<()>,
}

impl Database {
    /// Creates a database handle.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dialect: impl Dialect + 'static,
        executor: impl Executor + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            dialect: Box::new(dialect),
            executor: Box::new(executor),
            tables: NameCache::new(),
            databases: NameCache::new(),
        }
    }

    /// A database with no backend. Every operation that needs one fails
    /// with `UnsupportedOperation`.
    #[must_use]
    pub fn unconnected() -> Self {
        Self::new("", UnconnectedDialect::new(), Disconnected)
    }

    /// A MySQL schema.
    #[must_use]
    pub fn mysql(name: impl Into<String>, executor: impl Executor + 'static) -> Self {
        Self::new(name, MysqlDialect::new(), executor)
    }

    /// The `main` schema of a SQLite connection.
    #[must_use]
    pub fn sqlite(executor: impl Executor + 'static) -> Self {
        Self::new("main", SqliteDialect::new(), executor)
    }

    /// Returns the database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dialect statements are rendered with.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Builds and runs a data definition statement, then updates the
    /// caches: a created table or database is added, a dropped table is
    /// removed.
    ///
    /// # Errors
    ///
    /// Propagates build errors and executor failures. The caches are left
    /// untouched on error.
    pub fn execute(&mut self, stmt: &DataDefinition) -> Result<u64> {
        let sql = stmt.build(self.dialect.as_ref())?;
        debug!(sql = %sql, "Executing SQL");
        let affected = self.executor.execute(&sql)?;

        match stmt {
            DataDefinition::CreateDatabase(create) => {
                self.databases.entries.insert(create.name.clone(), ());
                info!(database = %create.name, "Created database");
            }
            DataDefinition::CreateTable(create) => {
                let name = create.table.name();
                info!(table = %name, "Created table");
                if let Some(key) = self.cache_key(name) {
                    // A qualified name is described again from the catalog.
                    let schema = (key == name).then(|| create.table.clone());
                    self.tables.entries.entry(key.to_string()).or_insert(schema);
                }
            }
            DataDefinition::DropTable(drop) => {
                if let Some(key) = self.cache_key(&drop.name) {
                    self.tables.entries.remove(key);
                }
                info!(table = %drop.name, "Dropped table");
            }
        }
        Ok(affected)
    }

    /// Maps a statement's table name to its key in the table cache. Names
    /// qualified with this database lose the prefix; names in another
    /// database have no key.
    fn cache_key<'a>(&self, name: &'a str) -> Option<&'a str> {
        match name.split_once('.') {
            Some((schema, table)) if schema == self.name => Some(table),
            Some(_) => None,
            None => Some(name),
        }
    }

    /// Builds and runs a query.
    ///
    /// # Errors
    ///
    /// Propagates build errors and executor failures.
    pub fn query(&mut self, select: &Select) -> Result<Vec<Row>> {
        let sql = select.build(self.dialect.as_ref())?;
        self.run_query(&sql)
    }

    /// Creates a table.
    ///
    /// # Errors
    ///
    /// See [`Database::execute`].
    pub fn create_table(&mut self, table: Table) -> Result<()> {
        self.execute(&CreateTable::new(table).into()).map(drop)
    }

    /// Drops a table.
    ///
    /// # Errors
    ///
    /// See [`Database::execute`].
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.execute(&DropTable::new(name).into()).map(drop)
    }

    /// Creates a database.
    ///
    /// # Errors
    ///
    /// See [`Database::execute`].
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        self.execute(&CreateDatabase::new(name).into()).map(drop)
    }

    /// Lists the tables of this database, in name order. The catalog is
    /// read on the first call only.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors and executor failures.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        if !self.tables.loaded {
            let sql = self.dialect.list_tables_query(&self.name)?;
            for row in self.run_query(&sql)? {
                let name = row.require_str("name")?;
                if !self.tables.entries.contains_key(name) {
                    self.tables.entries.insert(name.to_string(), None);
                }
            }
            self.tables.loaded = true;
            debug!(
                database = %self.name,
                count = self.tables.entries.len(),
                "Loaded table names"
            );
        }
        Ok(self.tables.names())
    }

    /// Lists the databases visible to the connection, in name order. The
    /// catalog is read on the first call only.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors and executor failures.
    pub fn list_databases(&mut self) -> Result<Vec<String>> {
        if !self.databases.loaded {
            let sql = self.dialect.list_databases_query()?;
            for row in self.run_query(&sql)? {
                let name = row.require_str("name")?;
                if !self.databases.entries.contains_key(name) {
                    self.databases.entries.insert(name.to_string(), ());
                }
            }
            self.databases.loaded = true;
            debug!(count = self.databases.entries.len(), "Loaded database names");
        }
        Ok(self.databases.names())
    }

    /// Returns whether a table exists.
    ///
    /// # Errors
    ///
    /// See [`Database::list_tables`].
    pub fn has_table_by_name(&mut self, name: &str) -> Result<bool> {
        self.list_tables()?;
        Ok(self.tables.entries.contains_key(name))
    }

    /// Returns the schema of a table, describing it on first access.
    ///
    /// Returns `None` for an unknown table, and for a listed table that
    /// the backend no longer describes; such a table is dropped from the
    /// cache.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors and executor failures.
    pub fn get_table(&mut self, name: &str) -> Result<Option<&Table>> {
        if !self.has_table_by_name(name)? {
            return Ok(None);
        }

        if matches!(self.tables.entries.get(name), Some(None)) {
            let sql = self.dialect.describe_table_query(&self.name, name)?;
            let rows = self.run_query(&sql)?;
            if rows.is_empty() {
                warn!(table = %name, "Cached table is missing from the database");
                self.tables.entries.remove(name);
                return Ok(None);
            }

            let mut table = Table::new(name);
            for row in &rows {
                table.add_column(self.dialect.column_from_row(row)?)?;
            }
            debug!(table = %name, columns = table.columns().len(), "Described table");
            self.tables.entries.insert(name.to_string(), Some(table));
        }

        Ok(self.tables.entries.get(name).and_then(Option::as_ref))
    }

    /// Forgets every cached table and database name. The next listing reads
    /// the catalog again.
    pub fn invalidate_caches(&mut self) {
        self.tables.clear();
        self.databases.clear();
        debug!(database = %self.name, "Invalidated caches");
    }

    fn run_query(&mut self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "Executing SQL");
        self.executor.query(sql)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("tables", &self.tables)
            .field("databases", &self.databases)
            .finish_non_exhaustive()
    }
}
