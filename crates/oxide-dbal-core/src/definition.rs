//! Data definition statements.
//!
//! Each statement is plain data; the dialect decides its exact shape, so
//! `build` always goes through [`Dialect`].

use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::Table;

/// `CREATE DATABASE name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDatabase {
    /// Database name.
    pub name: String,
}

impl CreateDatabase {
    /// Creates the statement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `CREATE TABLE name ( columns )`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Table schema.
    pub table: Table,
    /// Emit `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl CreateTable {
    /// Creates the statement.
    #[must_use]
    pub const fn new(table: Table) -> Self {
        Self {
            table,
            if_not_exists: false,
        }
    }

    /// Adds `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// `DROP TABLE name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    /// Table name.
    pub name: String,
    /// Emit `IF EXISTS`.
    pub if_exists: bool,
}

impl DropTable {
    /// Creates the statement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    /// Adds `IF EXISTS`.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

/// A data definition statement.
#[derive(Debug, Clone, PartialEq)]
pub enum DataDefinition {
    /// CREATE DATABASE.
    CreateDatabase(CreateDatabase),
    /// CREATE TABLE.
    CreateTable(CreateTable),
    /// DROP TABLE.
    DropTable(DropTable),
}

impl DataDefinition {
    /// Renders the statement for the given dialect.
    ///
    /// # Errors
    ///
    /// Fails when the dialect does not support the statement or cannot
    /// represent one of the column types.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        match self {
            Self::CreateDatabase(stmt) => dialect.create_database(stmt),
            Self::CreateTable(stmt) => dialect.create_table(stmt),
            Self::DropTable(stmt) => dialect.drop_table(stmt),
        }
    }
}

impl From<CreateDatabase> for DataDefinition {
    fn from(stmt: CreateDatabase) -> Self {
        Self::CreateDatabase(stmt)
    }
}

impl From<CreateTable> for DataDefinition {
    fn from(stmt: CreateTable) -> Self {
        Self::CreateTable(stmt)
    }
}

impl From<DropTable> for DataDefinition {
    fn from(stmt: DropTable) -> Self {
        Self::DropTable(stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MysqlDialect, SqliteDialect, UnconnectedDialect};
    use crate::error::ErrorKind;
    use crate::schema::{Column, Type};

    fn users() -> Table {
        Table::new("users")
            .with_column(Column::new("id", Type::integer()).primary_key())
            .unwrap()
            .with_column(Column::new("name", Type::VarChar(64)).not_null())
            .unwrap()
    }

    #[test]
    fn test_dispatch() {
        let mysql = MysqlDialect::new();
        let drop: DataDefinition = DropTable::new("users").if_exists().into();
        assert_eq!(drop.build(&mysql).unwrap(), "DROP TABLE IF EXISTS `users`");

        let create: DataDefinition = CreateDatabase::new("shop").into();
        assert!(create.build(&mysql).unwrap().starts_with("CREATE DATABASE `shop`"));
    }

    #[test]
    fn test_build_twice_is_identical() {
        let stmt: DataDefinition = CreateTable::new(users()).into();
        for dialect in [&MysqlDialect::new() as &dyn Dialect, &SqliteDialect::new()] {
            assert_eq!(stmt.build(dialect).unwrap(), stmt.build(dialect).unwrap());
        }
    }

    #[test]
    fn test_unconnected_refuses() {
        let stmt: DataDefinition = CreateTable::new(users()).into();
        let err = stmt.build(&UnconnectedDialect::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }
}
