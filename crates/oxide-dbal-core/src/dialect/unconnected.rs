//! Dialect used before a backend is known.

use crate::definition::{CreateDatabase, CreateTable, DropTable};
use crate::error::{DbalError, Result};
use crate::executor::Row;
use crate::schema::{Column, Type};
use crate::value::SqlValue;

use super::Dialect;

/// A dialect with no backend behind it.
///
/// Identifier quoting passes names through unchanged. Everything that
/// depends on a real backend fails with `UnsupportedOperation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconnectedDialect;

impl UnconnectedDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn refuse<T>(&self, operation: &'static str) -> Result<T> {
        Err(DbalError::unsupported(operation, self.name()))
    }
}

impl Dialect for UnconnectedDialect {
    fn name(&self) -> &'static str {
        "unconnected"
    }

    fn quote_char(&self) -> Option<char> {
        None
    }

    fn quote_string(&self, _value: &str) -> Result<String> {
        self.refuse("quote_string")
    }

    fn literal(&self, _value: &SqlValue) -> Result<String> {
        self.refuse("literal")
    }

    fn type_name(&self, _ty: &Type) -> Result<String> {
        self.refuse("type_name")
    }

    fn parse_type(&self, _declared: &str) -> Result<Type> {
        self.refuse("parse_type")
    }

    fn column_definition(&self, _column: &Column) -> Result<String> {
        self.refuse("column_definition")
    }

    fn create_database(&self, _stmt: &CreateDatabase) -> Result<String> {
        self.refuse("create_database")
    }

    fn create_table(&self, _stmt: &CreateTable) -> Result<String> {
        self.refuse("create_table")
    }

    fn drop_table(&self, _stmt: &DropTable) -> Result<String> {
        self.refuse("drop_table")
    }

    fn list_tables_query(&self, _database: &str) -> Result<String> {
        self.refuse("list_tables")
    }

    fn list_databases_query(&self) -> Result<String> {
        self.refuse("list_databases")
    }

    fn describe_table_query(&self, _database: &str, _table: &str) -> Result<String> {
        self.refuse("describe_table")
    }

    fn column_from_row(&self, _row: &Row) -> Result<Column> {
        self.refuse("describe_table")
    }
}
