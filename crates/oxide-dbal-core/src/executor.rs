//! The boundary to a live database connection.
//!
//! This crate never opens connections itself. A [`Database`](crate::Database)
//! hands built SQL to an [`Executor`], which runs it and returns rows.
//! Retries, pooling and transactions belong to the executor.

use crate::error::{DbalError, Result};
use crate::value::SqlValue;

/// A result row: column-name-keyed fields in result order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field.
    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.fields.push((column.into(), value));
    }

    /// Builder form of [`Row::push`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: SqlValue) -> Self {
        self.push(column, value);
        self
    }

    /// Returns the value of a column. Column names are matched exactly
    /// first, then case-insensitively.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(column))
            })
            .map(|(_, value)| value)
    }

    /// Returns the text value of a column.
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(SqlValue::as_str)
    }

    /// Returns the integer value of a column.
    #[must_use]
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_i64)
    }

    /// Returns the text value of a required column.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` when the column is missing or not text.
    pub fn require_str(&self, column: &'static str) -> Result<&str> {
        self.get_str(column).ok_or_else(|| {
            DbalError::illegal_value(column, format!("{:?}", self.get(column)), "expected a text column")
        })
    }

    /// Returns the column names in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, SqlValue)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Runs SQL against a live connection.
pub trait Executor {
    /// Runs a statement that returns no rows and reports the number of
    /// affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseApi` when the backend rejects the statement.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Runs a query and returns its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseApi` when the backend rejects the query.
    fn query(&mut self, sql: &str) -> Result<Vec<Row>>;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&mut self, sql: &str) -> Result<u64> {
        (**self).execute(sql)
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        (**self).query(sql)
    }
}

/// Executor used before a connection exists. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disconnected;

impl Executor for Disconnected {
    fn execute(&mut self, _sql: &str) -> Result<u64> {
        Err(DbalError::unsupported("execute", "unconnected"))
    }

    fn query(&mut self, _sql: &str) -> Result<Vec<Row>> {
        Err(DbalError::unsupported("query", "unconnected"))
    }
}
