//! Database dialects.
//!
//! A dialect knows the quoting rules of one backend, maps [`Type`] to its
//! type names and back, and renders the statements whose shape differs
//! between backends. Every builder node renders through `&dyn Dialect`.

mod mysql;
mod sqlite;
mod unconnected;

pub use mysql::MysqlDialect;
pub use sqlite::SqliteDialect;
pub use unconnected::UnconnectedDialect;

use std::fmt;

use crate::definition::{CreateDatabase, CreateTable, DropTable};
use crate::error::{DbalError, Result};
use crate::executor::Row;
use crate::schema::{Column, Type};
use crate::value::SqlValue;

/// Backend-specific SQL rendering.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character, `None` if identifiers are
    /// emitted as-is.
    fn quote_char(&self) -> Option<char> {
        Some('"')
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_name(&self, name: &str) -> String {
        match self.quote_char() {
            Some(q) => {
                let doubled: String = [q, q].iter().collect();
                format!("{q}{}{q}", name.replace(q, &doubled))
            }
            None => name.to_string(),
        }
    }

    /// Quotes a possibly schema-qualified table name, quoting each part
    /// separately: `db.table` becomes `"db"."table"`.
    fn quote_table(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_name(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a string literal, doubling embedded single quotes.
    ///
    /// # Errors
    ///
    /// Dialects without a connection refuse to quote.
    fn quote_string(&self, value: &str) -> Result<String> {
        Ok(format!("'{}'", value.replace('\'', "''")))
    }

    /// Renders a literal value.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` for a non-finite float and propagates
    /// [`Dialect::quote_string`] errors.
    fn literal(&self, value: &SqlValue) -> Result<String> {
        render_literal(self, value)
    }

    /// Returns the backend type name for a column type.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` when the backend cannot represent the type.
    fn type_name(&self, ty: &Type) -> Result<String>;

    /// Maps a backend type name, as reported by the catalog, back to a
    /// column type.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` for a type name the dialect does not know.
    fn parse_type(&self, declared: &str) -> Result<Type>;

    /// Renders one column of a CREATE TABLE statement:
    /// `name TYPE [NOT NULL] [DEFAULT value]`.
    ///
    /// # Errors
    ///
    /// Propagates type and literal errors.
    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut parts = vec![self.quote_name(&column.name), self.type_name(&column.ty)?];
        if !column.nullable {
            parts.push(String::from("NOT NULL"));
        }
        if let Some(default) = &column.default {
            parts.push(format!("DEFAULT {}", self.literal(default)?));
        }
        Ok(parts.join(" "))
    }

    /// Renders `CREATE DATABASE name`.
    ///
    /// # Errors
    ///
    /// Dialects without databases return `UnsupportedOperation`.
    fn create_database(&self, stmt: &CreateDatabase) -> Result<String> {
        Ok(format!("CREATE DATABASE {}", self.quote_name(&stmt.name)))
    }

    /// Renders a CREATE TABLE statement. Primary key columns are collected
    /// into a trailing `PRIMARY KEY` clause, and [`Dialect::table_options`]
    /// is appended after the closing parenthesis.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` for a table without columns and propagates
    /// column errors.
    fn create_table(&self, stmt: &CreateTable) -> Result<String> {
        let table = &stmt.table;
        if table.columns().is_empty() {
            return Err(DbalError::illegal_value(
                "table",
                table.name(),
                "a table needs at least one column",
            ));
        }

        let mut items = table
            .columns()
            .iter()
            .map(|column| self.column_definition(column))
            .collect::<Result<Vec<_>>>()?;

        let primary_key = table.primary_key();
        if !primary_key.is_empty() {
            let names: Vec<String> = primary_key.iter().map(|name| self.quote_name(name)).collect();
            items.push(format!("PRIMARY KEY ( {} )", names.join(", ")));
        }

        let mut sql = String::from("CREATE TABLE ");
        if stmt.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_table(table.name()));
        sql.push_str(" ( ");
        sql.push_str(&items.join(", "));
        sql.push_str(" )");
        sql.push_str(self.table_options());
        Ok(sql)
    }

    /// Text appended to every CREATE TABLE statement.
    fn table_options(&self) -> &'static str {
        ""
    }

    /// Renders `DROP TABLE [IF EXISTS] name`.
    ///
    /// # Errors
    ///
    /// Dialects without a connection return `UnsupportedOperation`.
    fn drop_table(&self, stmt: &DropTable) -> Result<String> {
        let mut sql = String::from("DROP TABLE ");
        if stmt.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote_table(&stmt.name));
        Ok(sql)
    }

    /// Returns the query listing the tables of `database`. Each row has a
    /// `name` column.
    ///
    /// # Errors
    ///
    /// Dialects without a catalog return `UnsupportedOperation`.
    fn list_tables_query(&self, database: &str) -> Result<String>;

    /// Returns the query listing the databases visible to the connection.
    /// Each row has a `name` column.
    ///
    /// # Errors
    ///
    /// Dialects without a catalog return `UnsupportedOperation`.
    fn list_databases_query(&self) -> Result<String>;

    /// Returns the query describing the columns of `table`, one row per
    /// column in declaration order.
    ///
    /// # Errors
    ///
    /// Dialects without a catalog return `UnsupportedOperation`.
    fn describe_table_query(&self, database: &str, table: &str) -> Result<String>;

    /// Converts one row of [`Dialect::describe_table_query`] into a column.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` when a required field is missing or the type
    /// is unknown.
    fn column_from_row(&self, row: &Row) -> Result<Column>;
}

/// Renders a literal with the rules shared by every backend. Text goes
/// through the dialect's [`Dialect::quote_string`].
pub(crate) fn render_literal<D: Dialect + ?Sized>(dialect: &D, value: &SqlValue) -> Result<String> {
    match value {
        SqlValue::Null => Ok(String::from("NULL")),
        SqlValue::Bool(b) => Ok(String::from(if *b { "TRUE" } else { "FALSE" })),
        SqlValue::Int(n) => Ok(n.to_string()),
        // Debug formatting keeps a fraction or exponent, so `1.0` stays a float.
        SqlValue::Float(f) if f.is_finite() => Ok(format!("{f:?}")),
        SqlValue::Float(f) => Err(DbalError::illegal_value(
            "value",
            f,
            "only finite numbers can be written as SQL literals",
        )),
        SqlValue::Text(s) => dialect.quote_string(s),
        SqlValue::Blob(bytes) => Ok(format!("X'{}'", SqlValue::hex(bytes))),
    }
}

/// Splits a declared type such as `decimal(10, 2) unsigned` into its
/// lowercased base name and numeric arguments. Anything after the
/// arguments is dropped.
pub(crate) fn split_declared(declared: &str) -> Result<(String, Vec<u32>)> {
    let declared = declared.trim().to_ascii_lowercase();
    let Some(open) = declared.find('(') else {
        return Ok((declared, Vec::new()));
    };
    let close = declared[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| DbalError::illegal_value("type", &declared, "unbalanced parenthesis"))?;
    let args = declared[open + 1..close]
        .split(',')
        .map(|arg| {
            arg.trim().parse::<u32>().map_err(|_| {
                DbalError::illegal_value("type", &declared, "type arguments must be integers")
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((declared[..open].trim().to_string(), args))
}

/// Parses a column default as reported by a catalog into a literal.
/// Quoted text is unescaped, numbers become numbers, anything else is kept
/// as text.
pub(crate) fn parse_default(raw: &str) -> Option<SqlValue> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") {
        return None;
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Some(SqlValue::Text(raw[1..raw.len() - 1].replace("''", "'")));
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(SqlValue::Int(n));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Some(SqlValue::Float(f));
    }
    Some(SqlValue::Text(raw.to_string()))
}
