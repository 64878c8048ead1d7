//! # oxide-dbal-core
//!
//! A database abstraction layer: one object graph for SELECT queries and
//! data definition statements, rendered to correctly quoted SQL for several
//! backends.
//!
//! This crate provides:
//! - An expression tree and a SELECT builder with per-query alias checks
//! - CREATE DATABASE, CREATE TABLE and DROP TABLE statements
//! - Dialect-independent schema types with per-backend type names
//! - MySQL, SQLite and unconnected dialects
//! - A [`Database`] handle that runs statements through an [`Executor`] and
//!   caches table and database names
//!
//! ## Building a query
//!
//! ```rust
//! use oxide_dbal_core::dialect::MysqlDialect;
//! use oxide_dbal_core::{Expr, Select};
//!
//! let query = Select::new("shop.users")?
//!     .add_expression(Expr::column("id"))?
//!     .add_expression(Expr::column("name").alias("label"))?
//!     .where_clause(Expr::column("active").eq(Expr::literal(true)))
//!     .limit(10);
//!
//! assert_eq!(
//!     query.build(&MysqlDialect::new())?,
//!     "SELECT `id`, `name` AS `label` FROM `shop`.`users` WHERE `active` = TRUE LIMIT 10"
//! );
//! # Ok::<(), oxide_dbal_core::DbalError>(())
//! ```
//!
//! ## Rendering is dialect-specific
//!
//! Only `build(dialect)` output is meant to be executed. The `Display` form
//! of an expression skips quoting and is for logs only.
//!
//! ```rust
//! use oxide_dbal_core::dialect::SqliteDialect;
//! use oxide_dbal_core::schema::{Column, Table, Type};
//! use oxide_dbal_core::definition::CreateTable;
//! use oxide_dbal_core::DataDefinition;
//!
//! let table = Table::new("flags").with_column(Column::new("on", Type::Boolean).not_null())?;
//! let stmt: DataDefinition = CreateTable::new(table).into();
//! assert_eq!(
//!     stmt.build(&SqliteDialect::new())?,
//!     "CREATE TABLE \"flags\" ( \"on\" INTEGER NOT NULL )"
//! );
//! # Ok::<(), oxide_dbal_core::DbalError>(())
//! ```

pub mod database;
pub mod definition;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod expr;
pub mod query;
pub mod schema;
pub mod value;

pub use database::Database;
pub use definition::DataDefinition;
pub use dialect::Dialect;
pub use error::{DbalError, ErrorKind, Result};
pub use executor::{Executor, Row};
pub use expr::Expr;
pub use query::Select;
pub use value::{SqlValue, ToSqlValue};
