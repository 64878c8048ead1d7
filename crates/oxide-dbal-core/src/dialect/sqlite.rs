//! SQLite dialect.
//!
//! SQLite stores values by type affinity, so several semantic types share
//! one declared name: character and temporal types are `TEXT`, every
//! integer size is `INTEGER`. Reading a schema back therefore yields the
//! affinity type, not necessarily the declared one.

use crate::definition::CreateDatabase;
use crate::error::{DbalError, Result};
use crate::executor::Row;
use crate::expr::Expr;
use crate::query::{Order, Select};
use crate::schema::{Column, Size, Type};
use crate::value::SqlValue;

use super::{parse_default, render_literal, split_declared, Dialect};

/// SQLite dialect: double-quoted identifiers, booleans stored as integers,
/// catalog reads through `sqlite_master` and pragmas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn numeric(args: &[u32]) -> Type {
        let arg = |i: usize, fallback: u8| {
            args.get(i)
                .and_then(|n| u8::try_from(*n).ok())
                .unwrap_or(fallback)
        };
        Type::Numeric {
            precision: arg(0, Type::DEFAULT_PRECISION),
            scale: arg(1, 0),
        }
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn literal(&self, value: &SqlValue) -> Result<String> {
        match value {
            SqlValue::Bool(b) => Ok(String::from(if *b { "1" } else { "0" })),
            _ => render_literal(self, value),
        }
    }

    fn type_name(&self, ty: &Type) -> Result<String> {
        let name = match ty {
            Type::Integer(_) | Type::Boolean => "INTEGER",
            Type::Float(_) => "REAL",
            Type::Numeric { .. } => "NUMERIC",
            Type::Char(_)
            | Type::VarChar(_)
            | Type::Text(_)
            | Type::Date
            | Type::DateTime
            | Type::Time => "TEXT",
            Type::Blob(_) => "BLOB",
        };
        Ok(String::from(name))
    }

    fn parse_type(&self, declared: &str) -> Result<Type> {
        let (base, args) = split_declared(declared)?;
        let ty = match base.as_str() {
            "boolean" | "bool" => Type::Boolean,
            "date" => Type::Date,
            "datetime" | "timestamp" => Type::DateTime,
            "time" => Type::Time,
            "char" | "character" if !args.is_empty() => Type::Char(args[0]),
            "varchar" if !args.is_empty() => Type::VarChar(args[0]),
            "decimal" | "numeric" => Self::numeric(&args),
            // Affinity rules, in the order SQLite applies them.
            b if b.contains("int") => Type::integer(),
            b if b.contains("char") || b.contains("clob") || b.contains("text") => Type::text(),
            b if b.is_empty() || b.contains("blob") => Type::Blob(Size::Normal),
            b if b.contains("real") || b.contains("floa") || b.contains("doub") => {
                Type::Float(Size::Normal)
            }
            _ => Self::numeric(&args),
        };
        Ok(ty)
    }

    fn create_database(&self, _stmt: &CreateDatabase) -> Result<String> {
        Err(DbalError::unsupported("create_database", self.name()))
    }

    fn list_tables_query(&self, database: &str) -> Result<String> {
        // The schema name may itself contain dots, so it is quoted whole.
        let predicate = Expr::column("type")
            .eq(Expr::literal("table"))
            .and(Expr::column("name").not_like(Expr::literal("sqlite_%")));
        let name = self.quote_name("name");
        Ok(format!(
            "SELECT {name} FROM {}.{} WHERE {} ORDER BY {name} ASC",
            self.quote_name(database),
            self.quote_name("sqlite_master"),
            predicate.build(self)?
        ))
    }

    fn list_databases_query(&self) -> Result<String> {
        Select::new("pragma_database_list")?
            .add_expression(Expr::column("name"))?
            .order_by(Expr::column("seq"), Order::Asc)
            .build(self)
    }

    fn describe_table_query(&self, database: &str, table: &str) -> Result<String> {
        Ok(format!(
            "PRAGMA {}.table_info({})",
            self.quote_name(database),
            self.quote_name(table)
        ))
    }

    fn column_from_row(&self, row: &Row) -> Result<Column> {
        let declared = row.get_str("type").unwrap_or_default();
        let mut column = Column::new(row.require_str("name")?, self.parse_type(declared)?);
        column.nullable = row.get_i64("notnull").unwrap_or(0) == 0;
        column.primary_key = row.get_i64("pk").unwrap_or(0) > 0;
        column.default = row.get_str("dflt_value").and_then(parse_default);
        Ok(column)
    }
}
