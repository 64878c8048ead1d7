//! MySQL dialect.

use crate::definition::CreateDatabase;
use crate::error::{DbalError, Result};
use crate::executor::Row;
use crate::expr::Expr;
use crate::query::{Order, Select};
use crate::schema::{Column, Size, Type};
use crate::value::SqlValue;

use super::{parse_default, split_declared, Dialect};

const CHARSET: &str = "utf8mb4";
const COLLATION: &str = "utf8mb4_unicode_ci";

const MAX_CHAR_LENGTH: u32 = 255;
const MAX_VARCHAR_LENGTH: u32 = 65_535;
const MAX_NUMERIC_PRECISION: u8 = 65;
const MAX_NUMERIC_SCALE: u8 = 30;

/// MySQL dialect: backtick-quoted identifiers, utf8mb4 databases and
/// tables, catalog reads through `information_schema`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn illegal_size(ty: &Type, size: Size) -> DbalError {
        DbalError::illegal_value(
            "size",
            size,
            format!("MySQL has no {} type of this size", ty.name()),
        )
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> Option<char> {
        Some('`')
    }

    /// Doubles single quotes and escapes backslashes, which MySQL treats as
    /// escape characters by default. Assumes the server's `sql_mode` does
    /// not include `NO_BACKSLASH_ESCAPES`; under that mode a backslash would
    /// be written twice.
    fn quote_string(&self, value: &str) -> Result<String> {
        Ok(format!(
            "'{}'",
            value.replace('\\', "\\\\").replace('\'', "''")
        ))
    }

    fn type_name(&self, ty: &Type) -> Result<String> {
        let name = match *ty {
            Type::Integer(size) => String::from(match size {
                Size::Tiny => "TINYINT",
                Size::Small => "SMALLINT",
                Size::Medium => "MEDIUMINT",
                Size::Normal => "INTEGER",
                Size::Big => "BIGINT",
            }),
            Type::Float(size) => match size {
                Size::Normal => String::from("FLOAT"),
                Size::Big => String::from("DOUBLE"),
                _ => return Err(Self::illegal_size(ty, size)),
            },
            Type::Numeric { precision, scale } => {
                if precision == 0 || precision > MAX_NUMERIC_PRECISION {
                    return Err(DbalError::illegal_value(
                        "precision",
                        precision,
                        format!("must be between 1 and {MAX_NUMERIC_PRECISION}"),
                    ));
                }
                if scale > MAX_NUMERIC_SCALE || scale > precision {
                    return Err(DbalError::illegal_value(
                        "scale",
                        scale,
                        format!("must be at most {MAX_NUMERIC_SCALE} and not exceed the precision"),
                    ));
                }
                format!("NUMERIC({precision}, {scale})")
            }
            Type::Char(length) => {
                if length > MAX_CHAR_LENGTH {
                    return Err(DbalError::illegal_value(
                        "length",
                        length,
                        format!("CHAR holds at most {MAX_CHAR_LENGTH} characters"),
                    ));
                }
                format!("CHAR({length})")
            }
            Type::VarChar(length) => {
                if length > MAX_VARCHAR_LENGTH {
                    return Err(DbalError::illegal_value(
                        "length",
                        length,
                        format!("VARCHAR holds at most {MAX_VARCHAR_LENGTH} characters"),
                    ));
                }
                format!("VARCHAR({length})")
            }
            Type::Text(size) => match size {
                Size::Tiny => String::from("TINYTEXT"),
                Size::Normal => String::from("TEXT"),
                Size::Medium => String::from("MEDIUMTEXT"),
                Size::Big => String::from("LONGTEXT"),
                Size::Small => return Err(Self::illegal_size(ty, size)),
            },
            Type::Blob(size) => match size {
                Size::Tiny => String::from("TINYBLOB"),
                Size::Normal => String::from("BLOB"),
                Size::Medium => String::from("MEDIUMBLOB"),
                Size::Big => String::from("LONGBLOB"),
                Size::Small => return Err(Self::illegal_size(ty, size)),
            },
            Type::Boolean => String::from("BOOLEAN"),
            Type::Date => String::from("DATE"),
            Type::DateTime => String::from("DATETIME"),
            Type::Time => String::from("TIME"),
        };
        Ok(name)
    }

    fn parse_type(&self, declared: &str) -> Result<Type> {
        let (base, args) = split_declared(declared)?;
        let arg = |i: usize| args.get(i).copied();
        let base = base.split_whitespace().next().unwrap_or_default();
        let ty = match base {
            "tinyint" if arg(0) == Some(1) => Type::Boolean,
            "bool" | "boolean" => Type::Boolean,
            "tinyint" => Type::Integer(Size::Tiny),
            "smallint" => Type::Integer(Size::Small),
            "mediumint" => Type::Integer(Size::Medium),
            "int" | "integer" => Type::Integer(Size::Normal),
            "bigint" => Type::Integer(Size::Big),
            "float" => Type::Float(Size::Normal),
            "double" | "real" => Type::Float(Size::Big),
            "decimal" | "numeric" => Type::Numeric {
                precision: arg(0)
                    .and_then(|p| u8::try_from(p).ok())
                    .unwrap_or(Type::DEFAULT_PRECISION),
                scale: arg(1).and_then(|s| u8::try_from(s).ok()).unwrap_or(0),
            },
            "char" => Type::Char(arg(0).unwrap_or(1)),
            "varchar" => Type::VarChar(arg(0).unwrap_or(MAX_VARCHAR_LENGTH)),
            "tinytext" => Type::Text(Size::Tiny),
            "text" => Type::Text(Size::Normal),
            "mediumtext" => Type::Text(Size::Medium),
            "longtext" => Type::Text(Size::Big),
            "tinyblob" => Type::Blob(Size::Tiny),
            "blob" => Type::Blob(Size::Normal),
            "mediumblob" => Type::Blob(Size::Medium),
            "longblob" => Type::Blob(Size::Big),
            "date" => Type::Date,
            "datetime" | "timestamp" => Type::DateTime,
            "time" => Type::Time,
            _ => {
                return Err(DbalError::illegal_value(
                    "type",
                    declared,
                    "unknown MySQL column type",
                ))
            }
        };
        Ok(ty)
    }

    fn create_database(&self, stmt: &CreateDatabase) -> Result<String> {
        Ok(format!(
            "CREATE DATABASE {} CHARACTER SET {CHARSET} COLLATE {COLLATION}",
            self.quote_name(&stmt.name)
        ))
    }

    fn table_options(&self) -> &'static str {
        " DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
    }

    fn list_tables_query(&self, database: &str) -> Result<String> {
        Select::new("information_schema.TABLES")?
            .add_expression(Expr::column("TABLE_NAME").alias("name"))?
            .where_clause(Expr::column("TABLE_SCHEMA").eq(Expr::literal(database)))
            .order_by(Expr::column("TABLE_NAME"), Order::Asc)
            .build(self)
    }

    fn list_databases_query(&self) -> Result<String> {
        Select::new("information_schema.SCHEMATA")?
            .add_expression(Expr::column("SCHEMA_NAME").alias("name"))?
            .order_by(Expr::column("SCHEMA_NAME"), Order::Asc)
            .build(self)
    }

    fn describe_table_query(&self, database: &str, table: &str) -> Result<String> {
        Select::new("information_schema.COLUMNS")?
            .add_expression(Expr::column("COLUMN_NAME").alias("name"))?
            .add_expression(Expr::column("COLUMN_TYPE").alias("type"))?
            .add_expression(Expr::column("IS_NULLABLE").alias("nullable"))?
            .add_expression(Expr::column("COLUMN_DEFAULT").alias("dflt_value"))?
            .add_expression(Expr::column("COLUMN_KEY").alias("column_key"))?
            .where_clause(Expr::column("TABLE_SCHEMA").eq(Expr::literal(database)))
            .where_clause(Expr::column("TABLE_NAME").eq(Expr::literal(table)))
            .order_by(Expr::column("ORDINAL_POSITION"), Order::Asc)
            .build(self)
    }

    fn column_from_row(&self, row: &Row) -> Result<Column> {
        let mut column = Column::new(row.require_str("name")?, self.parse_type(row.require_str("type")?)?);
        column.nullable = row
            .get_str("nullable")
            .is_none_or(|v| v.eq_ignore_ascii_case("YES"));
        column.primary_key = row.get_str("column_key") == Some("PRI");
        // information_schema reports text defaults unquoted.
        column.default = match row.get("dflt_value") {
            None | Some(SqlValue::Null) => None,
            Some(SqlValue::Text(raw)) => match parse_default(raw) {
                Some(SqlValue::Text(_)) | None => Some(SqlValue::Text(raw.clone())),
                parsed => parsed,
            },
            Some(value) => Some(value.clone()),
        };
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{CreateTable, DropTable};
    use crate::error::ErrorKind;
    use crate::schema::Table;

    #[test]
    fn test_quoting() {
        let mysql = MysqlDialect::new();
        assert_eq!(mysql.quote_name("users"), "`users`");
        assert_eq!(mysql.quote_name("we`ird"), "`we``ird`");
        assert_eq!(mysql.quote_table("db.table"), "`db`.`table`");
        assert_eq!(mysql.quote_string("it's").unwrap(), "'it''s'");
        assert_eq!(mysql.quote_string("a\\b").unwrap(), "'a\\\\b'");
    }

    #[test]
    fn test_integer_sizes() {
        let mysql = MysqlDialect::new();
        let names: Vec<String> = [Size::Tiny, Size::Small, Size::Medium, Size::Normal, Size::Big]
            .into_iter()
            .map(|size| mysql.type_name(&Type::Integer(size)).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["TINYINT", "SMALLINT", "MEDIUMINT", "INTEGER", "BIGINT"]
        );
    }

    #[test]
    fn test_unrepresentable_sizes() {
        let mysql = MysqlDialect::new();
        for ty in [
            Type::Float(Size::Tiny),
            Type::Float(Size::Medium),
            Type::Text(Size::Small),
            Type::Blob(Size::Small),
        ] {
            let err = mysql.type_name(&ty).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IllegalValue);
            assert_eq!(err.culprits()[0].0, "size");
        }
    }

    #[test]
    fn test_parameterized_types() {
        let mysql = MysqlDialect::new();
        assert_eq!(mysql.type_name(&Type::VarChar(64)).unwrap(), "VARCHAR(64)");
        assert_eq!(mysql.type_name(&Type::Char(2)).unwrap(), "CHAR(2)");
        assert_eq!(
            mysql
                .type_name(&Type::Numeric {
                    precision: 8,
                    scale: 2
                })
                .unwrap(),
            "NUMERIC(8, 2)"
        );
        assert!(mysql.type_name(&Type::Char(256)).is_err());
        assert!(mysql.type_name(&Type::VarChar(70_000)).is_err());
        let err = mysql
            .type_name(&Type::Numeric {
                precision: 4,
                scale: 6,
            })
            .unwrap_err();
        assert_eq!(err.culprits()[0], ("scale", String::from("6")));
    }

    #[test]
    fn test_parse_type() {
        let mysql = MysqlDialect::new();
        assert_eq!(mysql.parse_type("tinyint(1)").unwrap(), Type::Boolean);
        assert_eq!(mysql.parse_type("int(11)").unwrap(), Type::integer());
        assert_eq!(
            mysql.parse_type("bigint unsigned").unwrap(),
            Type::Integer(Size::Big)
        );
        assert_eq!(
            mysql.parse_type("decimal(8,2)").unwrap(),
            Type::Numeric {
                precision: 8,
                scale: 2
            }
        );
        assert_eq!(mysql.parse_type("varchar(64)").unwrap(), Type::VarChar(64));
        assert_eq!(mysql.parse_type("LONGTEXT").unwrap(), Type::Text(Size::Big));
        assert!(mysql.parse_type("geometry").is_err());
    }

    #[test]
    fn test_create_database_charset() {
        assert_eq!(
            MysqlDialect::new()
                .create_database(&CreateDatabase::new("shop"))
                .unwrap(),
            "CREATE DATABASE `shop` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
    }

    #[test]
    fn test_create_and_drop_table() {
        let mysql = MysqlDialect::new();
        let table = Table::new("shop.users")
            .with_column(Column::new("id", Type::Integer(Size::Big)).primary_key())
            .unwrap()
            .with_column(Column::new("active", Type::Boolean).default_value(SqlValue::Bool(true)))
            .unwrap();
        assert_eq!(
            mysql.create_table(&CreateTable::new(table)).unwrap(),
            "CREATE TABLE `shop`.`users` ( `id` BIGINT NOT NULL, `active` BOOLEAN DEFAULT TRUE, \
             PRIMARY KEY ( `id` ) ) DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
        assert_eq!(
            mysql.drop_table(&DropTable::new("users")).unwrap(),
            "DROP TABLE `users`"
        );
    }

    #[test]
    fn test_create_table_with_bad_type() {
        let table = Table::new("notes")
            .with_column(Column::new("body", Type::Text(Size::Small)))
            .unwrap();
        let err = MysqlDialect::new()
            .create_table(&CreateTable::new(table))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalValue);
        assert_eq!(err.culprits()[0], ("size", String::from("SMALL")));
    }

    #[test]
    fn test_catalog_queries() {
        let mysql = MysqlDialect::new();
        assert_eq!(
            mysql.list_tables_query("shop").unwrap(),
            "SELECT `TABLE_NAME` AS `name` FROM `information_schema`.`TABLES` \
             WHERE `TABLE_SCHEMA` = 'shop' ORDER BY `TABLE_NAME` ASC"
        );
        assert_eq!(
            mysql.list_databases_query().unwrap(),
            "SELECT `SCHEMA_NAME` AS `name` FROM `information_schema`.`SCHEMATA` \
             ORDER BY `SCHEMA_NAME` ASC"
        );
        let describe = mysql.describe_table_query("shop", "users").unwrap();
        assert!(describe.ends_with(
            "WHERE `TABLE_SCHEMA` = 'shop' AND `TABLE_NAME` = 'users' ORDER BY `ORDINAL_POSITION` ASC"
        ));
    }

    #[test]
    fn test_column_from_row() {
        let row: Row = [
            ("name", SqlValue::Text(String::from("price"))),
            ("type", SqlValue::Text(String::from("decimal(8,2)"))),
            ("nullable", SqlValue::Text(String::from("NO"))),
            ("dflt_value", SqlValue::Text(String::from("0"))),
            ("column_key", SqlValue::Text(String::new())),
        ]
        .into_iter()
        .collect();
        let column = MysqlDialect::new().column_from_row(&row).unwrap();
        assert_eq!(column.name, "price");
        assert!(!column.nullable);
        assert!(!column.primary_key);
        assert_eq!(column.default, Some(SqlValue::Int(0)));

        let text_default: Row = [
            ("name", SqlValue::Text(String::from("status"))),
            ("type", SqlValue::Text(String::from("varchar(16)"))),
            ("nullable", SqlValue::Text(String::from("YES"))),
            ("dflt_value", SqlValue::Text(String::from("new"))),
            ("column_key", SqlValue::Null),
        ]
        .into_iter()
        .collect();
        let column = MysqlDialect::new().column_from_row(&text_default).unwrap();
        assert_eq!(column.default, Some(SqlValue::Text(String::from("new"))));
    }
}
