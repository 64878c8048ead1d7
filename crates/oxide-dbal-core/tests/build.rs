//! Rendering properties that hold across the whole builder.

use oxide_dbal_core::definition::{CreateDatabase, CreateTable, DropTable};
use oxide_dbal_core::dialect::{Dialect, MysqlDialect, SqliteDialect, UnconnectedDialect};
use oxide_dbal_core::query::{JoinCondition, Order, TableName, Using};
use oxide_dbal_core::schema::{Column, Size, Table, Type};
use oxide_dbal_core::{DataDefinition, ErrorKind, Expr, Select, SqlValue};

#[test]
fn test_plain_select() {
    let sql = Select::new("users")
        .unwrap()
        .add_expression(Expr::column("id").comma(Expr::column("name")))
        .unwrap()
        .build(&MysqlDialect::new())
        .unwrap();
    assert_eq!(sql, "SELECT `id`, `name` FROM `users`");
}

#[test]
fn test_offset_needs_limit() {
    let sql = Select::new("users")
        .unwrap()
        .offset(5)
        .build(&MysqlDialect::new())
        .unwrap();
    assert!(!sql.contains("OFFSET"));
    assert_eq!(sql, "SELECT * FROM `users`");
}

#[test]
fn test_limit_offset() {
    let sql = Select::new("table")
        .unwrap()
        .add_expression(Expr::AllColumns)
        .unwrap()
        .limit(1)
        .offset(2)
        .build(&MysqlDialect::new())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `table` LIMIT 1 OFFSET 2");
}

#[test]
fn test_where_clauses_are_anded() {
    let sql = Select::new("t")
        .unwrap()
        .where_clause(Expr::column("a").eq(Expr::literal(1_i64)))
        .where_clause(Expr::column("b").eq(Expr::literal(2_i64)))
        .where_clause(Expr::column("c").eq(Expr::literal(3_i64)))
        .build(&MysqlDialect::new())
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `t` WHERE `a` = 1 AND `b` = 2 AND `c` = 3"
    );
}

#[test]
fn test_or_inside_and_is_parenthesized() {
    let predicate = Expr::column("a")
        .eq(Expr::literal(1_i64))
        .or(Expr::column("b").eq(Expr::literal(2_i64)));
    let sql = Select::new("t")
        .unwrap()
        .where_clause(predicate)
        .where_clause(Expr::column("c").gt(Expr::literal(0_i64)))
        .build(&SqliteDialect::new())
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"t\" WHERE (\"a\" = 1 OR \"b\" = 2) AND \"c\" > 0"
    );
}

#[test]
fn test_quoting_qualified_and_embedded_quotes() {
    let mysql = MysqlDialect::new();
    assert_eq!(mysql.quote_table("db.table"), "`db`.`table`");
    assert_eq!(mysql.quote_name("db`table"), "`db``table`");
}

#[test]
fn test_using_chain() {
    let using = Using::new("column1")
        .add_column_name("column2")
        .add_column_name("column3");
    assert_eq!(
        using.build(&MysqlDialect::new()).unwrap(),
        "USING ( `column1`, `column2`, `column3` )"
    );
}

#[test]
fn test_full_select() {
    let select = Select::from_reference(TableName::aliased("orders", "o"))
        .unwrap()
        .inner_join(
            TableName::aliased("users", "u"),
            Some(JoinCondition::on(
                Expr::qualified("o", "user_id").eq(Expr::qualified("u", "id")),
            )),
        )
        .unwrap()
        .distinct()
        .add_expression(Expr::qualified("u", "name"))
        .unwrap()
        .add_expression(Expr::column("total").alias("amount"))
        .unwrap()
        .where_clause(Expr::qualified("u", "name").like(Expr::literal("a%")))
        .group_by(Expr::qualified("u", "name"))
        .having(Expr::column("amount").gt(Expr::literal(10_i64)))
        .order_by(Expr::column("amount"), Order::Desc)
        .limit(5);

    assert_eq!(
        select.build(&MysqlDialect::new()).unwrap(),
        "SELECT DISTINCT `u`.`name`, `total` AS `amount` \
         FROM `orders` AS `o` INNER JOIN `users` AS `u` ON `o`.`user_id` = `u`.`id` \
         WHERE `u`.`name` LIKE 'a%' GROUP BY `u`.`name` HAVING `amount` > 10 \
         ORDER BY `amount` DESC LIMIT 5"
    );
}

#[test]
fn test_duplicate_column_alias_in_query() {
    let err = Select::new("t")
        .unwrap()
        .add_expression(Expr::column("a").alias("x"))
        .unwrap()
        .add_expression(Expr::column("b").alias("x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateAlias);
}

#[test]
fn test_same_expression_two_aliases() {
    let sql = Select::new("t")
        .unwrap()
        .add_expression(Expr::column("a").alias("x"))
        .unwrap()
        .add_expression(Expr::column("a").alias("y"))
        .unwrap()
        .build(&MysqlDialect::new())
        .unwrap();
    assert_eq!(sql, "SELECT `a` AS `x`, `a` AS `y` FROM `t`");
}

#[test]
fn test_unique_column_alias_in_query() {
    let mut select = Select::new("t")
        .unwrap()
        .add_expression(Expr::column("a").alias("col"))
        .unwrap();
    assert_eq!(select.unique_column_alias("col"), "col1");
    assert_eq!(select.unique_column_alias("col"), "col2");
}

#[test]
fn test_self_join_with_mutable_alias() {
    let select = Select::new("employees")
        .unwrap()
        .left_join(TableName::new("employees").mutable_alias(), None)
        .unwrap();
    assert_eq!(
        select.build(&SqliteDialect::new()).unwrap(),
        "SELECT * FROM \"employees\" LEFT JOIN \"employees\" AS \"employees1\""
    );

    let err = Select::new("employees")
        .unwrap()
        .left_join(TableName::new("employees"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateTable);
}

fn users() -> Table {
    Table::new("users")
        .with_column(Column::new("id", Type::Integer(Size::Big)).primary_key())
        .unwrap()
        .with_column(Column::new("name", Type::VarChar(100)).not_null())
        .unwrap()
        .with_column(Column::new("bio", Type::Text(Size::Medium)))
        .unwrap()
        .with_column(Column::new("active", Type::Boolean).default_value(SqlValue::Bool(true)))
        .unwrap()
}

#[test]
fn test_create_table_per_dialect() {
    let stmt: DataDefinition = CreateTable::new(users()).into();
    assert_eq!(
        stmt.build(&MysqlDialect::new()).unwrap(),
        "CREATE TABLE `users` ( `id` BIGINT NOT NULL, `name` VARCHAR(100) NOT NULL, \
         `bio` MEDIUMTEXT, `active` BOOLEAN DEFAULT TRUE, PRIMARY KEY ( `id` ) ) \
         DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
    );
    assert_eq!(
        stmt.build(&SqliteDialect::new()).unwrap(),
        "CREATE TABLE \"users\" ( \"id\" INTEGER NOT NULL, \"name\" TEXT NOT NULL, \
         \"bio\" TEXT, \"active\" INTEGER DEFAULT 1, PRIMARY KEY ( \"id\" ) )"
    );
}

#[test]
fn test_build_is_repeatable() {
    let statements: Vec<DataDefinition> = vec![
        CreateDatabase::new("shop").into(),
        CreateTable::new(users()).if_not_exists().into(),
        DropTable::new("users").if_exists().into(),
    ];
    let mysql = MysqlDialect::new();
    for stmt in &statements {
        assert_eq!(stmt.build(&mysql).unwrap(), stmt.build(&mysql).unwrap());
    }
}

#[test]
fn test_mysql_rejects_unrepresentable_size() {
    let table = Table::new("notes")
        .with_column(Column::new("body", Type::Blob(Size::Small)))
        .unwrap();
    let err = DataDefinition::from(CreateTable::new(table))
        .build(&MysqlDialect::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalValue);
    assert_eq!(err.culprits(), vec![("size", String::from("SMALL"))]);
}

#[test]
fn test_unconnected_builds_nothing_physical() {
    let dialect = UnconnectedDialect::new();
    assert_eq!(
        Select::new("db.users")
            .unwrap()
            .add_expression(Expr::column("id"))
            .unwrap()
            .build(&dialect)
            .unwrap(),
        "SELECT id FROM db.users"
    );
    let err = Select::new("users")
        .unwrap()
        .where_clause(Expr::column("name").eq(Expr::literal("x")))
        .build(&dialect)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    let err = DataDefinition::from(DropTable::new("users"))
        .build(&dialect)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn test_display_is_unquoted() {
    let expr = Expr::qualified("u", "name").eq(Expr::literal("x"));
    assert_eq!(expr.to_string(), "u.name = 'x'");
}
