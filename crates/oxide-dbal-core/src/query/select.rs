//! SELECT statement builder.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::{Comma, Expr};

use super::registry::AliasRegistry;
use super::table_ref::{JoinCondition, TableReference};

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Order {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A SELECT statement.
///
/// Table references and column aliases are registered as soon as they are
/// attached, so naming conflicts are reported by the call that introduces
/// them, not by [`Select::build`].
///
/// ```rust
/// use oxide_dbal_core::dialect::MysqlDialect;
/// use oxide_dbal_core::expr::Expr;
/// use oxide_dbal_core::query::Select;
///
/// let sql = Select::new("table")?
///     .add_expression(Expr::AllColumns)?
///     .limit(1)
///     .offset(2)
///     .build(&MysqlDialect::new())?;
/// assert_eq!(sql, "SELECT * FROM `table` LIMIT 1 OFFSET 2");
/// # Ok::<(), oxide_dbal_core::DbalError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    aliases: AliasRegistry,
    from: TableReference,
    distinct: bool,
    columns: Comma,
    where_clause: Option<Expr>,
    group_by: Comma,
    having: Option<Expr>,
    order_by: Vec<(Expr, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Creates a SELECT from a single table.
    ///
    /// # Errors
    ///
    /// Never fails for a single table; the signature matches [`Select::from_reference`].
    pub fn new(table: &str) -> Result<Self> {
        Self::from_reference(table)
    }

    /// Creates a SELECT from a table reference, registering its tables.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` or `DuplicateTable` if the reference names a
    /// table or alias twice.
    pub fn from_reference(reference: impl Into<TableReference>) -> Result<Self> {
        let mut aliases = AliasRegistry::new();
        let mut from = reference.into();
        from.define(&mut aliases)?;
        Ok(Self {
            aliases,
            from,
            distinct: false,
            columns: Comma::new(),
            where_clause: None,
            group_by: Comma::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        })
    }

    /// Appends an expression to the select list.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` if the expression defines a column alias
    /// that is already defined.
    pub fn add_expression(mut self, expr: impl Into<Expr>) -> Result<Self> {
        let expr = expr.into();
        self.aliases.define_column_aliases(&expr.column_aliases())?;
        match expr {
            Expr::Comma(seq) => self.columns.extend(seq),
            single => self.columns.push(single),
        }
        Ok(self)
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a WHERE predicate, AND-combined with any previous one.
    #[must_use]
    pub fn where_clause(mut self, predicate: impl Into<Expr>) -> Self {
        self.where_clause = Some(Self::conjoin(self.where_clause.take(), predicate.into()));
        self
    }

    /// Adds a GROUP BY expression.
    #[must_use]
    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr);
        self
    }

    /// Adds a HAVING predicate, AND-combined with any previous one.
    #[must_use]
    pub fn having(mut self, predicate: impl Into<Expr>) -> Self {
        self.having = Some(Self::conjoin(self.having.take(), predicate.into()));
        self
    }

    /// Adds an ORDER BY expression.
    #[must_use]
    pub fn order_by(mut self, expr: impl Into<Expr>, order: Order) -> Self {
        self.order_by.push((expr.into(), order));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET. The offset is only rendered when a limit is set.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Joins `table` to the current FROM clause with LEFT JOIN.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` or `DuplicateTable` on a naming conflict.
    pub fn left_join(
        self,
        table: impl Into<TableReference>,
        condition: Option<JoinCondition>,
    ) -> Result<Self> {
        self.join(table.into(), condition, |l, r, c| {
            TableReference::left_join(l, r, c)
        })
    }

    /// Joins `table` to the current FROM clause with INNER JOIN.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` or `DuplicateTable` on a naming conflict.
    pub fn inner_join(
        self,
        table: impl Into<TableReference>,
        condition: Option<JoinCondition>,
    ) -> Result<Self> {
        self.join(table.into(), condition, |l, r, c| {
            TableReference::inner_join(l, r, c)
        })
    }

    fn join(
        mut self,
        mut table: TableReference,
        condition: Option<JoinCondition>,
        combine: fn(TableReference, TableReference, Option<JoinCondition>) -> TableReference,
    ) -> Result<Self> {
        table.define(&mut self.aliases)?;
        self.from = combine(self.from, table, condition);
        Ok(self)
    }

    /// Reserves a fresh column alias derived from `base`.
    pub fn unique_column_alias(&mut self, base: &str) -> String {
        self.aliases.unique_column_alias(base)
    }

    /// Reserves a fresh table alias derived from `base`.
    pub fn unique_table_alias(&mut self, base: &str) -> String {
        self.aliases.unique_table_alias(base)
    }

    /// Returns the alias registry.
    #[must_use]
    pub const fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Returns the FROM clause.
    #[must_use]
    pub const fn table_reference(&self) -> &TableReference {
        &self.from
    }

    /// Returns the LIMIT, if set.
    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the OFFSET, if set.
    #[must_use]
    pub const fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    fn conjoin(existing: Option<Expr>, predicate: Expr) -> Expr {
        match existing {
            Some(previous) => previous.and(predicate),
            None => predicate,
        }
    }

    /// Renders the statement. An empty select list renders as `*`.
    ///
    /// # Errors
    ///
    /// Fails when the dialect cannot render one of the expressions.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.build(dialect)?);
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.from.build(dialect)?);

        if let Some(predicate) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.build(dialect)?);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.build(dialect)?);

            if let Some(predicate) = &self.having {
                sql.push_str(" HAVING ");
                sql.push_str(&predicate.build(dialect)?);
            }
        }

        if !self.order_by.is_empty() {
            let terms = self
                .order_by
                .iter()
                .map(|(expr, order)| Ok(format!("{} {}", expr.build(dialect)?, order.as_str())))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
            if let Some(m) = self.offset {
                sql.push_str(&format!(" OFFSET {m}"));
            }
        }

        Ok(sql)
    }
}
