//! Table references: plain tables and joins.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::{ColumnName, Comma, Expr};

use super::registry::AliasRegistry;

/// A table, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    name: String,
    alias: Option<String>,
    alias_mutable: bool,
}

impl TableName {
    /// Creates an unaliased table reference. `name` may be qualified
    /// with a schema: `schema.table`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            alias_mutable: false,
        }
    }

    /// Creates an aliased table reference.
    #[must_use]
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
            alias_mutable: false,
        }
    }

    /// Allows the query to pick another alias if this reference collides
    /// with one already defined.
    #[must_use]
    pub const fn mutable_alias(mut self) -> Self {
        self.alias_mutable = true;
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns whether the alias may be replaced on collision.
    #[must_use]
    pub const fn is_alias_mutable(&self) -> bool {
        self.alias_mutable
    }

    /// Returns the name other clauses use to refer to this table: the
    /// alias if there is one, the table name otherwise.
    #[must_use]
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = Some(alias);
    }

    /// Renders `table` or `table AS alias`.
    #[must_use]
    pub fn build(&self, dialect: &dyn Dialect) -> String {
        match &self.alias {
            Some(alias) => format!(
                "{} AS {}",
                dialect.quote_table(&self.name),
                dialect.quote_name(alias)
            ),
            None => dialect.quote_table(&self.name),
        }
    }
}

/// `USING ( a, b, ... )` join condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    columns: Comma,
}

impl Using {
    /// Creates a USING condition on one column.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            columns: Comma::new().with(ColumnName::new(column)),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn add_column_name(mut self, column: impl Into<String>) -> Self {
        self.columns.push(ColumnName::new(column));
        self
    }

    /// Appends the columns of another USING condition.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.columns.extend(other.columns);
        self
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`: a USING condition has at least one column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the condition.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        Ok(format!("USING ( {} )", self.columns.build(dialect)?))
    }
}

/// Join condition.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    /// `ON expr`
    On(Expr),
    /// `USING ( columns )`
    Using(Using),
}

impl JoinCondition {
    /// Creates an ON condition.
    #[must_use]
    pub fn on(expr: impl Into<Expr>) -> Self {
        Self::On(expr.into())
    }

    /// Creates a USING condition on one column.
    #[must_use]
    pub fn using(column: impl Into<String>) -> Self {
        Self::Using(Using::new(column))
    }

    /// Renders the condition.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        match self {
            Self::On(expr) => Ok(format!("ON {}", expr.build(dialect)?)),
            Self::Using(using) => using.build(dialect),
        }
    }
}

impl From<Using> for JoinCondition {
    fn from(using: Using) -> Self {
        Self::Using(using)
    }
}

/// Two table references joined together.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Left side.
    pub left: TableReference,
    /// Right side.
    pub right: TableReference,
    /// Optional join condition.
    pub condition: Option<JoinCondition>,
}

/// Something that can appear after FROM.
#[derive(Debug, Clone, PartialEq)]
pub enum TableReference {
    /// A table.
    Table(TableName),
    /// `left LEFT JOIN right [condition]`
    LeftJoin(Box<Join>),
    /// `left INNER JOIN right [condition]`
    InnerJoin(Box<Join>),
}

impl TableReference {
    /// Creates a LEFT JOIN.
    #[must_use]
    pub fn left_join(
        left: impl Into<Self>,
        right: impl Into<Self>,
        condition: Option<JoinCondition>,
    ) -> Self {
        Self::LeftJoin(Box::new(Join {
            left: left.into(),
            right: right.into(),
            condition,
        }))
    }

    /// Creates an INNER JOIN.
    #[must_use]
    pub fn inner_join(
        left: impl Into<Self>,
        right: impl Into<Self>,
        condition: Option<JoinCondition>,
    ) -> Self {
        Self::InnerJoin(Box::new(Join {
            left: left.into(),
            right: right.into(),
            condition,
        }))
    }

    /// Registers every table of this reference in the registry, left to
    /// right. On error neither the registry nor the reference is changed.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` or `DuplicateTable` on a naming conflict.
    pub fn define(&mut self, registry: &mut AliasRegistry) -> Result<()> {
        let mut staged_registry = registry.clone();
        let mut staged = self.clone();
        staged.define_each(&mut staged_registry)?;
        *registry = staged_registry;
        *self = staged;
        Ok(())
    }

    fn define_each(&mut self, registry: &mut AliasRegistry) -> Result<()> {
        match self {
            Self::Table(table) => registry.define_table(table),
            Self::LeftJoin(join) | Self::InnerJoin(join) => {
                join.left.define_each(registry)?;
                join.right.define_each(registry)
            }
        }
    }

    /// Returns the tables of this reference, left to right.
    #[must_use]
    pub fn tables(&self) -> Vec<&TableName> {
        match self {
            Self::Table(table) => vec![table],
            Self::LeftJoin(join) | Self::InnerJoin(join) => {
                let mut tables = join.left.tables();
                tables.extend(join.right.tables());
                tables
            }
        }
    }

    /// Renders the reference.
    ///
    /// # Errors
    ///
    /// Propagates dialect errors raised by join conditions.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        let (keyword, join) = match self {
            Self::Table(table) => return Ok(table.build(dialect)),
            Self::LeftJoin(join) => ("LEFT JOIN", join),
            Self::InnerJoin(join) => ("INNER JOIN", join),
        };
        let left = join.left.build(dialect)?;
        let right = match &join.right {
            Self::Table(table) => table.build(dialect),
            nested => format!("( {} )", nested.build(dialect)?),
        };
        let mut sql = format!("{left} {keyword} {right}");
        if let Some(condition) = &join.condition {
            sql.push(' ');
            sql.push_str(&condition.build(dialect)?);
        }
        Ok(sql)
    }
}

impl From<TableName> for TableReference {
    fn from(table: TableName) -> Self {
        Self::Table(table)
    }
}

impl From<&str> for TableReference {
    fn from(name: &str) -> Self {
        Self::Table(TableName::new(name))
    }
}
