//! Expression tree.
//!
//! Expressions are plain data. [`Expr::build`] renders them against a
//! [`Dialect`], which applies the backend's quoting rules. The `Display`
//! implementation is a debugging aid only: it does not quote identifiers
//! or escape strings and must never be sent to a database.

use core::fmt;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::{SqlValue, ToSqlValue};

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl InfixOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equals
            | Self::NotEquals
            | Self::Less
            | Self::LessOrEqual
            | Self::Greater
            | Self::GreaterOrEqual => 3,
            Self::Like | Self::NotLike => 4,
        }
    }

    const fn is_associative(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// A column reference, optionally qualified with a table name or alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnName {
    /// Table name or alias.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnName {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Creates a column reference qualified by a table name or alias.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Renders the column reference.
    #[must_use]
    pub fn build(&self, dialect: &dyn Dialect) -> String {
        match &self.table {
            Some(table) => format!(
                "{}.{}",
                dialect.quote_table(table),
                dialect.quote_name(&self.column)
            ),
            None => dialect.quote_name(&self.column),
        }
    }
}

/// An expression with an alias: `expr AS alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWithAlias {
    /// The aliased expression.
    pub expr: Box<Expr>,
    /// The alias.
    pub alias: String,
}

/// A comma separated sequence of expressions.
///
/// Starts empty and only ever grows by appending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comma {
    items: Vec<Expr>,
}

impl Comma {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an expression.
    pub fn push(&mut self, expr: impl Into<Expr>) {
        self.items.push(expr.into());
    }

    /// Builder form of [`Comma::push`].
    #[must_use]
    pub fn with(mut self, expr: impl Into<Expr>) -> Self {
        self.push(expr);
        self
    }

    /// Appends every expression of another sequence.
    pub fn extend(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    /// Returns the expressions in order.
    #[must_use]
    pub fn items(&self) -> &[Expr] {
        &self.items
    }

    /// Returns the number of expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the expressions joined by `, `.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by an element.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        let parts = self
            .items
            .iter()
            .map(|e| e.build(dialect))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(", "))
    }
}

impl<E: Into<Expr>> FromIterator<E> for Comma {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A buildable SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference.
    ColumnName(ColumnName),
    /// A literal value, inlined and quoted by the dialect.
    Literal(SqlValue),
    /// `*`
    AllColumns,
    /// `table.*`
    AllColumnsFromTable(String),
    /// A comma separated sequence.
    Comma(Comma),
    /// A binary infix expression.
    Infix {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: InfixOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// An aliased expression.
    ColumnWithAlias(ColumnWithAlias),
}

impl Expr {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::ColumnName(ColumnName::new(name))
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnName(ColumnName::qualified(table, column))
    }

    /// Creates a literal.
    #[must_use]
    pub fn literal<T: ToSqlValue>(value: T) -> Self {
        Self::Literal(value.to_sql_value())
    }

    /// `table.*`
    #[must_use]
    pub fn all_from(table: impl Into<String>) -> Self {
        Self::AllColumnsFromTable(table.into())
    }

    /// Creates an infix expression.
    #[must_use]
    pub fn infix(left: impl Into<Self>, op: InfixOp, right: impl Into<Self>) -> Self {
        Self::Infix {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }

    /// `self AND other`
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::And, other)
    }

    /// `self OR other`
    #[must_use]
    pub fn or(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::Or, other)
    }

    /// `self = other`
    #[must_use]
    pub fn eq(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::Equals, other)
    }

    /// `self != other`
    #[must_use]
    pub fn not_eq(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::NotEquals, other)
    }

    /// `self < other`
    #[must_use]
    pub fn lt(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::Less, other)
    }

    /// `self <= other`
    #[must_use]
    pub fn lt_eq(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::LessOrEqual, other)
    }

    /// `self > other`
    #[must_use]
    pub fn gt(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::Greater, other)
    }

    /// `self >= other`
    #[must_use]
    pub fn gt_eq(self, other: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::GreaterOrEqual, other)
    }

    /// `self LIKE pattern`
    #[must_use]
    pub fn like(self, pattern: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::Like, pattern)
    }

    /// `self NOT LIKE pattern`
    #[must_use]
    pub fn not_like(self, pattern: impl Into<Self>) -> Self {
        Self::infix(self, InfixOp::NotLike, pattern)
    }

    /// `self AS alias`
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self::ColumnWithAlias(ColumnWithAlias {
            expr: Box::new(self),
            alias: alias.into(),
        })
    }

    /// Appends `other`, turning `self` into a comma sequence if it is not one.
    #[must_use]
    pub fn comma(self, other: impl Into<Self>) -> Self {
        match self {
            Self::Comma(seq) => Self::Comma(seq.with(other)),
            single => Self::Comma(Comma::new().with(single).with(other)),
        }
    }

    /// Returns every aliased expression in this tree that introduces a
    /// column alias, in rendering order.
    pub(crate) fn column_aliases(&self) -> Vec<&ColumnWithAlias> {
        match self {
            Self::ColumnWithAlias(aliased) => vec![aliased],
            Self::Comma(seq) => seq.items().iter().flat_map(Self::column_aliases).collect(),
            _ => Vec::new(),
        }
    }

    const fn precedence(&self) -> Option<u8> {
        match self {
            Self::Infix { op, .. } => Some(op.precedence()),
            _ => None,
        }
    }

    /// Renders the expression for the given dialect.
    ///
    /// # Errors
    ///
    /// Fails when the dialect cannot render a literal.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<String> {
        match self {
            Self::ColumnName(column) => Ok(column.build(dialect)),
            Self::Literal(value) => dialect.literal(value),
            Self::AllColumns => Ok(String::from("*")),
            Self::AllColumnsFromTable(table) => Ok(format!("{}.*", dialect.quote_table(table))),
            Self::Comma(seq) => seq.build(dialect),
            Self::Infix { left, op, right } => {
                let l = Self::operand(left, *op, false, dialect)?;
                let r = Self::operand(right, *op, true, dialect)?;
                Ok(format!("{l} {} {r}", op.as_str()))
            }
            Self::ColumnWithAlias(aliased) => Ok(format!(
                "{} AS {}",
                aliased.expr.build(dialect)?,
                dialect.quote_name(&aliased.alias)
            )),
        }
    }

    fn operand(expr: &Self, parent: InfixOp, right: bool, dialect: &dyn Dialect) -> Result<String> {
        let sql = expr.build(dialect)?;
        if Self::needs_parens(expr, parent, right) {
            Ok(format!("({sql})"))
        } else {
            Ok(sql)
        }
    }

    fn needs_parens(expr: &Self, parent: InfixOp, right: bool) -> bool {
        match expr.precedence() {
            Some(p) if p < parent.precedence() => true,
            Some(p) => p == parent.precedence() && right && !parent.is_associative(),
            None => matches!(expr, Self::Comma(_)),
        }
    }
}

impl From<ColumnName> for Expr {
    fn from(column: ColumnName) -> Self {
        Self::ColumnName(column)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Literal(value)
    }
}

impl From<Comma> for Expr {
    fn from(seq: Comma) -> Self {
        Self::Comma(seq)
    }
}

impl From<ColumnWithAlias> for Expr {
    fn from(aliased: ColumnWithAlias) -> Self {
        Self::ColumnWithAlias(aliased)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnName(ColumnName { table: Some(t), column }) => write!(f, "{t}.{column}"),
            Self::ColumnName(ColumnName { table: None, column }) => f.write_str(column),
            Self::Literal(value) => write!(f, "{value}"),
            Self::AllColumns => f.write_str("*"),
            Self::AllColumnsFromTable(t) => write!(f, "{t}.*"),
            Self::Comma(seq) => {
                for (i, item) in seq.items().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Infix { left, op, right } => write!(f, "{left} {} {right}", op.as_str()),
            Self::ColumnWithAlias(aliased) => write!(f, "{} AS {}", aliased.expr, aliased.alias),
        }
    }
}
