//! Tables and columns.

use serde::{Deserialize, Serialize};

use crate::error::{DbalError, Result};
use crate::value::SqlValue;

use super::types::Type;

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Semantic type.
    pub ty: Type,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value, if any.
    pub default: Option<SqlValue>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

impl Column {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: SqlValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Adds the column to the primary key. Primary key columns are NOT NULL.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}

/// A table: a name and its columns in declaration order.
///
/// Column names are unique within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table without columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks a column up by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns whether a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` if a column with the same name already exists.
    pub fn add_column(&mut self, column: Column) -> Result<&mut Column> {
        if self.has_column(&column.name) {
            return Err(DbalError::illegal_value(
                "column",
                &column.name,
                format!("column already exists in table '{}'", self.name),
            ));
        }
        self.columns.push(column);
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    /// Appends a nullable column with the given name and type.
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` if a column with the same name already exists.
    pub fn add_column_by_name(&mut self, name: impl Into<String>, ty: Type) -> Result<&mut Column> {
        self.add_column(Column::new(name, ty))
    }

    /// Builder form of [`Table::add_column`].
    ///
    /// # Errors
    ///
    /// Returns `IllegalValue` if a column with the same name already exists.
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    /// Returns the names of the primary key columns in declaration order.
    #[must_use]
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::Size;

    #[test]
    fn test_columns_keep_declaration_order() {
        let mut table = Table::new("users");
        table.add_column_by_name("id", Type::integer()).unwrap();
        table.add_column_by_name("name", Type::VarChar(64)).unwrap();
        table.add_column_by_name("bio", Type::Text(Size::Big)).unwrap();

        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "bio"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = Table::new("users");
        table.add_column_by_name("id", Type::integer()).unwrap();
        let err = table.add_column_by_name("id", Type::text()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalValue);
        assert_eq!(err.culprits(), vec![("column", String::from("id"))]);
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.column("id").unwrap().ty, Type::integer());
    }

    #[test]
    fn test_primary_key() {
        let table = Table::new("memberships")
            .with_column(Column::new("user_id", Type::integer()).primary_key())
            .unwrap()
            .with_column(Column::new("group_id", Type::integer()).primary_key())
            .unwrap()
            .with_column(Column::new("role", Type::VarChar(16)))
            .unwrap();
        assert_eq!(table.primary_key(), vec!["user_id", "group_id"]);
        assert!(!table.column("user_id").unwrap().nullable);
        assert!(table.column("role").unwrap().nullable);
    }

    #[test]
    fn test_snapshot_serializes() {
        let table = Table::new("t")
            .with_column(Column::new("id", Type::integer()).not_null())
            .unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
