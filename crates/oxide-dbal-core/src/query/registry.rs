//! Per-query alias bookkeeping.
//!
//! Column aliases and table aliases live in separate namespaces. Each alias
//! is either undefined, reserved (handed out by `unique_*_alias` but not yet
//! attached to an expression) or defined. Unaliased tables are tracked by
//! name in a third set.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::error::{DbalError, Result};
use crate::expr::ColumnWithAlias;

use super::table_ref::TableName;

#[derive(Debug, Clone, PartialEq)]
enum Slot<T> {
    Reserved,
    Defined(T),
}

impl<T> Slot<T> {
    const fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    const fn defined(&self) -> Option<&T> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Reserved => None,
        }
    }
}

/// Alias registry of a single query.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    column_aliases: BTreeMap<String, Slot<ColumnWithAlias>>,
    table_aliases: BTreeMap<String, Slot<TableName>>,
    table_names: BTreeSet<String>,
}

impl AliasRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a column alias.
    ///
    /// A reserved alias is claimed by this call.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` if the alias is already defined.
    pub fn define_column_alias(&mut self, column: &ColumnWithAlias) -> Result<()> {
        self.define_column_aliases(&[column])
    }

    /// Defines several column aliases at once. Either all of them are
    /// defined or, on error, none are.
    pub(crate) fn define_column_aliases(&mut self, columns: &[&ColumnWithAlias]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for column in columns {
            let taken = self
                .column_aliases
                .get(&column.alias)
                .is_some_and(Slot::is_defined);
            if taken || !seen.insert(column.alias.as_str()) {
                return Err(DbalError::DuplicateAlias(column.alias.clone()));
            }
        }
        for column in columns {
            trace!(alias = %column.alias, "Defining column alias");
            self.column_aliases
                .insert(column.alias.clone(), Slot::Defined((*column).clone()));
        }
        Ok(())
    }

    /// Reserves and returns a column alias derived from `base` that is
    /// neither defined nor reserved: `base`, `base1`, `base2`, ...
    pub fn unique_column_alias(&mut self, base: &str) -> String {
        let alias = Self::first_free(base, |candidate| {
            self.column_aliases.contains_key(candidate)
        });
        self.column_aliases.insert(alias.clone(), Slot::Reserved);
        alias
    }

    /// Returns whether a column alias is present. Reserved aliases count
    /// only when `include_reserved` is set.
    #[must_use]
    pub fn has_column_alias(&self, name: &str, include_reserved: bool) -> bool {
        self.column_aliases
            .get(name)
            .is_some_and(|slot| include_reserved || slot.is_defined())
    }

    /// Returns the aliased expression defined under `name`.
    #[must_use]
    pub fn column_alias(&self, name: &str) -> Option<&ColumnWithAlias> {
        self.column_aliases.get(name).and_then(Slot::defined)
    }

    /// Defines a table reference.
    ///
    /// Aliased tables are checked against the table aliases, unaliased
    /// tables against the set of table names. A table whose alias is
    /// mutable never conflicts: on collision it is given a fresh alias
    /// derived from the table name.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAlias` for an alias that is already defined and
    /// `DuplicateTable` for an unaliased table that is already referenced.
    pub fn define_table(&mut self, table: &mut TableName) -> Result<()> {
        if table.is_alias_mutable() && self.is_table_reference_taken(table) {
            let fresh = self.unique_table_alias(table.name());
            trace!(table = %table.name(), alias = %fresh, "Renaming table alias");
            table.set_alias(fresh);
        }

        match table.alias() {
            Some(alias) => {
                if self
                    .table_aliases
                    .get(alias)
                    .is_some_and(Slot::is_defined)
                {
                    return Err(DbalError::DuplicateAlias(alias.to_string()));
                }
                self.table_aliases
                    .insert(alias.to_string(), Slot::Defined(table.clone()));
            }
            None => {
                if self.table_names.contains(table.name()) {
                    return Err(DbalError::DuplicateTable(table.name().to_string()));
                }
                self.table_names.insert(table.name().to_string());
            }
        }
        Ok(())
    }

    /// Reserves and returns a table alias derived from `base`. Names of
    /// unaliased tables are skipped as well, since they are reference
    /// names in the same query.
    pub fn unique_table_alias(&mut self, base: &str) -> String {
        let alias = Self::first_free(base, |candidate| {
            self.table_aliases.contains_key(candidate) || self.table_names.contains(candidate)
        });
        self.table_aliases.insert(alias.clone(), Slot::Reserved);
        alias
    }

    /// Returns whether a table alias is present. Reserved aliases count
    /// only when `include_reserved` is set.
    #[must_use]
    pub fn has_table_alias(&self, name: &str, include_reserved: bool) -> bool {
        self.table_aliases
            .get(name)
            .is_some_and(|slot| include_reserved || slot.is_defined())
    }

    /// Returns the table defined under `alias`.
    #[must_use]
    pub fn table_alias(&self, alias: &str) -> Option<&TableName> {
        self.table_aliases.get(alias).and_then(Slot::defined)
    }

    /// Returns whether an unaliased table with this name is referenced.
    #[must_use]
    pub fn has_table_name(&self, name: &str) -> bool {
        self.table_names.contains(name)
    }

    fn is_table_reference_taken(&self, table: &TableName) -> bool {
        match table.alias() {
            Some(alias) => self.has_table_alias(alias, false),
            None => self.table_names.contains(table.name()),
        }
    }

    fn first_free(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
        if !is_taken(base) {
            return base.to_string();
        }
        (1_u64..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !is_taken(candidate))
            .unwrap_or_else(|| unreachable!("alias suffixes are unbounded"))
    }
}
