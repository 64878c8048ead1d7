//! Error types for statement building and database access.

use core::fmt;

/// The category of a [`DbalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller supplied a value outside the allowed domain.
    IllegalValue,
    /// The operation cannot be performed by the current dialect or connection.
    UnsupportedOperation,
    /// A column or table alias was defined twice in one query.
    DuplicateAlias,
    /// An unaliased table was referenced twice in one query.
    DuplicateTable,
    /// The executor reported a failure.
    DatabaseApiError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IllegalValue => "IllegalValue",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::DuplicateAlias => "DuplicateAlias",
            Self::DuplicateTable => "DuplicateTable",
            Self::DatabaseApiError => "DatabaseApiError",
        })
    }
}

/// Errors raised while building statements or talking to a database.
#[derive(Debug, thiserror::Error)]
pub enum DbalError {
    /// A value outside the allowed domain, e.g. a size the dialect cannot represent.
    #[error("Illegal value for {name}: {value} ({explanation})")]
    IllegalValue {
        /// Name of the offending parameter.
        name: &'static str,
        /// The offending value, rendered for diagnostics.
        value: String,
        /// What was expected instead.
        explanation: String,
    },

    /// The dialect or connection cannot perform this operation.
    #[error("Operation '{operation}' is not supported by the {dialect} dialect")]
    UnsupportedOperation {
        /// The attempted operation.
        operation: &'static str,
        /// The dialect that refused it.
        dialect: &'static str,
    },

    /// An alias was defined twice in the same query.
    #[error("Alias '{0}' is already defined in this query")]
    DuplicateAlias(String),

    /// An unaliased table was referenced twice in the same query.
    #[error("Table '{0}' is already referenced in this query")]
    DuplicateTable(String),

    /// A failure reported by the executor.
    #[error("Database error: {message}")]
    DatabaseApi {
        /// Error message.
        message: String,
        /// The SQL statement that failed, when known.
        sql: Option<String>,
        /// The underlying driver error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DbalError {
    /// Creates an [`DbalError::IllegalValue`] error.
    #[must_use]
    pub fn illegal_value(
        name: &'static str,
        value: impl fmt::Display,
        explanation: impl Into<String>,
    ) -> Self {
        Self::IllegalValue {
            name,
            value: value.to_string(),
            explanation: explanation.into(),
        }
    }

    /// Creates an [`DbalError::UnsupportedOperation`] error.
    #[must_use]
    pub const fn unsupported(operation: &'static str, dialect: &'static str) -> Self {
        Self::UnsupportedOperation { operation, dialect }
    }

    /// Wraps a driver error raised while running `sql`.
    #[must_use]
    pub fn database_api<E>(error: E, sql: Option<&str>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DatabaseApi {
            message: error.to_string(),
            sql: sql.map(String::from),
            source: Some(Box::new(error)),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalValue { .. } => ErrorKind::IllegalValue,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::DuplicateAlias(_) => ErrorKind::DuplicateAlias,
            Self::DuplicateTable(_) => ErrorKind::DuplicateTable,
            Self::DatabaseApi { .. } => ErrorKind::DatabaseApiError,
        }
    }

    /// Returns the named values that caused the error, for diagnostics.
    #[must_use]
    pub fn culprits(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::IllegalValue { name, value, .. } => vec![(*name, value.clone())],
            Self::UnsupportedOperation { operation, dialect } => vec![
                ("operation", (*operation).to_string()),
                ("dialect", (*dialect).to_string()),
            ],
            Self::DuplicateAlias(alias) => vec![("alias", alias.clone())],
            Self::DuplicateTable(table) => vec![("table", table.clone())],
            Self::DatabaseApi { sql, .. } => sql
                .as_ref()
                .map(|s| vec![("sql", s.clone())])
                .unwrap_or_default(),
        }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, DbalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_value_carries_culprit() {
        let err = DbalError::illegal_value("size", "SMALL", "TEXT has no SMALL variant");
        assert_eq!(err.kind(), ErrorKind::IllegalValue);
        assert_eq!(err.culprits(), vec![("size", String::from("SMALL"))]);
        assert_eq!(
            err.to_string(),
            "Illegal value for size: SMALL (TEXT has no SMALL variant)"
        );
    }

    #[test]
    fn test_unsupported_operation_culprits() {
        let err = DbalError::unsupported("list_tables", "unconnected");
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(err.culprits().len(), 2);
    }

    #[test]
    fn test_database_api_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = DbalError::database_api(io, Some("SELECT 1"));
        assert_eq!(err.kind(), ErrorKind::DatabaseApiError);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.culprits(), vec![("sql", String::from("SELECT 1"))]);
    }
}
