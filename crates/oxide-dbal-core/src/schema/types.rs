//! Dialect-independent column types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Size class of a sized type.
///
/// Dialects map each class to a concrete storage type. A dialect that has no
/// storage type for a given class rejects it with `IllegalValue`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Size {
    /// Smallest storage class (one byte integers, tiny text).
    Tiny,
    /// Small storage class.
    Small,
    /// Medium storage class.
    Medium,
    /// Default storage class.
    #[default]
    Normal,
    /// Largest storage class.
    Big,
}

impl Size {
    /// Returns the upper-case name of the size class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "TINY",
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Normal => "NORMAL",
            Self::Big => "BIG",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Whole number of the given size class.
    Integer(Size),
    /// Floating point number of the given size class.
    Float(Size),
    /// Exact decimal number.
    Numeric {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
    },
    /// Fixed-length character string.
    Char(u32),
    /// Variable-length character string with a maximum length.
    VarChar(u32),
    /// Unbounded text of the given size class.
    Text(Size),
    /// Binary data of the given size class.
    Blob(Size),
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Time of day.
    Time,
}

impl Type {
    /// Precision used when a backend reports a numeric column without one.
    pub const DEFAULT_PRECISION: u8 = 10;

    /// A normal sized integer.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer(Size::Normal)
    }

    /// A normal sized text.
    #[must_use]
    pub const fn text() -> Self {
        Self::Text(Size::Normal)
    }

    /// Returns the variant name, used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Numeric { .. } => "NUMERIC",
            Self::Char(_) => "CHAR",
            Self::VarChar(_) => "VARCHAR",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(size) | Self::Float(size) | Self::Text(size) | Self::Blob(size) => {
                write!(f, "{}[{size}]", self.name())
            }
            Self::Numeric { precision, scale } => write!(f, "NUMERIC({precision}, {scale})"),
            Self::Char(len) => write!(f, "CHAR({len})"),
            Self::VarChar(len) => write!(f, "VARCHAR({len})"),
            _ => f.write_str(self.name()),
        }
    }
}
