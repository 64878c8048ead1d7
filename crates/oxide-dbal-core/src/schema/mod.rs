//! Dialect-independent schema objects.
//!
//! A [`Table`] is an ordered list of [`Column`]s, each with a semantic
//! [`Type`]. Dialects turn types into backend type names; see
//! [`Dialect::type_name`](crate::dialect::Dialect::type_name).

mod table;
mod types;

pub use table::{Column, Table};
pub use types::{Size, Type};
