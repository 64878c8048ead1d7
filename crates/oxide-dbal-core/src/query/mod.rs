//! Query model: SELECT statements, table references and the alias
//! registry that keeps names unique within one query.

mod registry;
mod select;
mod table_ref;

pub use registry::AliasRegistry;
pub use select::{Order, Select};
pub use table_ref::{Join, JoinCondition, TableName, TableReference, Using};
