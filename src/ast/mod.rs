//! Relational algebra AST.
//!
//! - `values`: primitive values, operands and ranges
//! - `table`: tables, aliases and attributes
//! - `node`: the `Node` sum type and its payloads
//! - `statements`: SELECT/INSERT/UPDATE/DELETE, joins and compound queries
//! - `builders`: predications, math, ordering and expression helpers

pub mod builders;
pub mod node;
pub mod statements;
pub mod table;
pub mod values;

pub use node::*;
pub use statements::*;
pub use table::*;
pub use values::*;
