//! # Arel: relational algebra for SQL
//!
//! Build queries as a typed AST, render them through a dialect-aware visitor.
//!
//! ## Quick Example
//!
//! ```rust
//! use arel::prelude::*;
//!
//! let users = Table::new("users");
//! let sql = users
//!     .from()
//!     .project(users.attr("id"))
//!     .filter(users.attr("name").eq("nick"))
//!     .take(10)
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."id" FROM "users" WHERE "users"."name" = 'nick' LIMIT 10"#
//! );
//! ```
//!
//! ## Layers
//!
//! | Module       | Role                                          |
//! |--------------|-----------------------------------------------|
//! | `ast`        | Nodes, tables, attributes and builder traits  |
//! | `manager`    | Select/Insert/Update/Delete tree managers     |
//! | `transpiler` | Visitor, collectors, connections and dialects |
//! | `types`      | Column types and attribute casting            |
//! | `config`     | TOML connection settings                      |

pub mod ast;
pub mod config;
pub mod error;
pub mod manager;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::ConnectionConfig;
    pub use crate::error::*;
    pub use crate::manager::{
        DeleteManager, InsertManager, JoinTarget, SelectManager, StatementMethods, UpdateManager,
    };
    pub use crate::transpiler::{BoundSql, Connection, Dialect, DialectConnection, ToSql};
    pub use crate::types::{ColumnType, SchemaTypeCaster, TypeCaster};
}
