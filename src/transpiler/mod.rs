//! SQL Transpiler for the Arel AST.
//!
//! Renders nodes and statements into dialect-correct SQL strings.

pub mod collector;
pub mod connection;
pub mod dialect;
pub mod dml;
pub mod sql;
pub mod traits;
pub mod visitor;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{
    Attribute, Case, DeleteStatement, InsertStatement, Node, SelectStatement, SetOperation,
    SqlLiteral, Table, TableAlias, UpdateStatement, Value,
};
use crate::error::ArelResult;

pub use collector::{BindCollector, Collector, SqlString, SubstituteBinds};
pub use connection::{Connection, DialectConnection};
pub use dialect::Dialect;
pub use traits::SqlGenerator;
pub use visitor::Visitor;

/// Anything the visitor can render.
pub trait Visitable {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()>;
}

impl Visitable for Node {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
        visitor.visit(self, out)
    }
}

macro_rules! visitable_as_node {
    ($($t:ty),* $(,)?) => {
        $(
            impl Visitable for $t {
                fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
                    visitor.visit(&Node::from(self.clone()), out)
                }
            }
        )*
    };
}

visitable_as_node!(
    Attribute,
    SqlLiteral,
    Table,
    TableAlias,
    Case,
    SelectStatement,
    InsertStatement,
    UpdateStatement,
    DeleteStatement,
    SetOperation,
);

/// SQL text with its bind values in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundSql {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string using default dialect.
    fn to_sql(&self) -> ArelResult<String> {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Convert this node to a SQL string with specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> ArelResult<String> {
        self.to_sql_with(&DialectConnection::new(dialect))
    }

    /// Render through `conn`. Binds become placeholders when the connection
    /// uses prepared statements and are quoted inline otherwise.
    fn to_sql_with(&self, conn: &dyn Connection) -> ArelResult<String>;

    /// Placeholders in the text, bind values returned alongside.
    fn to_bound_sql(&self, conn: &dyn Connection) -> ArelResult<BoundSql>;
}

impl<T: Visitable + ?Sized> ToSql for T {
    fn to_sql_with(&self, conn: &dyn Connection) -> ArelResult<String> {
        let visitor = Visitor::new(conn);
        let sql = if conn.prepared_statements() {
            let mut out = SqlString::new();
            self.accept(&visitor, &mut out)?;
            out.into_string()
        } else {
            let mut out = SubstituteBinds::new();
            self.accept(&visitor, &mut out)?;
            out.into_string()
        };
        debug!(dialect = ?conn.dialect(), %sql, "rendered");
        Ok(sql)
    }

    fn to_bound_sql(&self, conn: &dyn Connection) -> ArelResult<BoundSql> {
        let visitor = Visitor::new(conn);
        let mut out = BindCollector::new();
        self.accept(&visitor, &mut out)?;
        let (sql, binds) = out.into_parts();
        debug!(dialect = ?conn.dialect(), binds = binds.len(), "rendered with binds");
        Ok(BoundSql { sql, binds })
    }
}
