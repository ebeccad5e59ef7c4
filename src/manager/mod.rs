//! Tree managers.
//!
//! Each manager owns one statement AST and grows it through consuming builder
//! calls. Cloning a manager forks the AST; nothing is shared between clones.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::DeleteManager;
pub use insert::InsertManager;
pub use select::SelectManager;
pub use update::UpdateManager;

use crate::ast::builders::build_quoted;
use crate::ast::{MutationClauses, Node, SqlLiteral, Table, TableAlias};

/// Relation handed to [`SelectManager::join`].
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    /// Nothing to join; the manager is returned unchanged
    None,
    /// Raw SQL join fragment
    Raw(SqlLiteral),
    Relation(Node),
}

impl From<Table> for JoinTarget {
    fn from(table: Table) -> Self {
        JoinTarget::Relation(Node::Table(table))
    }
}

impl From<&Table> for JoinTarget {
    fn from(table: &Table) -> Self {
        JoinTarget::Relation(Node::Table(table.clone()))
    }
}

impl From<TableAlias> for JoinTarget {
    fn from(alias: TableAlias) -> Self {
        JoinTarget::Relation(Node::TableAlias(alias))
    }
}

impl From<SqlLiteral> for JoinTarget {
    fn from(lit: SqlLiteral) -> Self {
        JoinTarget::Raw(lit)
    }
}

impl From<Node> for JoinTarget {
    fn from(node: Node) -> Self {
        match node {
            Node::SqlLiteral(lit) => JoinTarget::Raw(lit),
            node => JoinTarget::Relation(node),
        }
    }
}

impl<T: Into<JoinTarget>> From<Option<T>> for JoinTarget {
    fn from(target: Option<T>) -> Self {
        target.map_or(JoinTarget::None, Into::into)
    }
}

/// WHERE, ORDER BY, LIMIT and friends shared by UPDATE and DELETE.
pub trait StatementMethods: Sized {
    fn clauses_mut(&mut self) -> &mut MutationClauses;

    /// Add a WHERE condition. Repeated calls are ANDed.
    fn filter(mut self, expr: impl Into<Node>) -> Self {
        self.clauses_mut().wheres.push(expr.into());
        self
    }

    fn take(mut self, limit: impl Into<Option<u64>>) -> Self {
        self.clauses_mut().limit = limit.into().map(|n| build_quoted(n, None));
        self
    }

    fn skip(mut self, offset: impl Into<Option<u64>>) -> Self {
        self.clauses_mut().offset = offset.into().map(|n| build_quoted(n, None));
        self
    }

    fn order(mut self, expr: impl Into<Node>) -> Self {
        self.clauses_mut().orders.push(expr.into());
        self
    }

    /// Primary key used when clauses must move into a subselect.
    fn key(mut self, key: impl Into<Node>) -> Self {
        self.clauses_mut().key = Some(key.into());
        self
    }

    fn group(mut self, expr: impl Into<Node>) -> Self {
        self.clauses_mut().groups.push(expr.into());
        self
    }

    fn having(mut self, expr: impl Into<Node>) -> Self {
        self.clauses_mut().havings.push(expr.into());
        self
    }
}
