//! INSERT builder.

use crate::ast::builders::build_quoted;
use crate::ast::{Attribute, InsertStatement, Node, Operand, SqlLiteral};
use crate::error::ArelResult;
use crate::manager::SelectManager;
use crate::transpiler::collector::Collector;
use crate::transpiler::{Visitable, Visitor};

/// Builds one `INSERT` statement.
///
/// # Example
/// ```
/// use arel::prelude::*;
///
/// let users = Table::new("users");
/// let sql = InsertManager::new()
///     .insert([(users.attr("name"), "nick")])
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, r#"INSERT INTO "users" ("name") VALUES ('nick')"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertManager {
    ast: InsertStatement,
}

impl InsertManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &InsertStatement {
        &self.ast
    }

    pub fn into_ast(self) -> InsertStatement {
        self.ast
    }

    /// Target relation.
    pub fn into(mut self, relation: impl Into<Node>) -> Self {
        self.ast.relation = Some(relation.into());
        self
    }

    /// Column/value pairs forming one row.
    ///
    /// Values are cast through their column. Without an explicit target the
    /// relation of the first column is used. An empty list changes nothing.
    pub fn insert<I, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Attribute, V)>,
        V: Into<Operand>,
    {
        let mut row = Vec::new();
        for (column, value) in pairs {
            if self.ast.relation.is_none() {
                self.ast.relation = Some((*column.relation).clone());
            }
            row.push(build_quoted(value, Some(&column)));
            self.ast.columns.push(column);
        }
        if !row.is_empty() {
            self.ast.values = Some(Node::ValuesList(vec![row]));
        }
        self
    }

    /// Raw SQL after the column list, e.g. `DEFAULT VALUES`.
    pub fn insert_sql(mut self, raw: SqlLiteral) -> Self {
        if !raw.is_empty() {
            self.ast.values = Some(Node::SqlLiteral(raw));
        }
        self
    }

    /// `VALUES (..), (..)` for several rows at once.
    pub fn values_list<R, V>(mut self, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| build_quoted(v, None)).collect())
            .collect();
        self.ast.values = Some(Node::ValuesList(rows));
        self
    }

    /// `INSERT INTO .. SELECT ..`
    pub fn select(mut self, select: SelectManager) -> Self {
        self.ast.select = Some(Node::from(select.into_ast()));
        self
    }

    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.ast.columns.extend(columns);
        self
    }

    /// `RETURNING ..` on dialects that have it.
    pub fn returning<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.ast.returning = exprs.into_iter().map(Into::into).collect();
        self
    }
}

impl Visitable for InsertManager {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
        visitor.visit_insert_statement(&self.ast, out)
    }
}
