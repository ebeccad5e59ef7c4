//! SELECT builder.

use crate::ast::builders::{InOperand, build_quoted};
use crate::ast::{
    BinaryOp, Join, JoinKind, JoinSource, NamedWindow, Node, Operand, SelectCore,
    SelectStatement, SetOpKind, SetOperation, SqlLiteral, Table, TableAlias, With,
};
use crate::error::{ArelError, ArelResult};
use crate::manager::JoinTarget;
use crate::transpiler::collector::Collector;
use crate::transpiler::connection::Connection;
use crate::transpiler::{ToSql, Visitable, Visitor};

/// Builds one `SELECT` statement.
///
/// # Example
/// ```
/// use arel::prelude::*;
///
/// let users = Table::new("users");
/// let sql = users
///     .from()
///     .project(users.attr("id"))
///     .filter(users.attr("name").eq("nick"))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, r#"SELECT "users"."id" FROM "users" WHERE "users"."name" = 'nick'"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectManager {
    ast: SelectStatement,
}

impl SelectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &SelectStatement {
        &self.ast
    }

    pub fn into_ast(self) -> SelectStatement {
        self.ast
    }

    /// The core new clauses are added to.
    fn ctx(&mut self) -> &mut SelectCore {
        if self.ast.cores.is_empty() {
            self.ast.cores.push(SelectCore::default());
        }
        let last = self.ast.cores.len() - 1;
        &mut self.ast.cores[last]
    }

    fn core(&self) -> Option<&SelectCore> {
        self.ast.cores.last()
    }

    // =========================================================================
    // FROM and joins
    // =========================================================================

    /// Set the relation to select from. A join node is appended to the joins instead.
    pub fn from(mut self, relation: impl Into<Node>) -> Self {
        match relation.into() {
            Node::Join(join) => self.ctx().source.right.push(*join),
            relation => self.ctx().source.left = Some(relation),
        }
        self
    }

    pub fn source(&self) -> Option<&JoinSource> {
        self.core().map(|core| &core.source)
    }

    /// `INNER JOIN target`
    pub fn join(self, target: impl Into<JoinTarget>) -> ArelResult<Self> {
        self.join_kind(target, JoinKind::Inner)
    }

    /// `LEFT OUTER JOIN target`
    pub fn outer_join(self, target: impl Into<JoinTarget>) -> ArelResult<Self> {
        self.join_kind(target, JoinKind::LeftOuter)
    }

    /// Append a join of `kind`. A raw SQL target becomes a string join.
    pub fn join_kind(mut self, target: impl Into<JoinTarget>, kind: JoinKind) -> ArelResult<Self> {
        let join = match target.into() {
            JoinTarget::None => return Ok(self),
            JoinTarget::Raw(lit) if lit.is_empty() => return Err(ArelError::EmptyJoin),
            JoinTarget::Raw(lit) => Join::new(JoinKind::String, lit, None),
            JoinTarget::Relation(relation) => Join::new(kind, relation, None),
        };
        self.ctx().source.right.push(join);
        Ok(self)
    }

    /// Constrain the last join.
    pub fn on(mut self, constraint: impl Into<Node>) -> ArelResult<Self> {
        let Some(join) = self.ctx().source.right.last_mut() else {
            return Err(ArelError::argument("`on` called before any join"));
        };
        join.constraint = Some(Node::On(Box::new(constraint.into())));
        Ok(self)
    }

    pub fn join_sources(&self) -> &[Join] {
        self.core().map_or(&[], |core| core.source.right.as_slice())
    }

    // =========================================================================
    // Projections and conditions
    // =========================================================================

    pub fn project(mut self, expr: impl Into<Node>) -> Self {
        self.ctx().projections.push(expr.into());
        self
    }

    pub fn project_all<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.ctx().projections.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn projections(&self) -> &[Node] {
        self.core().map_or(&[], |core| core.projections.as_slice())
    }

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn filter(mut self, expr: impl Into<Node>) -> Self {
        self.ctx().wheres.push(expr.into());
        self
    }

    pub fn constraints(&self) -> &[Node] {
        self.core().map_or(&[], |core| core.wheres.as_slice())
    }

    /// The WHERE clause alone, `None` without conditions.
    pub fn where_sql(&self, conn: &dyn Connection) -> ArelResult<Option<SqlLiteral>> {
        let wheres = self.constraints();
        if wheres.is_empty() {
            return Ok(None);
        }
        let sql = Node::And(wheres.to_vec()).to_sql_with(conn)?;
        Ok(Some(SqlLiteral::new(format!("WHERE {}", sql))))
    }

    pub fn group(mut self, expr: impl Into<Node>) -> Self {
        self.ctx().groups.push(expr.into());
        self
    }

    pub fn having(mut self, expr: impl Into<Node>) -> Self {
        self.ctx().havings.push(expr.into());
        self
    }

    /// `WINDOW "name" AS (...)`
    pub fn window(mut self, window: NamedWindow) -> Self {
        self.ctx().windows.push(Node::from(window));
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.ctx().set_quantifier = distinct.then_some(Node::Distinct);
        self
    }

    /// `DISTINCT ON ( ... )`. An empty list clears the quantifier.
    pub fn distinct_on<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let exprs: Vec<Node> = exprs.into_iter().map(Into::into).collect();
        self.ctx().set_quantifier = (!exprs.is_empty()).then_some(Node::DistinctOn(exprs));
        self
    }

    pub fn optimizer_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ctx().optimizer_hints = Some(Node::OptimizerHints(hints.into_iter().map(Into::into).collect()));
        self
    }

    pub fn comment<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ctx().comment = Some(Node::Comment(values.into_iter().map(Into::into).collect()));
        self
    }

    // =========================================================================
    // ORDER BY, LIMIT, OFFSET, locking
    // =========================================================================

    pub fn order(mut self, expr: impl Into<Node>) -> Self {
        self.ast.orders.push(expr.into());
        self
    }

    pub fn orders(&self) -> &[Node] {
        &self.ast.orders
    }

    /// LIMIT; `None` removes it.
    pub fn take(mut self, limit: impl Into<Option<u64>>) -> Self {
        self.ast.limit = limit.into().map(|n| build_quoted(n, None));
        self
    }

    pub fn limit(&self) -> Option<&Node> {
        self.ast.limit.as_ref()
    }

    /// OFFSET; `None` removes it.
    pub fn skip(mut self, offset: impl Into<Option<u64>>) -> Self {
        self.ast.offset = offset.into().map(|n| build_quoted(n, None));
        self
    }

    pub fn offset(&self) -> Option<&Node> {
        self.ast.offset.as_ref()
    }

    /// `FOR UPDATE`
    pub fn lock(mut self) -> Self {
        self.ast.lock = Some(Node::SqlLiteral(SqlLiteral::new("FOR UPDATE")));
        self
    }

    /// A custom lock clause such as `FOR SHARE SKIP LOCKED`.
    pub fn lock_with(mut self, clause: SqlLiteral) -> ArelResult<Self> {
        if clause.as_str().trim().is_empty() {
            return Err(ArelError::argument("lock clause cannot be empty"));
        }
        self.ast.lock = Some(Node::SqlLiteral(clause));
        Ok(self)
    }

    pub fn locked(&self) -> Option<&Node> {
        self.ast.lock.as_ref()
    }

    // =========================================================================
    // CTEs and compound queries
    // =========================================================================

    /// `WITH ...`. Children are `Cte` or `TableAlias` nodes.
    pub fn with<I>(self, ctes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.set_with(false, ctes)
    }

    pub fn with_recursive<I>(self, ctes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.set_with(true, ctes)
    }

    fn set_with<I>(mut self, recursive: bool, ctes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let children = ctes.into_iter().map(Into::into).collect();
        self.ast.with = Some(Node::With(Box::new(With { recursive, children })));
        self
    }

    fn set_operation(&self, kind: SetOpKind, other: &SelectManager) -> Node {
        Node::from(SetOperation::new(kind, self.ast.clone(), other.ast.clone()))
    }

    pub fn union(&self, other: &SelectManager) -> Node {
        self.set_operation(SetOpKind::Union, other)
    }

    pub fn union_all(&self, other: &SelectManager) -> Node {
        self.set_operation(SetOpKind::UnionAll, other)
    }

    pub fn intersect(&self, other: &SelectManager) -> Node {
        self.set_operation(SetOpKind::Intersect, other)
    }

    pub fn except(&self, other: &SelectManager) -> Node {
        self.set_operation(SetOpKind::Except, other)
    }

    /// `(SELECT ...) "name"`
    pub fn alias(&self, name: impl Into<String>) -> TableAlias {
        TableAlias::new(Node::grouping(self.ast.clone()), name)
    }

    /// `LATERAL (SELECT ...) ["name"]`
    pub fn lateral(&self, name: Option<&str>) -> Node {
        let base = match name {
            Some(name) => Node::TableAlias(self.alias(name)),
            None => Node::from(self.ast.clone()),
        };
        Node::Lateral(Box::new(base))
    }

    /// `EXISTS (SELECT ...)`
    pub fn exists(&self) -> Node {
        Node::from(self.ast.clone()).exists()
    }

    /// `(SELECT ...) AS "name"` for use as a projection.
    pub fn alias_as(&self, name: &str) -> Node {
        Node::binary(
            BinaryOp::As,
            Node::grouping(self.ast.clone()),
            Node::Identifier(name.to_string()),
        )
    }
}

impl Visitable for SelectManager {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
        visitor.visit_select_statement(&self.ast, out)
    }
}

/// A manager used as an expression is a parenthesized subquery.
impl From<SelectManager> for Node {
    fn from(manager: SelectManager) -> Self {
        Node::grouping(manager.ast)
    }
}

impl From<SelectManager> for Operand {
    fn from(manager: SelectManager) -> Self {
        Operand::Node(Node::from(manager))
    }
}

impl From<SelectManager> for InOperand {
    fn from(manager: SelectManager) -> Self {
        InOperand::Subquery(manager.ast)
    }
}

/// Shortcuts that start a [`SelectManager`] from a table.
impl Table {
    /// `SELECT ... FROM self`
    pub fn from(&self) -> SelectManager {
        SelectManager::new().from(self)
    }

    pub fn project(&self, expr: impl Into<Node>) -> SelectManager {
        self.from().project(expr)
    }

    pub fn filter(&self, expr: impl Into<Node>) -> SelectManager {
        self.from().filter(expr)
    }

    pub fn join(&self, target: impl Into<JoinTarget>) -> ArelResult<SelectManager> {
        self.from().join(target)
    }

    pub fn outer_join(&self, target: impl Into<JoinTarget>) -> ArelResult<SelectManager> {
        self.from().outer_join(target)
    }

    pub fn group(&self, expr: impl Into<Node>) -> SelectManager {
        self.from().group(expr)
    }

    pub fn having(&self, expr: impl Into<Node>) -> SelectManager {
        self.from().having(expr)
    }

    pub fn order(&self, expr: impl Into<Node>) -> SelectManager {
        self.from().order(expr)
    }

    pub fn take(&self, limit: u64) -> SelectManager {
        self.from().take(limit)
    }

    pub fn skip(&self, offset: u64) -> SelectManager {
        self.from().skip(offset)
    }
}
