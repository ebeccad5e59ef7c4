//! Statement nodes, joins and compound queries.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::ast::{Attribute, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    /// Raw SQL join fragment
    String,
    /// Relation rendered without a join keyword
    Leading,
}

/// One join: `KIND JOIN relation [ON constraint]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub relation: Node,
    /// Always an `On` node when present
    pub constraint: Option<Node>,
}

impl Join {
    pub fn new(kind: JoinKind, relation: impl Into<Node>, constraint: Option<Node>) -> Self {
        Self {
            kind,
            relation: relation.into(),
            constraint,
        }
    }
}

/// FROM clause: a left relation followed by its joins in order.
///
/// A source holding exactly one join is compared as an unordered pair of
/// relations, so `A JOIN B ON p` equals `B JOIN A ON p`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinSource {
    pub left: Option<Node>,
    pub right: Vec<Join>,
}

impl JoinSource {
    pub fn new(left: Option<Node>) -> Self {
        Self {
            left,
            right: Vec::new(),
        }
    }

    /// `a KIND JOIN b ON constraint`
    pub fn pair(kind: JoinKind, a: impl Into<Node>, b: impl Into<Node>, constraint: Option<Node>) -> Self {
        Self {
            left: Some(a.into()),
            right: vec![Join::new(kind, b, constraint.map(|c| Node::On(Box::new(c))))],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_empty()
    }

    fn as_pair(&self) -> Option<(&Node, &Join)> {
        match (&self.left, self.right.as_slice()) {
            (Some(left), [join]) => Some((left, join)),
            _ => None,
        }
    }
}

fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for JoinSource {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_pair(), other.as_pair()) {
            (Some((a1, j1)), Some((a2, j2))) => {
                j1.kind == j2.kind
                    && j1.constraint == j2.constraint
                    && ((*a1 == *a2 && j1.relation == j2.relation)
                        || (*a1 == j2.relation && j1.relation == *a2))
            }
            _ => self.left == other.left && self.right == other.right,
        }
    }
}

impl Eq for JoinSource {}

impl Hash for JoinSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_pair() {
            Some((left, join)) => {
                join.kind.hash(state);
                join.constraint.hash(state);
                // Order independent combination of both relations
                hash_one(left).wrapping_add(hash_one(&join.relation)).hash(state);
            }
            None => {
                self.left.hash(state);
                self.right.hash(state);
            }
        }
    }
}

/// One `SELECT ... FROM ... WHERE ...` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectCore {
    pub source: JoinSource,
    pub projections: Vec<Node>,
    pub wheres: Vec<Node>,
    /// `Distinct` or `DistinctOn`
    pub set_quantifier: Option<Node>,
    pub optimizer_hints: Option<Node>,
    pub groups: Vec<Node>,
    pub havings: Vec<Node>,
    pub windows: Vec<Node>,
    pub comment: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectStatement {
    pub cores: Vec<SelectCore>,
    pub orders: Vec<Node>,
    pub limit: Option<Node>,
    pub offset: Option<Node>,
    /// Lock clause as raw SQL
    pub lock: Option<Node>,
    pub with: Option<Node>,
}

impl Default for SelectStatement {
    fn default() -> Self {
        Self {
            cores: vec![SelectCore::default()],
            orders: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
            with: None,
        }
    }
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Needs parentheses when used inside a compound query.
    pub fn requires_parentheses(&self) -> bool {
        !self.orders.is_empty() || self.limit.is_some() || self.offset.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsertStatement {
    pub relation: Option<Node>,
    pub columns: Vec<Attribute>,
    /// `ValuesList` or raw SQL
    pub values: Option<Node>,
    pub select: Option<Node>,
    pub returning: Vec<Node>,
}

/// Clauses shared by UPDATE and DELETE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationClauses {
    pub wheres: Vec<Node>,
    pub orders: Vec<Node>,
    pub limit: Option<Node>,
    pub offset: Option<Node>,
    /// Primary key used to push LIMIT/ORDER/joins into a subselect
    pub key: Option<Node>,
    pub groups: Vec<Node>,
    pub havings: Vec<Node>,
}

impl MutationClauses {
    pub fn has_limit_or_offset_or_orders(&self) -> bool {
        self.limit.is_some() || self.offset.is_some() || !self.orders.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub relation: Option<Node>,
    /// Assignments, or raw SQL
    pub values: Vec<Node>,
    pub clauses: MutationClauses,
    pub returning: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub relation: Option<Node>,
    pub clauses: MutationClauses,
    pub returning: Vec<Node>,
}

/// Whether the relation of a mutation carries joins.
pub(crate) fn has_join_sources(relation: Option<&Node>) -> bool {
    matches!(relation, Some(Node::JoinSource(source)) if !source.right.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOpKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            SetOpKind::Union => "UNION",
            SetOpKind::UnionAll => "UNION ALL",
            SetOpKind::Intersect => "INTERSECT",
            SetOpKind::Except => "EXCEPT",
        }
    }

    /// UNION chains flatten into one parenthesized group.
    pub fn flattens(&self) -> bool {
        matches!(self, SetOpKind::Union | SetOpKind::UnionAll)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetOperation {
    pub kind: SetOpKind,
    pub left: Node,
    pub right: Node,
}

impl SetOperation {
    pub fn new(kind: SetOpKind, left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Self {
            kind,
            left: left.into(),
            right: right.into(),
        }
    }
}

impl From<SetOperation> for Node {
    fn from(op: SetOperation) -> Self {
        Node::SetOperation(Box::new(op))
    }
}

/// `WITH [RECURSIVE] a AS (...), b AS (...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct With {
    pub recursive: bool,
    /// `Cte`, `TableAlias` or `As(table, relation)` nodes
    pub children: Vec<Node>,
}

/// A named common table expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cte {
    pub name: String,
    pub relation: Node,
    /// `Some(true)` MATERIALIZED, `Some(false)` NOT MATERIALIZED
    pub materialized: Option<bool>,
}

impl Cte {
    pub fn new(name: impl Into<String>, relation: impl Into<Node>) -> Self {
        Self {
            name: name.into(),
            relation: relation.into(),
            materialized: None,
        }
    }

    pub fn materialized(mut self, materialized: bool) -> Self {
        self.materialized = Some(materialized);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        hash_one(value)
    }

    #[test]
    fn test_join_pair_is_commutative() {
        let users = Table::new("users");
        let posts = Table::new("posts");
        let on = users.attr("id").eq(posts.attr("user_id"));

        let ab = JoinSource::pair(JoinKind::Inner, users.clone(), posts.clone(), Some(on.clone()));
        let ba = JoinSource::pair(JoinKind::Inner, posts.clone(), users.clone(), Some(on.clone()));
        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));

        let other = users.attr("id").eq(posts.attr("author_id"));
        let ab2 = JoinSource::pair(JoinKind::Inner, users.clone(), posts.clone(), Some(other));
        assert_ne!(ab, ab2);

        let outer = JoinSource::pair(JoinKind::LeftOuter, users, posts, Some(on));
        assert_ne!(ab, outer);
    }

    #[test]
    fn test_select_statement_has_one_core() {
        let stmt = SelectStatement::new();
        assert_eq!(stmt.cores.len(), 1);
        assert!(!stmt.requires_parentheses());
        assert!(stmt.cores[0].source.is_empty());
    }

    #[test]
    fn test_mutation_clause_predicates() {
        let mut clauses = MutationClauses::default();
        assert!(!clauses.has_limit_or_offset_or_orders());
        clauses.orders.push(Node::True);
        assert!(clauses.has_limit_or_offset_or_orders());
    }
}
