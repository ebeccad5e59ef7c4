//! The node model.
//!
//! Every SQL construct is one variant of [`Node`]. The visitor matches on it
//! exhaustively, so a new variant cannot be added without a rendering for it.

use serde::{Deserialize, Serialize};

use crate::ast::{
    Attribute, Cte, DeleteStatement, InsertStatement, Join, JoinSource, SelectStatement,
    SetOperation, Table, TableAlias, UpdateStatement, Value, ValuesTable, With,
};

/// Raw SQL. Rendered verbatim, never quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw SQL with positional `?` binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundSqlLiteral {
    pub sql: String,
    pub binds: Vec<Node>,
}

/// A value cast through the column type of `attribute` before quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Casted {
    pub value: Value,
    pub attribute: Attribute,
}

impl Casted {
    pub fn value_for_database(&self) -> Value {
        if self.attribute.able_to_type_cast() {
            self.attribute.type_cast_for_database(&self.value)
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Equality,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Between,
    IsDistinctFrom,
    IsNotDistinctFrom,
    As,
    Assignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: Node,
    pub right: Node,
}

/// LIKE family. Case-insensitive unless `case_sensitive` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matches {
    pub left: Node,
    pub right: Node,
    pub escape: Option<String>,
    pub case_sensitive: bool,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Regexp {
    pub left: Node,
    pub right: Node,
    pub case_sensitive: bool,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfixOp {
    Multiply,
    Divide,
    Add,
    Subtract,
    Concat,
    Contains,
    Overlaps,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    Custom(String),
}

impl InfixOp {
    pub fn as_str(&self) -> &str {
        match self {
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Add => "+",
            InfixOp::Subtract => "-",
            InfixOp::Concat => "||",
            InfixOp::Contains => "@>",
            InfixOp::Overlaps => "&&",
            InfixOp::BitwiseAnd => "&",
            InfixOp::BitwiseOr => "|",
            InfixOp::BitwiseXor => "^",
            InfixOp::ShiftLeft => "<<",
            InfixOp::ShiftRight => ">>",
            InfixOp::Custom(op) => op,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfixOperation {
    pub op: InfixOp,
    pub left: Node,
    pub right: Node,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnaryOperation {
    pub op: String,
    pub expr: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ordering {
    pub expr: Node,
    pub direction: Direction,
    pub nulls: Option<NullsOrder>,
}

impl Ordering {
    /// Flip the direction and the NULLS placement.
    pub fn reverse(self) -> Self {
        Self {
            expr: self.expr,
            direction: match self.direction {
                Direction::Asc => Direction::Desc,
                Direction::Desc => Direction::Asc,
            },
            nulls: self.nulls.map(|n| match n {
                NullsOrder::First => NullsOrder::Last,
                NullsOrder::Last => NullsOrder::First,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Count,
    Sum,
    Max,
    Min,
    Avg,
    Named(String),
}

impl FunctionKind {
    pub fn name(&self) -> &str {
        match self {
            FunctionKind::Count => "COUNT",
            FunctionKind::Sum => "SUM",
            FunctionKind::Max => "MAX",
            FunctionKind::Min => "MIN",
            FunctionKind::Avg => "AVG",
            FunctionKind::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Function {
    pub kind: FunctionKind,
    pub args: Vec<Node>,
    pub distinct: bool,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extract {
    pub field: String,
    pub expr: Node,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exists {
    pub expr: Node,
    pub alias: Option<String>,
}

/// `expr FILTER (WHERE predicate)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub expr: Node,
    pub predicate: Node,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Case {
    pub case: Option<Node>,
    pub conditions: Vec<(Node, Node)>,
    pub default: Option<Node>,
}

/// `expr OVER window`. Without a window renders `OVER ()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Over {
    pub expr: Node,
    pub window: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    pub partitions: Vec<Node>,
    pub orders: Vec<Node>,
    pub framing: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedWindow {
    pub name: String,
    pub window: Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupingSetKind {
    Cube,
    Rollup,
    GroupingSets,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupingSet {
    pub kind: GroupingSetKind,
    pub elements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    True,
    False,
    Distinct,
    CurrentRow,
    SqlLiteral(SqlLiteral),
    BoundSqlLiteral(Box<BoundSqlLiteral>),
    /// Value quoted through the connection
    Quoted(Value),
    Casted(Box<Casted>),
    /// Value sent out of line as a bind
    BindParam(Value),
    Attribute(Attribute),
    /// Column name without its table qualifier (UPDATE ... SET)
    UnqualifiedColumn(Attribute),
    /// Quoted column identifier
    Identifier(String),
    Table(Table),
    TableAlias(TableAlias),
    ValuesTable(Box<ValuesTable>),
    ValuesList(Vec<Vec<Node>>),
    /// Comma separated list, no parentheses
    List(Vec<Node>),
    Grouping(Box<Node>),
    Not(Box<Node>),
    On(Box<Node>),
    Lateral(Box<Node>),
    Ordering(Box<Ordering>),
    DistinctOn(Vec<Node>),
    Binary(Box<Binary>),
    Matches(Box<Matches>),
    Regexp(Box<Regexp>),
    And(Vec<Node>),
    Or(Box<Node>, Box<Node>),
    Infix(Box<InfixOperation>),
    Unary(Box<UnaryOperation>),
    Function(Box<Function>),
    Extract(Box<Extract>),
    Exists(Box<Exists>),
    Filter(Box<Filter>),
    Case(Box<Case>),
    Over(Box<Over>),
    Window(Box<Window>),
    NamedWindow(Box<NamedWindow>),
    Rows(Option<Box<Node>>),
    RangeFrame(Option<Box<Node>>),
    /// `n PRECEDING`, `UNBOUNDED PRECEDING` when empty
    Preceding(Option<Box<Node>>),
    Following(Option<Box<Node>>),
    FrameBetween(Box<Node>, Box<Node>),
    Join(Box<Join>),
    JoinSource(Box<JoinSource>),
    Select(Box<SelectStatement>),
    Insert(Box<InsertStatement>),
    Update(Box<UpdateStatement>),
    Delete(Box<DeleteStatement>),
    SetOperation(Box<SetOperation>),
    With(Box<With>),
    Cte(Box<Cte>),
    GroupingSet(Box<GroupingSet>),
    GroupingElement(Vec<Node>),
    OptimizerHints(Vec<String>),
    Comment(Vec<String>),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::True => "True",
            Node::False => "False",
            Node::Distinct => "Distinct",
            Node::CurrentRow => "CurrentRow",
            Node::SqlLiteral(_) => "SqlLiteral",
            Node::BoundSqlLiteral(_) => "BoundSqlLiteral",
            Node::Quoted(_) => "Quoted",
            Node::Casted(_) => "Casted",
            Node::BindParam(_) => "BindParam",
            Node::Attribute(_) => "Attribute",
            Node::UnqualifiedColumn(_) => "UnqualifiedColumn",
            Node::Identifier(_) => "Identifier",
            Node::Table(_) => "Table",
            Node::TableAlias(_) => "TableAlias",
            Node::ValuesTable(_) => "ValuesTable",
            Node::ValuesList(_) => "ValuesList",
            Node::List(_) => "List",
            Node::Grouping(_) => "Grouping",
            Node::Not(_) => "Not",
            Node::On(_) => "On",
            Node::Lateral(_) => "Lateral",
            Node::Ordering(_) => "Ordering",
            Node::DistinctOn(_) => "DistinctOn",
            Node::Binary(b) => match b.op {
                BinaryOp::Equality => "Equality",
                BinaryOp::NotEqual => "NotEqual",
                BinaryOp::GreaterThan => "GreaterThan",
                BinaryOp::GreaterThanOrEqual => "GreaterThanOrEqual",
                BinaryOp::LessThan => "LessThan",
                BinaryOp::LessThanOrEqual => "LessThanOrEqual",
                BinaryOp::In => "In",
                BinaryOp::NotIn => "NotIn",
                BinaryOp::Between => "Between",
                BinaryOp::IsDistinctFrom => "IsDistinctFrom",
                BinaryOp::IsNotDistinctFrom => "IsNotDistinctFrom",
                BinaryOp::As => "As",
                BinaryOp::Assignment => "Assignment",
            },
            Node::Matches(m) if m.negated => "DoesNotMatch",
            Node::Matches(_) => "Matches",
            Node::Regexp(r) if r.negated => "NotRegexp",
            Node::Regexp(_) => "Regexp",
            Node::And(_) => "And",
            Node::Or(_, _) => "Or",
            Node::Infix(_) => "InfixOperation",
            Node::Unary(_) => "UnaryOperation",
            Node::Function(_) => "Function",
            Node::Extract(_) => "Extract",
            Node::Exists(_) => "Exists",
            Node::Filter(_) => "Filter",
            Node::Case(_) => "Case",
            Node::Over(_) => "Over",
            Node::Window(_) => "Window",
            Node::NamedWindow(_) => "NamedWindow",
            Node::Rows(_) => "Rows",
            Node::RangeFrame(_) => "Range",
            Node::Preceding(_) => "Preceding",
            Node::Following(_) => "Following",
            Node::FrameBetween(_, _) => "Between",
            Node::Join(_) => "Join",
            Node::JoinSource(_) => "JoinSource",
            Node::Select(_) => "SelectStatement",
            Node::Insert(_) => "InsertStatement",
            Node::Update(_) => "UpdateStatement",
            Node::Delete(_) => "DeleteStatement",
            Node::SetOperation(_) => "SetOperation",
            Node::With(_) => "With",
            Node::Cte(_) => "Cte",
            Node::GroupingSet(_) => "GroupingSet",
            Node::GroupingElement(_) => "GroupingElement",
            Node::OptimizerHints(_) => "OptimizerHints",
            Node::Comment(_) => "Comment",
        }
    }

    /// Force parentheses around `node`.
    pub fn grouping(node: impl Into<Node>) -> Node {
        Node::Grouping(Box::new(node.into()))
    }

    pub(crate) fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::Binary(Box::new(Binary { op, left, right }))
    }

    /// `self AND other`
    pub fn and(self, other: impl Into<Node>) -> Node {
        Node::And(vec![self, other.into()])
    }

    /// `(self OR other)`, grouped to keep precedence under further composition.
    pub fn or(self, other: impl Into<Node>) -> Node {
        Node::grouping(Node::Or(Box::new(self), Box::new(other.into())))
    }

    /// `NOT (self)`
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Node {
        Node::Not(Box::new(self))
    }

    /// A quoted NULL: renders `IS NULL` on the right of `=`.
    pub fn is_null_value(&self) -> bool {
        match self {
            Node::Quoted(v) | Node::BindParam(v) => v.is_null(),
            Node::Casted(c) => c.value.is_null(),
            _ => false,
        }
    }
}

impl From<Attribute> for Node {
    fn from(attr: Attribute) -> Self {
        Node::Attribute(attr)
    }
}

impl From<&Attribute> for Node {
    fn from(attr: &Attribute) -> Self {
        Node::Attribute(attr.clone())
    }
}

impl From<SqlLiteral> for Node {
    fn from(lit: SqlLiteral) -> Self {
        Node::SqlLiteral(lit)
    }
}

impl From<Table> for Node {
    fn from(table: Table) -> Self {
        Node::Table(table)
    }
}

impl From<&Table> for Node {
    fn from(table: &Table) -> Self {
        Node::Table(table.clone())
    }
}

impl From<TableAlias> for Node {
    fn from(alias: TableAlias) -> Self {
        Node::TableAlias(alias)
    }
}

impl From<ValuesTable> for Node {
    fn from(values: ValuesTable) -> Self {
        Node::ValuesTable(Box::new(values))
    }
}

impl From<Ordering> for Node {
    fn from(ordering: Ordering) -> Self {
        Node::Ordering(Box::new(ordering))
    }
}

impl From<Window> for Node {
    fn from(window: Window) -> Self {
        Node::Window(Box::new(window))
    }
}

impl From<NamedWindow> for Node {
    fn from(window: NamedWindow) -> Self {
        Node::NamedWindow(Box::new(window))
    }
}

impl From<Case> for Node {
    fn from(case: Case) -> Self {
        Node::Case(Box::new(case))
    }
}

impl From<Join> for Node {
    fn from(join: Join) -> Self {
        Node::Join(Box::new(join))
    }
}

impl From<JoinSource> for Node {
    fn from(source: JoinSource) -> Self {
        Node::JoinSource(Box::new(source))
    }
}

impl From<SelectStatement> for Node {
    fn from(stmt: SelectStatement) -> Self {
        Node::Select(Box::new(stmt))
    }
}

impl From<InsertStatement> for Node {
    fn from(stmt: InsertStatement) -> Self {
        Node::Insert(Box::new(stmt))
    }
}

impl From<UpdateStatement> for Node {
    fn from(stmt: UpdateStatement) -> Self {
        Node::Update(Box::new(stmt))
    }
}

impl From<DeleteStatement> for Node {
    fn from(stmt: DeleteStatement) -> Self {
        Node::Delete(Box::new(stmt))
    }
}

impl From<Cte> for Node {
    fn from(cte: Cte) -> Self {
        Node::Cte(Box::new(cte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::Predications;
    use std::collections::HashSet;

    #[test]
    fn test_structural_equality_and_hash() {
        let users = Table::new("users");
        let a = users.attr("id").eq(1);
        let b = users.attr("id").eq(1);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&users.attr("id").eq(2)));
    }

    #[test]
    fn test_or_is_grouped() {
        let node = Node::True.or(Node::False);
        assert!(matches!(node, Node::Grouping(ref inner) if matches!(**inner, Node::Or(_, _))));
    }

    #[test]
    fn test_kind_name() {
        let users = Table::new("users");
        assert_eq!(users.attr("id").eq(1).kind_name(), "Equality");
        assert_eq!(Node::Quoted(Value::Null).kind_name(), "Quoted");
        assert!(Node::Quoted(Value::Null).is_null_value());
    }

    #[test]
    fn test_serde_round_trip() {
        let users = Table::new("users");
        let node = users.attr("name").eq("nick").and(users.attr("id").gt(3));
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
