//! Aggregates, aliases, CASE, windows and grouping extensions.

use super::{Predications, build_quoted};
use crate::ast::{
    BinaryOp, Case, Exists, Extract, Filter, Function, FunctionKind, GroupingSet, GroupingSetKind,
    NamedWindow, Node, Operand, Over, Window,
};

fn aggregate(kind: FunctionKind, expr: Node, distinct: bool) -> Node {
    Node::Function(Box::new(Function {
        kind,
        args: vec![expr],
        distinct,
        alias: None,
    }))
}

pub trait Expressions: Predications {
    /// `COUNT([DISTINCT] self)`
    fn count(&self, distinct: bool) -> Node {
        aggregate(FunctionKind::Count, self.to_expr(), distinct)
    }

    fn sum(&self) -> Node {
        aggregate(FunctionKind::Sum, self.to_expr(), false)
    }

    fn maximum(&self) -> Node {
        aggregate(FunctionKind::Max, self.to_expr(), false)
    }

    fn minimum(&self) -> Node {
        aggregate(FunctionKind::Min, self.to_expr(), false)
    }

    fn average(&self) -> Node {
        aggregate(FunctionKind::Avg, self.to_expr(), false)
    }

    /// `EXTRACT(FIELD FROM self)`
    fn extract(&self, field: &str) -> Node {
        Node::Extract(Box::new(Extract {
            field: field.to_uppercase(),
            expr: self.to_expr(),
        }))
    }

    /// `self FILTER (WHERE predicate)`
    fn filter(&self, predicate: impl Into<Node>) -> Node {
        Node::Filter(Box::new(Filter {
            expr: self.to_expr(),
            predicate: predicate.into(),
        }))
    }
}

impl<T: Predications> Expressions for T {}

pub trait AliasPredication {
    /// `self AS "name"`
    fn alias(&self, name: &str) -> Node;
}

impl<T: Predications> AliasPredication for T {
    fn alias(&self, name: &str) -> Node {
        match self.to_expr() {
            Node::Function(mut function) => {
                function.alias = Some(name.to_string());
                Node::Function(function)
            }
            Node::Exists(mut exists) => {
                exists.alias = Some(name.to_string());
                Node::Exists(exists)
            }
            expr => Node::binary(BinaryOp::As, expr, Node::Identifier(name.to_string())),
        }
    }
}

pub trait WindowPredications {
    /// `self OVER ()`
    fn over(&self) -> Node;
    /// `self OVER "name"`
    fn over_named(&self, name: &str) -> Node;
    /// `self OVER (PARTITION BY ...)`
    fn over_window(&self, window: Window) -> Node;
}

impl<T: Predications> WindowPredications for T {
    fn over(&self) -> Node {
        Node::Over(Box::new(Over {
            expr: self.to_expr(),
            window: None,
        }))
    }

    fn over_named(&self, name: &str) -> Node {
        Node::Over(Box::new(Over {
            expr: self.to_expr(),
            window: Some(Node::Identifier(name.to_string())),
        }))
    }

    fn over_window(&self, window: Window) -> Node {
        Node::Over(Box::new(Over {
            expr: self.to_expr(),
            window: Some(Node::from(window)),
        }))
    }
}

/// Searched `CASE WHEN .. THEN .. END`.
pub fn case() -> Case {
    Case::default()
}

impl Case {
    pub fn when(mut self, condition: impl Into<Operand>, then: impl Into<Operand>) -> Self {
        self.conditions
            .push((build_quoted(condition, None), build_quoted(then, None)));
        self
    }

    pub fn otherwise(mut self, default: impl Into<Operand>) -> Self {
        self.default = Some(build_quoted(default, None));
        self
    }
}

/// An anonymous window.
pub fn window() -> Window {
    Window::default()
}

impl Window {
    pub fn partition(mut self, expr: impl Into<Node>) -> Self {
        self.partitions.push(expr.into());
        self
    }

    pub fn order(mut self, expr: impl Into<Node>) -> Self {
        self.orders.push(expr.into());
        self
    }

    /// `ROWS [frame]`
    pub fn rows(mut self, frame: Option<Node>) -> Self {
        self.framing = Some(Node::Rows(frame.map(Box::new)));
        self
    }

    /// `RANGE [frame]`
    pub fn range(mut self, frame: Option<Node>) -> Self {
        self.framing = Some(Node::RangeFrame(frame.map(Box::new)));
        self
    }

    pub fn named(self, name: impl Into<String>) -> NamedWindow {
        NamedWindow {
            name: name.into(),
            window: self,
        }
    }
}

impl Node {
    /// `EXISTS (self)`
    pub fn exists(self) -> Node {
        Node::Exists(Box::new(Exists {
            expr: self,
            alias: None,
        }))
    }
}

pub fn unbounded_preceding() -> Node {
    Node::Preceding(None)
}

pub fn preceding(offset: impl Into<Operand>) -> Node {
    Node::Preceding(Some(Box::new(build_quoted(offset, None))))
}

pub fn unbounded_following() -> Node {
    Node::Following(None)
}

pub fn following(offset: impl Into<Operand>) -> Node {
    Node::Following(Some(Box::new(build_quoted(offset, None))))
}

pub fn current_row() -> Node {
    Node::CurrentRow
}

/// `BETWEEN start AND end` inside a frame.
pub fn frame_between(start: Node, end: Node) -> Node {
    Node::FrameBetween(Box::new(start), Box::new(end))
}

fn grouping_set<I>(kind: GroupingSetKind, elements: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::GroupingSet(Box::new(GroupingSet {
        kind,
        elements: elements.into_iter().map(Into::into).collect(),
    }))
}

/// `CUBE( a, b )`
pub fn cube<I>(elements: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    grouping_set(GroupingSetKind::Cube, elements)
}

/// `ROLLUP( a, b )`
pub fn rollup<I>(elements: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    grouping_set(GroupingSetKind::Rollup, elements)
}

/// `GROUPING SETS( ( a ), ( b ) )`
pub fn grouping_sets<I>(elements: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    grouping_set(GroupingSetKind::GroupingSets, elements)
}

/// `( a, b )`
pub fn grouping_element<I>(elements: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::GroupingElement(elements.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;
    use crate::ast::builders::{OrderPredications, star};
    use crate::transpiler::ToSql;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aggregates() {
        let users = Table::new("users");
        assert_eq!(
            users.attr("id").count(true).alias("n").to_sql().unwrap(),
            r#"COUNT(DISTINCT "users"."id") AS "n""#
        );
        assert_eq!(users.attr("age").average().to_sql().unwrap(), r#"AVG("users"."age")"#);
        assert_eq!(star().count(false).to_sql().unwrap(), "COUNT(*)");
    }

    #[test]
    fn test_extract() {
        let created = Table::new("users").attr("created_at");
        assert_eq!(
            created.extract("year").to_sql().unwrap(),
            r#"EXTRACT(YEAR FROM "users"."created_at")"#
        );
    }

    #[test]
    fn test_alias_on_plain_expression() {
        let name = Table::new("users").attr("name");
        assert_eq!(name.alias("login").to_sql().unwrap(), r#""users"."name" AS "login""#);
    }

    #[test]
    fn test_case() {
        let status = Table::new("orders").attr("status");
        let node = Node::from(status.when("paid", 1).when("open", 2).otherwise(0));
        assert_eq!(
            node.to_sql().unwrap(),
            r#"CASE "orders"."status" WHEN 'paid' THEN 1 WHEN 'open' THEN 2 ELSE 0 END"#
        );
    }

    #[test]
    fn test_over() {
        let users = Table::new("users");
        let w = window()
            .partition(users.attr("team"))
            .order(users.attr("score").desc())
            .rows(Some(frame_between(unbounded_preceding(), current_row())));
        assert_eq!(
            users.attr("score").sum().over_window(w).to_sql().unwrap(),
            r#"SUM("users"."score") OVER (PARTITION BY "users"."team" ORDER BY "users"."score" DESC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"#
        );
        assert_eq!(users.attr("id").count(false).over().to_sql().unwrap(), r#"COUNT("users"."id") OVER ()"#);
        assert_eq!(
            users.attr("id").count(false).over_named("w").to_sql().unwrap(),
            r#"COUNT("users"."id") OVER "w""#
        );
    }

    #[test]
    fn test_filter_clause() {
        let users = Table::new("users");
        let node = users.attr("id").count(false).filter(users.attr("active").eq(true));
        assert_eq!(
            node.to_sql().unwrap(),
            r#"COUNT("users"."id") FILTER (WHERE "users"."active" = TRUE)"#
        );
    }
}
