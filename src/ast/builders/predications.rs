//! Comparison predicates over any expression.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use super::build_quoted;
use crate::ast::{
    Attribute, BinaryOp, Case, InfixOp, InfixOperation, Matches, Node, Operand, Regexp,
    SelectStatement, Sign, SqlLiteral, SqlRange, Value,
};

/// Right-hand side of `IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum InOperand {
    Subquery(SelectStatement),
    List(Vec<Operand>),
    /// Deprecated alias for `between`
    Range(SqlRange),
    Single(Operand),
}

impl InOperand {
    pub fn empty() -> Self {
        InOperand::List(Vec::new())
    }
}

impl<T: Into<Operand>> From<Vec<T>> for InOperand {
    fn from(items: Vec<T>) -> Self {
        InOperand::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for InOperand {
    fn from(items: [T; N]) -> Self {
        InOperand::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Operand> + Clone> From<&[T]> for InOperand {
    fn from(items: &[T]) -> Self {
        InOperand::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl From<SelectStatement> for InOperand {
    fn from(stmt: SelectStatement) -> Self {
        InOperand::Subquery(stmt)
    }
}

impl From<SqlRange> for InOperand {
    fn from(range: SqlRange) -> Self {
        InOperand::Range(range)
    }
}

macro_rules! in_operand_from_range {
    ($($r:ident),*) => {
        $(
            impl<T: Into<Value>> From<$r<T>> for InOperand {
                fn from(range: $r<T>) -> Self {
                    InOperand::Range(range.into())
                }
            }
        )*
    };
}

in_operand_from_range!(Range, RangeInclusive, RangeFrom, RangeTo, RangeToInclusive);

impl From<RangeFull> for InOperand {
    fn from(range: RangeFull) -> Self {
        InOperand::Range(range.into())
    }
}

macro_rules! in_operand_single {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for InOperand {
                fn from(v: $t) -> Self {
                    InOperand::Single(v.into())
                }
            }
        )*
    };
}

in_operand_single!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    &String,
    &str,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    Node,
    Attribute,
    SqlLiteral,
);

fn grouping_any(nodes: Vec<Node>) -> Node {
    let mut nodes = nodes.into_iter();
    match nodes.next() {
        None => Node::grouping(Node::False),
        Some(first) => Node::grouping(
            nodes.fold(first, |memo, node| Node::Or(Box::new(memo), Box::new(node))),
        ),
    }
}

fn grouping_all(nodes: Vec<Node>) -> Node {
    if nodes.is_empty() {
        Node::grouping(Node::True)
    } else {
        Node::grouping(Node::And(nodes))
    }
}

fn unboundable(attribute: Option<&Attribute>, value: &Value) -> Option<Sign> {
    attribute?.column_type()?.unboundable(value)
}

fn open_ended(attribute: Option<&Attribute>, value: &Value) -> bool {
    value.is_null() || value.infinity().is_some() || unboundable(attribute, value).is_some()
}

pub(crate) fn equality<P: Predications + ?Sized>(p: &P, other: impl Into<Operand>) -> Node {
    Node::binary(BinaryOp::Equality, p.to_expr(), p.quoted_node(other))
}

/// Predicate vocabulary for anything usable as the left side of a comparison.
///
/// `eq` itself is an inherent method on [`Attribute`], [`Node`] and
/// [`SqlLiteral`] so it does not shadow `PartialEq::eq`.
pub trait Predications {
    /// Left-hand side of the predicates built from `self`.
    fn to_expr(&self) -> Node;

    /// Attribute whose column type casts right-hand values.
    fn quoting_attribute(&self) -> Option<&Attribute> {
        None
    }

    fn quoted_node(&self, other: impl Into<Operand>) -> Node {
        build_quoted(other, self.quoting_attribute())
    }

    fn not_eq(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::NotEqual, self.to_expr(), self.quoted_node(other))
    }

    fn not_eq_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| self.not_eq(o)).collect())
    }

    fn not_eq_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| self.not_eq(o)).collect())
    }

    fn eq_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| equality(self, o)).collect())
    }

    fn eq_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| equality(self, o)).collect())
    }

    fn is_not_distinct_from(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::IsNotDistinctFrom, self.to_expr(), self.quoted_node(other))
    }

    fn is_distinct_from(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::IsDistinctFrom, self.to_expr(), self.quoted_node(other))
    }

    fn gt(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::GreaterThan, self.to_expr(), self.quoted_node(other))
    }

    fn gt_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| self.gt(o)).collect())
    }

    fn gt_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| self.gt(o)).collect())
    }

    fn gteq(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::GreaterThanOrEqual, self.to_expr(), self.quoted_node(other))
    }

    fn gteq_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| self.gteq(o)).collect())
    }

    fn gteq_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| self.gteq(o)).collect())
    }

    fn lt(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::LessThan, self.to_expr(), self.quoted_node(other))
    }

    fn lt_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| self.lt(o)).collect())
    }

    fn lt_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| self.lt(o)).collect())
    }

    fn lteq(&self, other: impl Into<Operand>) -> Node {
        Node::binary(BinaryOp::LessThanOrEqual, self.to_expr(), self.quoted_node(other))
    }

    fn lteq_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(others.into_iter().map(|o| self.lteq(o)).collect())
    }

    fn lteq_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(others.into_iter().map(|o| self.lteq(o)).collect())
    }

    /// Range membership. Open and unboundable ends collapse to one-sided
    /// comparisons, and an exclusive end becomes `>= begin AND < end`.
    fn between(&self, range: impl Into<SqlRange>) -> Node {
        let range = range.into();
        let attribute = self.quoting_attribute();

        if unboundable(attribute, &range.begin) == Some(Sign::Positive)
            || unboundable(attribute, &range.end) == Some(Sign::Negative)
        {
            return self.is_in(InOperand::empty());
        }

        if open_ended(attribute, &range.begin) {
            if open_ended(attribute, &range.end) {
                if range.begin.infinity() == Some(Sign::Positive)
                    || range.end.infinity() == Some(Sign::Negative)
                {
                    self.is_in(InOperand::empty())
                } else {
                    self.not_in(InOperand::empty())
                }
            } else if range.exclude_end {
                self.lt(range.end)
            } else {
                self.lteq(range.end)
            }
        } else if open_ended(attribute, &range.end) {
            self.gteq(range.begin)
        } else if range.exclude_end {
            self.gteq(range.begin).and(self.lt(range.end))
        } else if range.begin == range.end {
            equality(self, range.begin)
        } else {
            let left = self.quoted_node(range.begin);
            let right = self.quoted_node(range.end);
            Node::binary(BinaryOp::Between, self.to_expr(), left.and(right))
        }
    }

    fn not_between(&self, range: impl Into<SqlRange>) -> Node {
        let range = range.into();
        let attribute = self.quoting_attribute();

        if unboundable(attribute, &range.begin) == Some(Sign::Positive)
            || unboundable(attribute, &range.end) == Some(Sign::Negative)
        {
            return self.not_in(InOperand::empty());
        }

        if open_ended(attribute, &range.begin) {
            if open_ended(attribute, &range.end) {
                if range.begin.infinity() == Some(Sign::Positive)
                    || range.end.infinity() == Some(Sign::Negative)
                {
                    self.not_in(InOperand::empty())
                } else {
                    self.is_in(InOperand::empty())
                }
            } else if range.exclude_end {
                self.gteq(range.end)
            } else {
                self.gt(range.end)
            }
        } else if open_ended(attribute, &range.end) {
            self.lt(range.begin)
        } else {
            let left = self.lt(range.begin);
            let right = if range.exclude_end {
                self.gteq(range.end)
            } else {
                self.gt(range.end)
            };
            left.or(right)
        }
    }

    fn is_in(&self, other: impl Into<InOperand>) -> Node {
        match other.into() {
            InOperand::Subquery(stmt) => {
                Node::binary(BinaryOp::In, self.to_expr(), Node::Select(Box::new(stmt)))
            }
            InOperand::List(items) => Node::binary(
                BinaryOp::In,
                self.to_expr(),
                Node::List(items.into_iter().map(|v| self.quoted_node(v)).collect()),
            ),
            InOperand::Range(range) => {
                tracing::warn!("passing a range to `is_in` is deprecated, use `between`");
                self.between(range)
            }
            InOperand::Single(value) => {
                Node::binary(BinaryOp::In, self.to_expr(), self.quoted_node(value))
            }
        }
    }

    fn is_in_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<InOperand>,
    {
        grouping_any(others.into_iter().map(|o| self.is_in(o)).collect())
    }

    fn is_in_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<InOperand>,
    {
        grouping_all(others.into_iter().map(|o| self.is_in(o)).collect())
    }

    fn not_in(&self, other: impl Into<InOperand>) -> Node {
        match other.into() {
            InOperand::Subquery(stmt) => {
                Node::binary(BinaryOp::NotIn, self.to_expr(), Node::Select(Box::new(stmt)))
            }
            InOperand::List(items) => Node::binary(
                BinaryOp::NotIn,
                self.to_expr(),
                Node::List(items.into_iter().map(|v| self.quoted_node(v)).collect()),
            ),
            InOperand::Range(range) => {
                tracing::warn!("passing a range to `not_in` is deprecated, use `not_between`");
                self.not_between(range)
            }
            InOperand::Single(value) => {
                Node::binary(BinaryOp::NotIn, self.to_expr(), self.quoted_node(value))
            }
        }
    }

    fn not_in_any<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<InOperand>,
    {
        grouping_any(others.into_iter().map(|o| self.not_in(o)).collect())
    }

    fn not_in_all<I>(&self, others: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<InOperand>,
    {
        grouping_all(others.into_iter().map(|o| self.not_in(o)).collect())
    }

    /// Case-insensitive `LIKE`.
    fn matches(&self, pattern: impl Into<Operand>) -> Node {
        self.matches_with(pattern, None, false)
    }

    fn matches_with(&self, pattern: impl Into<Operand>, escape: Option<&str>, case_sensitive: bool) -> Node {
        Node::Matches(Box::new(Matches {
            left: self.to_expr(),
            right: self.quoted_node(pattern),
            escape: escape.map(str::to_string),
            case_sensitive,
            negated: false,
        }))
    }

    fn matches_any<I>(&self, patterns: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(patterns.into_iter().map(|p| self.matches(p)).collect())
    }

    fn matches_all<I>(&self, patterns: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(patterns.into_iter().map(|p| self.matches(p)).collect())
    }

    fn does_not_match(&self, pattern: impl Into<Operand>) -> Node {
        self.does_not_match_with(pattern, None, false)
    }

    fn does_not_match_with(
        &self,
        pattern: impl Into<Operand>,
        escape: Option<&str>,
        case_sensitive: bool,
    ) -> Node {
        Node::Matches(Box::new(Matches {
            left: self.to_expr(),
            right: self.quoted_node(pattern),
            escape: escape.map(str::to_string),
            case_sensitive,
            negated: true,
        }))
    }

    fn does_not_match_any<I>(&self, patterns: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_any(patterns.into_iter().map(|p| self.does_not_match(p)).collect())
    }

    fn does_not_match_all<I>(&self, patterns: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        grouping_all(patterns.into_iter().map(|p| self.does_not_match(p)).collect())
    }

    fn matches_regexp(&self, pattern: impl Into<Operand>, case_sensitive: bool) -> Node {
        Node::Regexp(Box::new(Regexp {
            left: self.to_expr(),
            right: self.quoted_node(pattern),
            case_sensitive,
            negated: false,
        }))
    }

    fn does_not_match_regexp(&self, pattern: impl Into<Operand>, case_sensitive: bool) -> Node {
        Node::Regexp(Box::new(Regexp {
            left: self.to_expr(),
            right: self.quoted_node(pattern),
            case_sensitive,
            negated: true,
        }))
    }

    /// Simple `CASE self WHEN .. THEN ..`.
    fn when(&self, condition: impl Into<Operand>, then: impl Into<Operand>) -> Case {
        Case {
            case: Some(self.to_expr()),
            conditions: Vec::new(),
            default: None,
        }
        .when(condition, then)
    }

    /// String concatenation.
    fn concat(&self, other: impl Into<Operand>) -> Node {
        infix(InfixOp::Concat, self.to_expr(), self.quoted_node(other))
    }

    /// `@>`
    fn contains(&self, other: impl Into<Operand>) -> Node {
        infix(InfixOp::Contains, self.to_expr(), self.quoted_node(other))
    }

    /// `&&`
    fn overlaps(&self, other: impl Into<Operand>) -> Node {
        infix(InfixOp::Overlaps, self.to_expr(), self.quoted_node(other))
    }
}

pub(crate) fn infix(op: InfixOp, left: Node, right: Node) -> Node {
    Node::Infix(Box::new(InfixOperation { op, left, right }))
}

impl Predications for Attribute {
    fn to_expr(&self) -> Node {
        Node::Attribute(self.clone())
    }

    fn quoting_attribute(&self) -> Option<&Attribute> {
        Some(self)
    }
}

impl Predications for Node {
    fn to_expr(&self) -> Node {
        self.clone()
    }

    fn quoting_attribute(&self) -> Option<&Attribute> {
        match self {
            Node::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }
}

impl Predications for SqlLiteral {
    fn to_expr(&self) -> Node {
        Node::SqlLiteral(self.clone())
    }
}

impl Attribute {
    /// `self = other`, `self IS NULL` for a null operand.
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: impl Into<Operand>) -> Node {
        equality(self, other)
    }
}

impl Node {
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: impl Into<Operand>) -> Node {
        equality(self, other)
    }
}

impl SqlLiteral {
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: impl Into<Operand>) -> Node {
        equality(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;

    #[test]
    fn test_eq_casts_against_attribute() {
        let users = Table::new("users");
        let node = users.attr("id").eq(1);
        let Node::Binary(binary) = node else {
            panic!("expected a binary node");
        };
        assert_eq!(binary.op, BinaryOp::Equality);
        assert!(matches!(binary.right, Node::Casted(_)));
    }

    #[test]
    fn test_eq_any_groups_disjunction() {
        let users = Table::new("users");
        let id = users.attr("id");
        let node = id.eq_any([1, 2]);
        let expected = Node::grouping(Node::Or(Box::new(id.eq(1)), Box::new(id.eq(2))));
        assert_eq!(node, expected);
    }

    #[test]
    fn test_empty_any_and_all() {
        let id = Table::new("users").attr("id");
        assert_eq!(id.eq_any(Vec::<i32>::new()), Node::grouping(Node::False));
        assert_eq!(id.eq_all(Vec::<i32>::new()), Node::grouping(Node::True));
    }

    #[test]
    fn test_in_range_delegates_to_between() {
        let id = Table::new("users").attr("id");
        assert_eq!(id.is_in(1..=3), id.between(1..=3));
        assert_eq!(id.not_in(1..3), id.not_between(1..3));
    }

    #[test]
    fn test_between_equal_bounds_is_equality() {
        let id = Table::new("users").attr("id");
        assert_eq!(id.between(3..=3), id.eq(3));
    }

    #[test]
    fn test_node_predications_use_inner_attribute() {
        let id = Table::new("users").attr("id");
        let node = Node::Attribute(id.clone());
        assert_eq!(node.eq(5), id.eq(5));
    }
}
