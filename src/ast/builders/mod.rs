//! Builder functions and extension traits for AST nodes.
//!
//! - `predications` - comparisons, membership, ranges, pattern matching
//! - `math` - arithmetic and bitwise operators
//! - `ordering` - ASC/DESC and NULLS placement
//! - `expressions` - aggregates, aliases, windows, CASE
//!
//! # Example
//! ```ignore
//! use arel::prelude::*;
//!
//! let users = Table::new("users");
//! let sql = users
//!     .from()
//!     .project(users.attr("id"))
//!     .filter(users.attr("age").between(18..=65))
//!     .order(users.attr("name").asc())
//!     .take(10)
//!     .to_sql()?;
//! ```

pub mod expressions;
pub mod math;
pub mod ordering;
pub mod predications;

pub use expressions::{
    AliasPredication, Expressions, WindowPredications, case, cube, current_row, following,
    frame_between, grouping_element, grouping_sets, preceding, rollup, unbounded_following,
    unbounded_preceding, window,
};
pub use ordering::OrderPredications;
pub use predications::{InOperand, Predications};

use crate::ast::{Attribute, BoundSqlLiteral, Casted, Function, FunctionKind, Node, Operand, SqlLiteral, Value};
use crate::error::{ArelError, ArelResult};

/// Raw SQL. Everything passed here is trusted and rendered verbatim.
pub fn sql(raw: impl Into<String>) -> SqlLiteral {
    SqlLiteral::new(raw)
}

/// `*`
pub fn star() -> SqlLiteral {
    SqlLiteral::new("*")
}

/// Raw SQL whose `?` markers are filled from `binds` in order.
///
/// Values become binds, nodes are rendered in place.
pub fn sql_with_binds<I>(raw: impl Into<String>, binds: I) -> ArelResult<Node>
where
    I: IntoIterator,
    I::Item: Into<Operand>,
{
    let sql = raw.into();
    let binds: Vec<Node> = binds
        .into_iter()
        .map(|b| match b.into() {
            Operand::Value(v) => Node::BindParam(v),
            Operand::Node(n) => n,
        })
        .collect();
    let markers = sql.matches('?').count();
    if markers != binds.len() {
        return Err(ArelError::argument(format!(
            "wrong number of bind variables ({} for {})",
            binds.len(),
            markers
        )));
    }
    Ok(Node::BoundSqlLiteral(Box::new(BoundSqlLiteral { sql, binds })))
}

/// Wrap a value for quoting. Nodes pass through unchanged.
///
/// With an attribute the value is cast through the attribute's column type.
pub fn build_quoted(other: impl Into<Operand>, attribute: Option<&Attribute>) -> Node {
    match other.into() {
        Operand::Node(node) => node,
        Operand::Value(value) => match attribute {
            Some(attribute) => Node::Casted(Box::new(Casted {
                value,
                attribute: attribute.clone(),
            })),
            None => Node::Quoted(value),
        },
    }
}

/// A value sent out of line.
pub fn bind(value: impl Into<Value>) -> Node {
    Node::BindParam(value.into())
}

/// `NAME(arg, ...)`
pub fn named_function<I>(name: impl Into<String>, args: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::Function(Box::new(Function {
        kind: FunctionKind::Named(name.into()),
        args: args.into_iter().map(Into::into).collect(),
        distinct: false,
        alias: None,
    }))
}

/// `COUNT(*)`
pub fn count_star() -> Node {
    Node::Function(Box::new(Function {
        kind: FunctionKind::Count,
        args: vec![Node::SqlLiteral(star())],
        distinct: false,
        alias: None,
    }))
}

/// `(a, b)`
pub fn grouping_list<I>(items: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::grouping(Node::List(items.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;
    use crate::transpiler::ToSql;

    #[test]
    fn test_build_quoted_is_idempotent() {
        let once = build_quoted("it's", None);
        let twice = build_quoted(once.clone(), None);
        assert_eq!(once, twice);
        assert_eq!(once.to_sql().unwrap(), twice.to_sql().unwrap());
    }

    #[test]
    fn test_build_quoted_with_attribute_casts() {
        let users = Table::new("users");
        let node = build_quoted(1, Some(&users.attr("id")));
        assert!(matches!(node, Node::Casted(_)));
        assert_eq!(build_quoted(None::<i32>, None).to_sql().unwrap(), "NULL");
    }

    #[test]
    fn test_function_helpers_render() {
        let users = Table::new("users");
        assert_eq!(
            users.project(count_star()).to_sql().unwrap(),
            r#"SELECT COUNT(*) FROM "users""#
        );
        assert_eq!(
            users.attr("name").lower().eq("nick").to_sql().unwrap(),
            r#"LOWER("users"."name") = 'nick'"#
        );
        assert_eq!(
            grouping_list([users.attr("a"), users.attr("b")]).to_sql().unwrap(),
            r#"("users"."a", "users"."b")"#
        );
    }

    #[test]
    fn test_sql_with_binds_counts_markers() {
        assert!(sql_with_binds("a = ? AND b = ?", [1, 2]).is_ok());
        let err = sql_with_binds("a = ?", [1, 2]).unwrap_err();
        assert!(matches!(err, ArelError::Argument(_)));
    }
}
