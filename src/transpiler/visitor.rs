//! Node-by-node SQL rendering.
//!
//! [`Visitor::visit`] matches every [`Node`] variant. Dialect differences are
//! answered by the connection's [`SqlGenerator`]; statement level rendering
//! lives in the `dml` modules.

use crate::ast::{
    Attribute, Binary, BinaryOp, BoundSqlLiteral, Case, Direction, Function, GroupingSetKind,
    InfixOp, InfixOperation, Join, JoinKind, JoinSource, Matches, Node, NullsOrder, Ordering,
    Regexp, Table, Value, ValuesTable, Window,
};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::Dialect;
use crate::transpiler::collector::Collector;
use crate::transpiler::connection::Connection;
use crate::transpiler::traits::{ConcatStyle, DistinctFromStyle, SqlGenerator};

/// Renders nodes for one connection.
pub struct Visitor<'a> {
    pub(crate) conn: &'a dyn Connection,
    pub(crate) generator: &'a dyn SqlGenerator,
}

/// A value cast to a column it cannot fit in.
fn unboundable(node: &Node) -> bool {
    match node {
        Node::Casted(casted) => casted
            .attribute
            .column_type()
            .is_some_and(|t| t.unboundable(&casted.value).is_some()),
        _ => false,
    }
}

/// Break comment delimiters so a value cannot close the comment early.
fn sanitize_comment(value: &str) -> String {
    value.replace("/*", "/ *").replace("*/", "* /")
}

impl<'a> Visitor<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self {
            conn,
            generator: conn.generator(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.conn.dialect()
    }

    pub(crate) fn unsupported(&self, node: &'static str) -> ArelError {
        ArelError::unsupported(node, self.dialect())
    }

    pub fn visit(&self, node: &Node, out: &mut dyn Collector) -> ArelResult<()> {
        match node {
            Node::True => out.push(self.generator.bool_predicate(true)),
            Node::False => out.push(self.generator.bool_predicate(false)),
            Node::Distinct => out.push("DISTINCT"),
            Node::CurrentRow => out.push("CURRENT ROW"),
            Node::SqlLiteral(lit) => out.push(lit.as_str()),
            Node::BoundSqlLiteral(lit) => self.visit_bound_sql_literal(lit, out)?,
            Node::Quoted(value) => out.push(&self.conn.quote(value)),
            Node::Casted(casted) => out.push(&self.conn.quote(&casted.value_for_database())),
            Node::BindParam(value) => out.add_bind(value, self.conn),
            Node::Attribute(attr) => self.visit_attribute(attr, out),
            Node::UnqualifiedColumn(attr) => out.push(&self.conn.quote_column_name(&attr.name)),
            Node::Identifier(name) => out.push(&self.conn.quote_column_name(name)),
            Node::Table(table) => self.visit_table(table, out),
            Node::TableAlias(alias) => {
                self.visit(&alias.relation, out)?;
                out.push(" ");
                out.push(&self.conn.quote_table_name(&alias.name));
            }
            Node::ValuesTable(values) => self.visit_values_table(values, out)?,
            Node::ValuesList(rows) => {
                out.push("VALUES ");
                self.visit_rows(rows, "", out)?;
            }
            Node::List(items) => self.inject_join(items, ", ", out)?,
            Node::Grouping(inner) => match inner.as_ref() {
                Node::Grouping(_) => self.visit(inner, out)?,
                _ => {
                    out.push("(");
                    self.visit(inner, out)?;
                    out.push(")");
                }
            },
            Node::Not(expr) => {
                out.push("NOT (");
                self.visit(expr, out)?;
                out.push(")");
            }
            Node::On(expr) => {
                out.push("ON ");
                self.visit(expr, out)?;
            }
            Node::Lateral(expr) => {
                out.push("LATERAL ");
                match expr.as_ref() {
                    Node::Select(_) => self.visit_parenthesized(expr, out)?,
                    _ => self.visit(expr, out)?,
                }
            }
            Node::Ordering(ordering) => self.visit_ordering(ordering, out)?,
            Node::DistinctOn(exprs) => {
                if !self.generator.supports_distinct_on() {
                    return Err(self.unsupported(node.kind_name()));
                }
                out.push("DISTINCT ON ( ");
                self.inject_join(exprs, ", ", out)?;
                out.push(" )");
            }
            Node::Binary(binary) => self.visit_binary(binary, out)?,
            Node::Matches(matches) => self.visit_matches(matches, out)?,
            Node::Regexp(regexp) => self.visit_regexp(regexp, node.kind_name(), out)?,
            Node::And(children) => self.inject_join(children, " AND ", out)?,
            Node::Or(left, right) => {
                self.visit(left, out)?;
                out.push(" OR ");
                self.visit(right, out)?;
            }
            Node::Infix(infix) => self.visit_infix(infix, out)?,
            Node::Unary(unary) => {
                out.push(&unary.op);
                out.push(" ");
                self.visit(&unary.expr, out)?;
            }
            Node::Function(function) => self.visit_function(function, out)?,
            Node::Extract(extract) => {
                out.push("EXTRACT(");
                out.push(&extract.field);
                out.push(" FROM ");
                self.visit(&extract.expr, out)?;
                out.push(")");
            }
            Node::Exists(exists) => {
                out.push("EXISTS (");
                self.visit(&exists.expr, out)?;
                out.push(")");
                if let Some(alias) = &exists.alias {
                    out.push(" AS ");
                    out.push(&self.conn.quote_column_name(alias));
                }
            }
            Node::Filter(filter) => {
                self.visit(&filter.expr, out)?;
                out.push(" FILTER (WHERE ");
                self.visit(&filter.predicate, out)?;
                out.push(")");
            }
            Node::Case(case) => self.visit_case(case, out)?,
            Node::Over(over) => {
                self.visit(&over.expr, out)?;
                match &over.window {
                    None => out.push(" OVER ()"),
                    Some(window) => {
                        out.push(" OVER ");
                        self.visit(window, out)?;
                    }
                }
            }
            Node::Window(window) => self.visit_window(window, out)?,
            Node::NamedWindow(named) => {
                out.push(&self.conn.quote_column_name(&named.name));
                out.push(" AS ");
                self.visit_window(&named.window, out)?;
            }
            Node::Rows(frame) => self.visit_frame("ROWS", frame.as_deref(), out)?,
            Node::RangeFrame(frame) => self.visit_frame("RANGE", frame.as_deref(), out)?,
            Node::Preceding(offset) => self.visit_bound(offset.as_deref(), " PRECEDING", out)?,
            Node::Following(offset) => self.visit_bound(offset.as_deref(), " FOLLOWING", out)?,
            Node::FrameBetween(start, end) => {
                out.push("BETWEEN ");
                self.visit(start, out)?;
                out.push(" AND ");
                self.visit(end, out)?;
            }
            Node::Join(join) => self.visit_join(join, out)?,
            Node::JoinSource(source) => self.visit_join_source(source, out)?,
            Node::Select(stmt) => self.visit_select_statement(stmt, out)?,
            Node::Insert(stmt) => self.visit_insert_statement(stmt, out)?,
            Node::Update(stmt) => self.visit_update_statement(stmt, out)?,
            Node::Delete(stmt) => self.visit_delete_statement(stmt, out)?,
            Node::SetOperation(op) => self.visit_set_operation(op, out)?,
            Node::With(with) => self.visit_with(with, out)?,
            Node::Cte(cte) => self.visit_cte(&cte.name, cte.materialized, &cte.relation, out)?,
            Node::GroupingSet(set) => {
                if !self.generator.supports_grouping_sets() {
                    return Err(self.unsupported(node.kind_name()));
                }
                out.push(match set.kind {
                    GroupingSetKind::Cube => "CUBE",
                    GroupingSetKind::Rollup => "ROLLUP",
                    GroupingSetKind::GroupingSets => "GROUPING SETS",
                });
                out.push("( ");
                self.inject_join(&set.elements, ", ", out)?;
                out.push(" )");
            }
            Node::GroupingElement(elements) => {
                if !self.generator.supports_grouping_sets() {
                    return Err(self.unsupported(node.kind_name()));
                }
                out.push("( ");
                self.inject_join(elements, ", ", out)?;
                out.push(" )");
            }
            Node::OptimizerHints(hints) => {
                let hints: Vec<String> = hints.iter().map(|h| sanitize_comment(h)).collect();
                out.push("/*+ ");
                out.push(&hints.join(" "));
                out.push(" */");
            }
            Node::Comment(values) => {
                let comments: Vec<String> = values
                    .iter()
                    .map(|v| format!("/* {} */", sanitize_comment(v)))
                    .collect();
                out.push(&comments.join(" "));
            }
        }
        Ok(())
    }

    /// Visit `nodes` separated by `separator`.
    pub(crate) fn inject_join<'n, I>(
        &self,
        nodes: I,
        separator: &str,
        out: &mut dyn Collector,
    ) -> ArelResult<()>
    where
        I: IntoIterator<Item = &'n Node>,
    {
        for (i, node) in nodes.into_iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            self.visit(node, out)?;
        }
        Ok(())
    }

    /// `spacer` followed by the joined nodes; nothing when empty.
    pub(crate) fn collect_nodes_for(
        &self,
        nodes: &[Node],
        spacer: &str,
        connector: &str,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        out.push(spacer);
        self.inject_join(nodes, connector, out)
    }

    /// `(node)`, unless it is already a grouping.
    pub(crate) fn visit_parenthesized(&self, node: &Node, out: &mut dyn Collector) -> ArelResult<()> {
        if let Node::Grouping(_) = node {
            return self.visit(node, out);
        }
        out.push("(");
        self.visit(node, out)?;
        out.push(")");
        Ok(())
    }

    fn visit_bound_sql_literal(&self, lit: &BoundSqlLiteral, out: &mut dyn Collector) -> ArelResult<()> {
        let mut parts = lit.sql.split('?');
        if let Some(first) = parts.next() {
            out.push(first);
        }
        for (part, bind) in parts.zip(&lit.binds) {
            match bind {
                Node::List(items) if items.is_empty() => out.push("NULL"),
                bind => self.visit(bind, out)?,
            }
            out.push(part);
        }
        Ok(())
    }

    fn visit_attribute(&self, attr: &Attribute, out: &mut dyn Collector) {
        if let Some(qualifier) = attr.qualifier() {
            out.push(&self.conn.quote_table_name(qualifier));
            out.push(".");
        }
        out.push(&self.conn.quote_column_name(&attr.name));
    }

    fn visit_table(&self, table: &Table, out: &mut dyn Collector) {
        out.push(&self.conn.quote_table_name(&table.name));
        if let Some(alias) = &table.table_alias {
            out.push(" ");
            out.push(&self.conn.quote_table_name(alias));
        }
    }

    fn visit_rows(&self, rows: &[Vec<Node>], prefix: &str, out: &mut dyn Collector) -> ArelResult<()> {
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                out.push(", ");
            }
            out.push(prefix);
            out.push("(");
            self.inject_join(row, ", ", out)?;
            out.push(")");
        }
        Ok(())
    }

    fn visit_values_table(&self, values: &ValuesTable, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("(VALUES ");
        self.visit_rows(&values.rows, self.generator.values_row_prefix(), out)?;
        out.push(") ");
        out.push(&self.conn.quote_table_name(&values.name));
        if !values.columns.is_empty() {
            let columns: Vec<String> = values
                .columns
                .iter()
                .map(|c| self.conn.quote_column_name(c))
                .collect();
            out.push(" (");
            out.push(&columns.join(", "));
            out.push(")");
        }
        Ok(())
    }

    fn visit_ordering(&self, ordering: &Ordering, out: &mut dyn Collector) -> ArelResult<()> {
        let direction = match ordering.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        match ordering.nulls {
            // Sort on the null test first where NULLS FIRST/LAST is missing
            Some(nulls) if !self.generator.native_nulls_ordering() => {
                self.visit(&ordering.expr, out)?;
                out.push(match nulls {
                    NullsOrder::First => " IS NOT NULL, ",
                    NullsOrder::Last => " IS NULL, ",
                });
                self.visit(&ordering.expr, out)?;
                out.push(direction);
            }
            nulls => {
                self.visit(&ordering.expr, out)?;
                out.push(direction);
                match nulls {
                    Some(NullsOrder::First) => out.push(" NULLS FIRST"),
                    Some(NullsOrder::Last) => out.push(" NULLS LAST"),
                    None => {}
                }
            }
        }
        Ok(())
    }

    fn visit_binary(&self, binary: &Binary, out: &mut dyn Collector) -> ArelResult<()> {
        let operator = match binary.op {
            BinaryOp::Equality => {
                if unboundable(&binary.right) {
                    out.push("1=0");
                    return Ok(());
                }
                self.visit(&binary.left, out)?;
                if binary.right.is_null_value() {
                    out.push(" IS NULL");
                    return Ok(());
                }
                out.push(" = ");
                return self.visit(&binary.right, out);
            }
            BinaryOp::NotEqual => {
                if unboundable(&binary.right) {
                    out.push("1=1");
                    return Ok(());
                }
                self.visit(&binary.left, out)?;
                if binary.right.is_null_value() {
                    out.push(" IS NOT NULL");
                    return Ok(());
                }
                out.push(" != ");
                return self.visit(&binary.right, out);
            }
            BinaryOp::In => return self.visit_in(binary, false, out),
            BinaryOp::NotIn => return self.visit_in(binary, true, out),
            BinaryOp::IsDistinctFrom => return self.visit_distinct_from(binary, true, out),
            BinaryOp::IsNotDistinctFrom => return self.visit_distinct_from(binary, false, out),
            BinaryOp::GreaterThan => " > ",
            BinaryOp::GreaterThanOrEqual => " >= ",
            BinaryOp::LessThan => " < ",
            BinaryOp::LessThanOrEqual => " <= ",
            BinaryOp::Between => " BETWEEN ",
            BinaryOp::As => " AS ",
            BinaryOp::Assignment => " = ",
        };
        self.visit(&binary.left, out)?;
        out.push(operator);
        self.visit(&binary.right, out)
    }

    fn visit_in(&self, binary: &Binary, negated: bool, out: &mut dyn Collector) -> ArelResult<()> {
        let (keyword, degenerate) = if negated {
            (" NOT IN (", "1=1")
        } else {
            (" IN (", "1=0")
        };
        match &binary.right {
            Node::List(items) => {
                let items: Vec<&Node> = items.iter().filter(|n| !unboundable(n)).collect();
                if items.is_empty() {
                    out.push(degenerate);
                    return Ok(());
                }
                self.visit(&binary.left, out)?;
                out.push(keyword);
                self.inject_join(items, ", ", out)?;
            }
            right => {
                let right = match right {
                    Node::Grouping(inner) if matches!(inner.as_ref(), Node::Select(_)) => inner.as_ref(),
                    right => right,
                };
                self.visit(&binary.left, out)?;
                out.push(keyword);
                self.visit(right, out)?;
            }
        }
        out.push(")");
        Ok(())
    }

    fn visit_distinct_from(&self, binary: &Binary, distinct: bool, out: &mut dyn Collector) -> ArelResult<()> {
        let (left, right) = (&binary.left, &binary.right);
        match self.generator.distinct_from_style() {
            DistinctFromStyle::Infix => {
                self.visit(left, out)?;
                out.push(if distinct {
                    " IS DISTINCT FROM "
                } else {
                    " IS NOT DISTINCT FROM "
                });
                self.visit(right, out)?;
            }
            DistinctFromStyle::NullSafeEquals => {
                if distinct {
                    out.push("NOT ");
                }
                self.visit(left, out)?;
                out.push(" <=> ");
                self.visit(right, out)?;
            }
            DistinctFromStyle::Is => {
                self.visit(left, out)?;
                out.push(if distinct { " IS NOT " } else { " IS " });
                self.visit(right, out)?;
            }
            DistinctFromStyle::Decode => {
                out.push("DECODE(");
                self.visit(left, out)?;
                out.push(", ");
                self.visit(right, out)?;
                out.push(if distinct { ", 0, 1) = 1" } else { ", 0, 1) = 0" });
            }
            DistinctFromStyle::CaseWhen => {
                if right.is_null_value() {
                    self.visit(left, out)?;
                    out.push(if distinct { " IS NOT NULL" } else { " IS NULL" });
                    return Ok(());
                }
                out.push("CASE WHEN ");
                self.visit(left, out)?;
                out.push(" = ");
                self.visit(right, out)?;
                out.push(" OR (");
                self.visit(left, out)?;
                out.push(" IS NULL AND ");
                self.visit(right, out)?;
                out.push(" IS NULL) THEN 0 ELSE 1 END");
                out.push(if distinct { " = 1" } else { " = 0" });
            }
        }
        Ok(())
    }

    fn visit_matches(&self, matches: &Matches, out: &mut dyn Collector) -> ArelResult<()> {
        let lower = !matches.case_sensitive && self.generator.lowers_case_insensitive_match();
        let side = |node: &Node, out: &mut dyn Collector| -> ArelResult<()> {
            if lower {
                out.push("LOWER(");
                self.visit(node, out)?;
                out.push(")");
                Ok(())
            } else {
                self.visit(node, out)
            }
        };
        side(&matches.left, out)?;
        out.push(" ");
        if matches.negated {
            out.push("NOT ");
        }
        out.push(self.generator.like_operator(matches.case_sensitive));
        out.push(" ");
        side(&matches.right, out)?;
        if let Some(escape) = &matches.escape {
            out.push(" ESCAPE ");
            out.push(&self.conn.quote(&Value::String(escape.clone())));
        }
        Ok(())
    }

    fn visit_regexp(&self, regexp: &Regexp, kind: &'static str, out: &mut dyn Collector) -> ArelResult<()> {
        let Some(operator) = self
            .generator
            .regexp_operator(regexp.case_sensitive, regexp.negated)
        else {
            return Err(self.unsupported(kind));
        };
        self.visit(&regexp.left, out)?;
        out.push(" ");
        out.push(operator);
        out.push(" ");
        self.visit(&regexp.right, out)
    }

    fn visit_infix(&self, infix: &InfixOperation, out: &mut dyn Collector) -> ArelResult<()> {
        if infix.op == InfixOp::Concat && self.generator.concat_style() == ConcatStyle::Function {
            out.push("CONCAT(");
            self.visit(&infix.left, out)?;
            out.push(", ");
            self.visit(&infix.right, out)?;
            out.push(")");
            return Ok(());
        }
        self.visit(&infix.left, out)?;
        out.push(" ");
        out.push(infix.op.as_str());
        out.push(" ");
        self.visit(&infix.right, out)
    }

    fn visit_function(&self, function: &Function, out: &mut dyn Collector) -> ArelResult<()> {
        out.push(function.kind.name());
        out.push("(");
        if function.distinct {
            out.push("DISTINCT ");
        }
        self.inject_join(&function.args, ", ", out)?;
        out.push(")");
        if let Some(alias) = &function.alias {
            out.push(" AS ");
            out.push(&self.conn.quote_column_name(alias));
        }
        Ok(())
    }

    fn visit_case(&self, case: &Case, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("CASE ");
        if let Some(expr) = &case.case {
            self.visit(expr, out)?;
            out.push(" ");
        }
        for (condition, result) in &case.conditions {
            out.push("WHEN ");
            self.visit(condition, out)?;
            out.push(" THEN ");
            self.visit(result, out)?;
            out.push(" ");
        }
        if let Some(default) = &case.default {
            out.push("ELSE ");
            self.visit(default, out)?;
            out.push(" ");
        }
        out.push("END");
        Ok(())
    }

    fn visit_window(&self, window: &Window, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("(");
        self.collect_nodes_for(&window.partitions, "PARTITION BY ", ", ", out)?;
        if !window.orders.is_empty() {
            if !window.partitions.is_empty() {
                out.push(" ");
            }
            out.push("ORDER BY ");
            self.inject_join(&window.orders, ", ", out)?;
        }
        if let Some(framing) = &window.framing {
            if !window.partitions.is_empty() || !window.orders.is_empty() {
                out.push(" ");
            }
            self.visit(framing, out)?;
        }
        out.push(")");
        Ok(())
    }

    fn visit_frame(&self, keyword: &str, frame: Option<&Node>, out: &mut dyn Collector) -> ArelResult<()> {
        out.push(keyword);
        if let Some(frame) = frame {
            out.push(" ");
            self.visit(frame, out)?;
        }
        Ok(())
    }

    fn visit_bound(&self, offset: Option<&Node>, suffix: &str, out: &mut dyn Collector) -> ArelResult<()> {
        match offset {
            Some(offset) => self.visit(offset, out)?,
            None => out.push("UNBOUNDED"),
        }
        out.push(suffix);
        Ok(())
    }

    fn visit_join(&self, join: &Join, out: &mut dyn Collector) -> ArelResult<()> {
        let keyword = match join.kind {
            JoinKind::Inner => Some("INNER JOIN "),
            JoinKind::LeftOuter => Some("LEFT OUTER JOIN "),
            JoinKind::RightOuter => Some("RIGHT OUTER JOIN "),
            JoinKind::FullOuter => Some("FULL OUTER JOIN "),
            JoinKind::String | JoinKind::Leading => None,
        };
        if let Some(keyword) = keyword {
            out.push(keyword);
        }
        self.visit(&join.relation, out)?;
        if let Some(constraint) = &join.constraint {
            out.push(" ");
            self.visit(constraint, out)?;
        }
        Ok(())
    }

    pub(crate) fn visit_join_source(&self, source: &JoinSource, out: &mut dyn Collector) -> ArelResult<()> {
        if let Some(left) = &source.left {
            self.visit(left, out)?;
        }
        for (i, join) in source.right.iter().enumerate() {
            if i > 0 || source.left.is_some() {
                out.push(" ");
            }
            self.visit_join(join, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;
    use crate::ast::builders::{Predications, sql_with_binds};
    use crate::transpiler::{BindCollector, DialectConnection, SqlString};

    fn render(node: &Node, dialect: Dialect) -> ArelResult<String> {
        let conn = DialectConnection::new(dialect);
        let mut out = SqlString::new();
        Visitor::new(&conn).visit(node, &mut out)?;
        Ok(out.into_string())
    }

    #[test]
    fn test_nested_grouping_is_not_doubled() {
        let node = Node::grouping(Node::grouping(Node::True));
        assert_eq!(render(&node, Dialect::Generic).unwrap(), "(TRUE)");
    }

    #[test]
    fn test_bound_sql_literal_binds_in_order() {
        let node = sql_with_binds("a = ? AND b IN (?)", [Node::BindParam(Value::Int(1)), Node::List(vec![])])
            .unwrap();
        let conn = DialectConnection::new(Dialect::Postgres);
        let mut out = BindCollector::new();
        Visitor::new(&conn).visit(&node, &mut out).unwrap();
        let (sql, binds) = out.into_parts();
        assert_eq!(sql, "a = $1 AND b IN (NULL)");
        assert_eq!(binds, vec![Value::Int(1)]);
    }

    #[test]
    fn test_comment_delimiters_are_broken() {
        let node = Node::Comment(vec!["evil */ DROP TABLE x; /*".to_string()]);
        assert_eq!(
            render(&node, Dialect::Generic).unwrap(),
            "/* evil * / DROP TABLE x; / * */"
        );
    }

    #[test]
    fn test_regexp_unsupported_in_generic() {
        let node = Table::new("users").attr("name").matches_regexp("^a", true);
        let err = render(&node, Dialect::Generic).unwrap_err();
        assert!(matches!(err, ArelError::UnsupportedNode { node: "Regexp", .. }));
    }
}
