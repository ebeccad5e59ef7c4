//! SELECT SQL generation, compound queries and CTEs.

use crate::ast::{BinaryOp, Node, SelectCore, SelectStatement, SetOpKind, SetOperation, With};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::collector::Collector;
use crate::transpiler::traits::Paging;
use crate::transpiler::visitor::Visitor;

impl Visitor<'_> {
    pub(crate) fn visit_select_statement(
        &self,
        stmt: &SelectStatement,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        let [core] = stmt.cores.as_slice() else {
            return Err(ArelError::argument(format!(
                "a select statement renders exactly one core, found {}",
                stmt.cores.len()
            )));
        };
        if self.generator.paging() == Paging::OffsetFetch && stmt.limit.is_some() && stmt.lock.is_some() {
            // FETCH FIRST cannot be combined with SELECT ... FOR UPDATE
            return Err(ArelError::argument(
                "combination of limit and lock is not supported",
            ));
        }

        if let Some(with) = &stmt.with {
            self.visit(with, out)?;
            out.push(" ");
        }
        self.visit_select_core(core, out)?;
        self.collect_nodes_for(&stmt.orders, " ORDER BY ", ", ", out)?;
        self.visit_paging(stmt.limit.as_ref(), stmt.offset.as_ref(), out)?;
        if let Some(lock) = &stmt.lock {
            if self.generator.supports_lock() {
                out.push(" ");
                self.visit(lock, out)?;
            }
        }
        Ok(())
    }

    pub(crate) fn visit_select_core(&self, core: &SelectCore, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("SELECT");
        if let Some(hints) = &core.optimizer_hints {
            out.push(" ");
            self.visit(hints, out)?;
        }
        if let Some(quantifier) = &core.set_quantifier {
            out.push(" ");
            self.visit(quantifier, out)?;
        }
        self.collect_nodes_for(&core.projections, " ", ", ", out)?;
        if !core.source.is_empty() {
            out.push(" FROM ");
            self.visit_join_source(&core.source, out)?;
        }
        self.collect_nodes_for(&core.wheres, " WHERE ", " AND ", out)?;
        self.collect_nodes_for(&core.groups, " GROUP BY ", ", ", out)?;
        self.collect_nodes_for(&core.havings, " HAVING ", " AND ", out)?;
        self.collect_nodes_for(&core.windows, " WINDOW ", ", ", out)?;
        if let Some(comment) = &core.comment {
            out.push(" ");
            self.visit(comment, out)?;
        }
        Ok(())
    }

    /// LIMIT/OFFSET in the dialect's layout.
    pub(crate) fn visit_paging(
        &self,
        limit: Option<&Node>,
        offset: Option<&Node>,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        match self.generator.paging() {
            Paging::LimitOffset => {
                match (limit, offset, self.generator.offset_only_limit()) {
                    (Some(limit), _, _) => {
                        out.push(" LIMIT ");
                        self.visit(limit, out)?;
                    }
                    (None, Some(_), Some(max)) => {
                        out.push(" LIMIT ");
                        out.push(max);
                    }
                    _ => {}
                }
                if let Some(offset) = offset {
                    out.push(" OFFSET ");
                    self.visit(offset, out)?;
                }
            }
            Paging::OffsetFetch => {
                if let Some(offset) = offset {
                    out.push(" OFFSET ");
                    self.visit(offset, out)?;
                    out.push(" ROWS");
                }
                if let Some(limit) = limit {
                    out.push(" FETCH FIRST ");
                    self.visit(limit, out)?;
                    out.push(" ROWS ONLY");
                }
            }
        }
        Ok(())
    }

    pub(crate) fn visit_set_operation(&self, op: &SetOperation, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("( ");
        if op.kind.flattens() {
            self.visit_union_side(&op.left, op.kind, out)?;
            out.push(" ");
            out.push(op.kind.keyword());
            out.push(" ");
            self.visit_union_side(&op.right, op.kind, out)?;
        } else {
            self.visit(&op.left, out)?;
            out.push(" ");
            out.push(op.kind.keyword());
            out.push(" ");
            self.visit(&op.right, out)?;
        }
        out.push(" )");
        Ok(())
    }

    /// One side of a UNION chain: same-kind unions are inlined without parentheses.
    fn visit_union_side(&self, node: &Node, kind: SetOpKind, out: &mut dyn Collector) -> ArelResult<()> {
        match node {
            Node::SetOperation(inner) if inner.kind == kind => {
                self.visit_union_side(&inner.left, kind, out)?;
                out.push(" ");
                out.push(kind.keyword());
                out.push(" ");
                self.visit_union_side(&inner.right, kind, out)
            }
            Node::Select(stmt) if self.generator.wraps_compound_selects() && stmt.requires_parentheses() => {
                out.push("(");
                self.visit(node, out)?;
                out.push(")");
                Ok(())
            }
            other => self.visit(other, out),
        }
    }

    pub(crate) fn visit_with(&self, with: &With, out: &mut dyn Collector) -> ArelResult<()> {
        out.push("WITH ");
        if with.recursive {
            out.push("RECURSIVE ");
        }
        for (i, child) in with.children.iter().enumerate() {
            if i > 0 {
                out.push(", ");
            }
            match child {
                Node::Cte(cte) => self.visit_cte(&cte.name, cte.materialized, &cte.relation, out)?,
                Node::TableAlias(alias) => self.visit_cte(&alias.name, None, &alias.relation, out)?,
                Node::Binary(binary) if binary.op == BinaryOp::As => match &binary.left {
                    Node::Table(table) => self.visit_cte(&table.name, None, &binary.right, out)?,
                    _ => self.visit(child, out)?,
                },
                other => self.visit(other, out)?,
            }
        }
        Ok(())
    }

    /// `"name" AS [NOT ]MATERIALIZED (relation)`
    pub(crate) fn visit_cte(
        &self,
        name: &str,
        materialized: Option<bool>,
        relation: &Node,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        out.push(&self.conn.quote_table_name(name));
        out.push(" AS ");
        match materialized {
            Some(true) => out.push("MATERIALIZED "),
            Some(false) => out.push("NOT MATERIALIZED "),
            None => {}
        }
        self.visit_parenthesized(relation, out)
    }
}
