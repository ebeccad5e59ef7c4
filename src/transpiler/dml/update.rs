//! UPDATE SQL generation.
//!
//! UPDATE and DELETE share one rewrite: clauses a dialect cannot express on a
//! mutation (ORDER BY, LIMIT, OFFSET, GROUP BY, joins) are pushed into
//! `WHERE key IN (SELECT key ...)`.

use tracing::trace;

use crate::ast::statements::has_join_sources;
use crate::ast::{
    BinaryOp, JoinSource, MutationClauses, Node, SelectStatement, TableAlias, UpdateStatement,
};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::collector::Collector;
use crate::transpiler::visitor::Visitor;

/// Alias of the derived table wrapping the MySQL key subselect.
const TEMP_TABLE: &str = "__arel_temp";

impl Visitor<'_> {
    pub(crate) fn visit_update_statement(
        &self,
        stmt: &UpdateStatement,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        let (relation, clauses) = self.prepare_mutation(stmt.relation.as_ref(), &stmt.clauses)?;
        let Some(relation) = relation else {
            return Err(ArelError::argument("UPDATE requires a relation"));
        };
        out.push("UPDATE ");
        self.visit(&relation, out)?;
        self.collect_nodes_for(&stmt.values, " SET ", ", ", out)?;
        self.visit_mutation_clauses(&clauses, out)?;
        self.visit_returning(&stmt.returning, out)
    }

    /// WHERE, ORDER BY and LIMIT left inline after preparation.
    pub(crate) fn visit_mutation_clauses(
        &self,
        clauses: &MutationClauses,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        self.collect_nodes_for(&clauses.wheres, " WHERE ", " AND ", out)?;
        self.collect_nodes_for(&clauses.orders, " ORDER BY ", ", ", out)?;
        if let Some(limit) = &clauses.limit {
            out.push(" LIMIT ");
            self.visit(limit, out)?;
        }
        Ok(())
    }

    fn needs_subselect(&self, relation: Option<&Node>, clauses: &MutationClauses) -> bool {
        let joins = has_join_sources(relation);
        if self.generator.inline_mutation_clauses() {
            // GROUP BY has no inline form on a mutation, with or without HAVING
            clauses.offset.is_some()
                || !clauses.groups.is_empty()
                || (joins && clauses.has_limit_or_offset_or_orders())
        } else {
            clauses.has_limit_or_offset_or_orders() || !clauses.groups.is_empty() || joins
        }
    }

    /// Relation and clauses to render, rewritten into a key subselect when needed.
    pub(crate) fn prepare_mutation(
        &self,
        relation: Option<&Node>,
        clauses: &MutationClauses,
    ) -> ArelResult<(Option<Node>, MutationClauses)> {
        if !clauses.groups.is_empty() && clauses.key.is_none() {
            return Err(ArelError::argument(
                "GROUP BY on UPDATE/DELETE needs a key to build the subselect",
            ));
        }
        let key = match &clauses.key {
            Some(key) if self.needs_subselect(relation, clauses) => key,
            _ => return Ok((relation.cloned(), clauses.clone())),
        };
        trace!(dialect = ?self.dialect(), "rewriting mutation into a key subselect");

        let subselect = self.build_subselect(key, relation, clauses);
        let relation = match relation {
            Some(Node::JoinSource(source)) if !source.right.is_empty() => source.left.clone(),
            other => other.cloned(),
        };
        let clauses = MutationClauses {
            wheres: vec![Node::binary(BinaryOp::In, key.clone(), Node::from(subselect))],
            key: Some(key.clone()),
            ..MutationClauses::default()
        };
        Ok((relation, clauses))
    }

    fn build_subselect(&self, key: &Node, relation: Option<&Node>, clauses: &MutationClauses) -> SelectStatement {
        let source = match relation {
            Some(Node::JoinSource(source)) => (**source).clone(),
            other => JoinSource::new(other.cloned()),
        };
        let mut stmt = SelectStatement::new();
        stmt.orders = clauses.orders.clone();
        stmt.limit = clauses.limit.clone();
        stmt.offset = clauses.offset.clone();
        if let Some(core) = stmt.cores.first_mut() {
            core.source = source;
            core.projections = vec![key.clone()];
            core.wheres = clauses.wheres.clone();
            core.groups = clauses.groups.clone();
            core.havings = clauses.havings.clone();
        }
        if !self.generator.inline_mutation_clauses() {
            return stmt;
        }

        // MySQL refuses to select from the table being modified unless the
        // subselect is materialized through a derived table
        if !clauses.has_limit_or_offset_or_orders() {
            if let Some(core) = stmt.cores.first_mut() {
                core.set_quantifier = Some(Node::Distinct);
            }
        }
        let derived = TableAlias::new(Node::grouping(Node::from(stmt)), TEMP_TABLE);
        let column = match key {
            Node::Attribute(attr) => Node::UnqualifiedColumn(attr.clone()),
            other => other.clone(),
        };
        let mut outer = SelectStatement::new();
        if let Some(core) = outer.cores.first_mut() {
            core.source = JoinSource::new(Some(Node::TableAlias(derived)));
            core.projections = vec![column];
        }
        outer
    }
}
