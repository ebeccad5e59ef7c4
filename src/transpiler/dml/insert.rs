//! INSERT SQL generation.

use crate::ast::{InsertStatement, Node};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::collector::Collector;
use crate::transpiler::visitor::Visitor;

impl Visitor<'_> {
    pub(crate) fn visit_insert_statement(
        &self,
        stmt: &InsertStatement,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        let Some(relation) = &stmt.relation else {
            return Err(ArelError::argument("INSERT requires a relation"));
        };
        out.push("INSERT INTO ");
        self.visit(relation, out)?;

        if !stmt.columns.is_empty() {
            let columns: Vec<String> = stmt
                .columns
                .iter()
                .map(|c| self.conn.quote_column_name(&c.name))
                .collect();
            out.push(" (");
            out.push(&columns.join(", "));
            out.push(")");
        }

        if let Some(values) = &stmt.values {
            out.push(" ");
            self.visit(values, out)?;
        } else if let Some(select) = &stmt.select {
            out.push(" ");
            self.visit(select, out)?;
        }
        self.visit_returning(&stmt.returning, out)
    }

    /// ` RETURNING a, b` where the dialect has it.
    pub(crate) fn visit_returning(&self, returning: &[Node], out: &mut dyn Collector) -> ArelResult<()> {
        if returning.is_empty() {
            return Ok(());
        }
        if !self.generator.supports_returning() {
            return Err(self.unsupported("Returning"));
        }
        self.collect_nodes_for(returning, " RETURNING ", ", ", out)
    }
}
