//! DELETE SQL generation.

use crate::ast::{DeleteStatement, Node};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::collector::Collector;
use crate::transpiler::visitor::Visitor;

impl Visitor<'_> {
    pub(crate) fn visit_delete_statement(
        &self,
        stmt: &DeleteStatement,
        out: &mut dyn Collector,
    ) -> ArelResult<()> {
        let (relation, clauses) = self.prepare_mutation(stmt.relation.as_ref(), &stmt.clauses)?;
        let Some(relation) = relation else {
            return Err(ArelError::argument("DELETE requires a relation"));
        };

        match &relation {
            // DELETE target FROM target INNER JOIN ...
            Node::JoinSource(source) if !source.right.is_empty() => {
                out.push("DELETE ");
                if let Some(left) = &source.left {
                    self.visit(left, out)?;
                }
                out.push(" FROM ");
            }
            _ => out.push("DELETE FROM "),
        }
        self.visit(&relation, out)?;
        self.visit_mutation_clauses(&clauses, out)?;
        self.visit_returning(&stmt.returning, out)
    }
}
