//! DELETE builder.

use crate::ast::{DeleteStatement, MutationClauses, Node};
use crate::error::ArelResult;
use crate::manager::StatementMethods;
use crate::transpiler::collector::Collector;
use crate::transpiler::{Visitable, Visitor};

/// Builds one `DELETE` statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteManager {
    ast: DeleteStatement,
}

impl DeleteManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &DeleteStatement {
        &self.ast
    }

    pub fn into_ast(self) -> DeleteStatement {
        self.ast
    }

    /// Relation to delete from; a join source renders `DELETE left FROM ...`.
    pub fn from(mut self, relation: impl Into<Node>) -> Self {
        self.ast.relation = Some(relation.into());
        self
    }

    pub fn returning<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.ast.returning = exprs.into_iter().map(Into::into).collect();
        self
    }
}

impl StatementMethods for DeleteManager {
    fn clauses_mut(&mut self) -> &mut MutationClauses {
        &mut self.ast.clauses
    }
}

impl Visitable for DeleteManager {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
        visitor.visit_delete_statement(&self.ast, out)
    }
}
