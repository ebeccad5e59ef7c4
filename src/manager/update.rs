//! UPDATE builder.

use crate::ast::builders::build_quoted;
use crate::ast::{Attribute, BinaryOp, MutationClauses, Node, Operand, SqlLiteral, UpdateStatement};
use crate::error::ArelResult;
use crate::manager::StatementMethods;
use crate::transpiler::collector::Collector;
use crate::transpiler::{Visitable, Visitor};

/// Builds one `UPDATE` statement.
///
/// # Example
/// ```
/// use arel::prelude::*;
///
/// let users = Table::new("users");
/// let sql = UpdateManager::new()
///     .table(&users)
///     .set([(users.attr("name"), "nick")])
///     .filter(users.attr("id").eq(1))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, r#"UPDATE "users" SET "name" = 'nick' WHERE "users"."id" = 1"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateManager {
    ast: UpdateStatement,
}

impl UpdateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &UpdateStatement {
        &self.ast
    }

    pub fn into_ast(self) -> UpdateStatement {
        self.ast
    }

    /// Relation to update; a join source renders its joins too.
    pub fn table(mut self, relation: impl Into<Node>) -> Self {
        self.ast.relation = Some(relation.into());
        self
    }

    /// `SET "col" = value, ...`, values cast through their column.
    pub fn set<I, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Attribute, V)>,
        V: Into<Operand>,
    {
        self.ast.values = pairs
            .into_iter()
            .map(|(column, value)| {
                let value = build_quoted(value, Some(&column));
                Node::binary(BinaryOp::Assignment, Node::UnqualifiedColumn(column), value)
            })
            .collect();
        self
    }

    /// `SET <raw>`
    pub fn set_sql(mut self, raw: SqlLiteral) -> Self {
        self.ast.values = vec![Node::SqlLiteral(raw)];
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

impl StatementMethods for UpdateManager {
    fn clauses_mut(&mut self) -> &mut MutationClauses {
        &mut self.ast.clauses
    }
}

impl Visitable for UpdateManager {
    fn accept(&self, visitor: &Visitor<'_>, out: &mut dyn Collector) -> ArelResult<()> {
        visitor.visit_update_statement(&self.ast, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{OrderPredications, sql};
    use crate::ast::{JoinKind, JoinSource, Table};
    use crate::error::ArelError;
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_sql() {
        let users = Table::new("users");
        let manager = UpdateManager::new().table(&users).set_sql(sql("foo = bar"));
        assert_eq!(manager.to_sql().unwrap(), r#"UPDATE "users" SET foo = bar"#);
    }

    #[test]
    fn test_set_multiple_columns() {
        let users = Table::new("users");
        let manager = UpdateManager::new()
            .table(&users)
            .set([(users.attr("id"), Operand::from(1)), (users.attr("name"), Operand::from(None::<String>))]);
        assert_eq!(
            manager.to_sql().unwrap(),
            r#"UPDATE "users" SET "id" = 1, "name" = NULL"#
        );
    }

    #[test]
    fn test_limit_moves_into_subselect_without_inline_support() {
        let users = Table::new("users");
        let manager = UpdateManager::new()
            .table(&users)
            .set([(users.attr("name"), "x")])
            .key(users.attr("id"))
            .take(1);
        assert_eq!(
            manager.to_sql().unwrap(),
            r#"UPDATE "users" SET "name" = 'x' WHERE "users"."id" IN (SELECT "users"."id" FROM "users" LIMIT 1)"#
        );
    }

    #[test]
    fn test_mysql_keeps_order_and_limit_inline() {
        let users = Table::new("users");
        let manager = UpdateManager::new()
            .table(&users)
            .set([(users.attr("name"), "x")])
            .key(users.attr("id"))
            .order(users.attr("id").desc())
            .take(1);
        assert_eq!(
            manager.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "UPDATE `users` SET `name` = 'x' ORDER BY `users`.`id` DESC LIMIT 1"
        );
    }

    #[test]
    fn test_mysql_join_with_limit_uses_derived_table() {
        let users = Table::new("users");
        let posts = Table::new("posts");
        let source = JoinSource::pair(
            JoinKind::Inner,
            &users,
            &posts,
            Some(posts.attr("user_id").eq(users.attr("id"))),
        );
        let manager = UpdateManager::new()
            .table(source)
            .set([(users.attr("name"), "x")])
            .key(users.attr("id"))
            .take(5);
        assert_eq!(
            manager.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "UPDATE `users` SET `name` = 'x' WHERE `users`.`id` IN (SELECT `id` FROM (SELECT `users`.`id` FROM `users` INNER JOIN `posts` ON `posts`.`user_id` = `users`.`id` LIMIT 5) `__arel_temp`)"
        );
    }

    #[test]
    fn test_mysql_group_without_having_uses_derived_table() {
        let users = Table::new("users");
        let manager = UpdateManager::new()
            .table(&users)
            .set([(users.attr("name"), "x")])
            .key(users.attr("id"))
            .group(users.attr("name"));
        assert_eq!(
            manager.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "UPDATE `users` SET `name` = 'x' WHERE `users`.`id` IN (SELECT `id` FROM (SELECT DISTINCT `users`.`id` FROM `users` GROUP BY `users`.`name`) `__arel_temp`)"
        );
    }

    #[test]
    fn test_group_without_key_errors() {
        let users = Table::new("users");
        let err = UpdateManager::new()
            .table(&users)
            .set([(users.attr("name"), "x")])
            .group(users.attr("name"))
            .to_sql()
            .unwrap_err();
        assert!(matches!(err, ArelError::Argument(_)));
    }
}
