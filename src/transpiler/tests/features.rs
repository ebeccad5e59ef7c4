//! CTEs, compound queries, windows, CASE, binds and raw SQL.

use pretty_assertions::assert_eq;

use crate::ast::builders::{
    AliasPredication, Expressions, OrderPredications, Predications, WindowPredications, case,
    current_row, frame_between, sql_with_binds, star, unbounded_preceding, window,
};
use crate::ast::{Cte, Operand, SetOpKind, SetOperation, Table};
use crate::manager::SelectManager;
use crate::transpiler::{Dialect, DialectConnection, ToSql};

fn minors(users: &Table) -> SelectManager {
    users.from().project(users.attr("id")).filter(users.attr("age").lt(18))
}

fn seniors(users: &Table) -> SelectManager {
    users.from().project(users.attr("id")).filter(users.attr("age").gt(65))
}

#[test]
fn test_with_cte_joined() {
    let users = Table::new("users");
    let posts = Table::new("posts");
    let recent = Table::new("recent");
    let subquery = posts
        .from()
        .project(posts.attr("user_id"))
        .filter(posts.attr("created_at").gt("2024-01-01"));
    let sql = users
        .from()
        .project(users.attr("name"))
        .with([Cte::new("recent", subquery)])
        .join(&recent)
        .and_then(|m| m.on(recent.attr("user_id").eq(users.attr("id"))))
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"WITH "recent" AS (SELECT "posts"."user_id" FROM "posts" WHERE "posts"."created_at" > '2024-01-01') SELECT "users"."name" FROM "users" INNER JOIN "recent" ON "recent"."user_id" = "users"."id""#
    );
}

#[test]
fn test_with_recursive_and_materialized() {
    let users = Table::new("users");
    let tree = Table::new("tree");
    let sql = tree
        .project(star())
        .with_recursive([Cte::new("tree", minors(&users)).materialized(false)])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"WITH RECURSIVE "tree" AS NOT MATERIALIZED (SELECT "users"."id" FROM "users" WHERE "users"."age" < 18) SELECT * FROM "tree""#
    );
}

#[test]
fn test_cte_from_subquery_alias() {
    let users = Table::new("users");
    let young = minors(&users).alias("young");
    let sql = Table::new("young").project(star()).with([young]).to_sql().unwrap();
    assert_eq!(
        sql,
        r#"WITH "young" AS (SELECT "users"."id" FROM "users" WHERE "users"."age" < 18) SELECT * FROM "young""#
    );
}

#[test]
fn test_union() {
    let users = Table::new("users");
    let sql = minors(&users).union(&seniors(&users)).to_sql().unwrap();
    assert_eq!(
        sql,
        r#"( SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 UNION SELECT "users"."id" FROM "users" WHERE "users"."age" > 65 )"#
    );
}

#[test]
fn test_union_all_chain_flattens() {
    let users = Table::new("users");
    let third = users.from().project(users.attr("id")).filter(users.attr("vip").eq(true));
    let chain = SetOperation::new(
        SetOpKind::UnionAll,
        minors(&users).union_all(&seniors(&users)),
        third.into_ast(),
    );
    assert_eq!(
        chain.to_sql().unwrap(),
        r#"( SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 UNION ALL SELECT "users"."id" FROM "users" WHERE "users"."age" > 65 UNION ALL SELECT "users"."id" FROM "users" WHERE "users"."vip" = TRUE )"#
    );
}

#[test]
fn test_union_side_with_limit_is_parenthesized() {
    let users = Table::new("users");
    let node = minors(&users).take(1).union(&seniors(&users));
    assert_eq!(
        node.to_sql().unwrap(),
        r#"( (SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 LIMIT 1) UNION SELECT "users"."id" FROM "users" WHERE "users"."age" > 65 )"#
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SQLite).unwrap(),
        r#"( SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 LIMIT 1 UNION SELECT "users"."id" FROM "users" WHERE "users"."age" > 65 )"#
    );
}

#[test]
fn test_intersect_renders_sides_as_is() {
    let users = Table::new("users");
    let node = minors(&users).intersect(&seniors(&users));
    assert_eq!(
        node.to_sql().unwrap(),
        r#"( SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 INTERSECT SELECT "users"."id" FROM "users" WHERE "users"."age" > 65 )"#
    );
}

#[test]
fn test_except() {
    let users = Table::new("users");
    let node = users.from().project(users.attr("id")).except(&minors(&users));
    assert_eq!(
        node.to_sql().unwrap(),
        r#"( SELECT "users"."id" FROM "users" EXCEPT SELECT "users"."id" FROM "users" WHERE "users"."age" < 18 )"#
    );
}

#[test]
fn test_window_function_with_frame() {
    let users = Table::new("users");
    let over = star().count(false).over_window(
        window()
            .partition(users.attr("team"))
            .order(users.attr("age").desc())
            .rows(Some(frame_between(unbounded_preceding(), current_row()))),
    );
    assert_eq!(
        over.to_sql().unwrap(),
        r#"COUNT(*) OVER (PARTITION BY "users"."team" ORDER BY "users"."age" DESC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"#
    );
    assert_eq!(users.attr("x").sum().over().to_sql().unwrap(), r#"SUM("users"."x") OVER ()"#);
}

#[test]
fn test_named_window() {
    let users = Table::new("users");
    let sql = users
        .from()
        .project(users.attr("id").count(false).over_named("w"))
        .window(window().order(users.attr("id").asc()).named("w"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT COUNT("users"."id") OVER "w" FROM "users" WINDOW "w" AS (ORDER BY "users"."id" ASC)"#
    );
}

#[test]
fn test_case_expressions() {
    let users = Table::new("users");
    let searched = case().when(users.attr("a").eq(1), "one").otherwise("other");
    assert_eq!(
        searched.to_sql().unwrap(),
        r#"CASE WHEN "users"."a" = 1 THEN 'one' ELSE 'other' END"#
    );
    let simple = users.attr("status").when(1, "on").otherwise("off");
    assert_eq!(
        simple.to_sql().unwrap(),
        r#"CASE "users"."status" WHEN 1 THEN 'on' ELSE 'off' END"#
    );
}

#[test]
fn test_aggregates_and_aliases() {
    let users = Table::new("users");
    let sql = users
        .from()
        .project(users.attr("name").alias("n"))
        .project(star().count(false).filter(users.attr("active").eq(true)))
        .project(users.attr("created_at").extract("year"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT "users"."name" AS "n", COUNT(*) FILTER (WHERE "users"."active" = TRUE), EXTRACT(YEAR FROM "users"."created_at") FROM "users""#
    );
}

#[test]
fn test_exists_alias_and_lateral() {
    let posts = Table::new("posts");
    let subquery = posts.from().project(posts.attr("id"));
    assert_eq!(
        subquery.exists().alias("has_posts").to_sql().unwrap(),
        r#"EXISTS (SELECT "posts"."id" FROM "posts") AS "has_posts""#
    );
    assert_eq!(
        subquery.lateral(Some("p")).to_sql().unwrap(),
        r#"LATERAL (SELECT "posts"."id" FROM "posts") "p""#
    );
    assert_eq!(
        subquery.lateral(None).to_sql().unwrap(),
        r#"LATERAL (SELECT "posts"."id" FROM "posts")"#
    );
}

#[test]
fn test_math_keeps_grouping() {
    let age = Table::new("users").attr("age");
    assert_eq!(((age.clone() + 1) * 2).to_sql().unwrap(), r#"("users"."age" + 1) * 2"#);
    assert_eq!((age.clone() & 4).to_sql().unwrap(), r#"("users"."age" & 4)"#);
    assert_eq!(age.bitwise_not().to_sql().unwrap(), r#"~ "users"."age""#);
}

#[test]
fn test_hints_and_comments() {
    let users = Table::new("users");
    let sql = users
        .from()
        .project(star())
        .optimizer_hints(["INDEX(users idx)"])
        .comment(["by report", "*/ injected"])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT /*+ INDEX(users idx) */ * FROM "users" /* by report */ /* * / injected */"#
    );
}

#[test]
fn test_sql_with_binds_in_where() {
    let users = Table::new("users");
    let node = sql_with_binds("id = ? AND name = ?", [Operand::from(1), Operand::from("x")]).unwrap();
    let manager = users.project(star()).filter(node);
    let bound = manager.to_bound_sql(&DialectConnection::new(Dialect::Postgres)).unwrap();
    assert_eq!(bound.sql, r#"SELECT * FROM "users" WHERE id = $1 AND name = $2"#);
    assert_eq!(bound.binds.len(), 2);
}

#[test]
fn test_json_contains() {
    let tags = Table::new("users").attr("tags");
    assert_eq!(
        tags.contains(serde_json::json!(["a"])).to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."tags" @> '["a"]'"#
    );
}
