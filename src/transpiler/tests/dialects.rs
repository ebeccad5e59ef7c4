//! SQL dialect tests (PostgreSQL, MySQL, SQLite, Oracle).

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use crate::ast::builders::{OrderPredications, Predications, bind, rollup, sql, star};
use crate::ast::{Node, Table, Value, ValuesTable};
use crate::error::ArelError;
use crate::transpiler::{Dialect, DialectConnection, ToSql};

#[test]
fn test_identifier_quoting() {
    let users = Table::new("users");
    let manager = users.from().project(users.attr("id"));
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "SELECT `users`.`id` FROM `users`"
    );
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        r#"SELECT "users"."id" FROM "users""#
    );
}

#[test]
fn test_schema_qualified_table() {
    let users = Table::new("public.users");
    assert_eq!(
        users.project(star()).to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "public"."users""#
    );
}

#[test]
fn test_boolean_literals() {
    let active = Table::new("users").attr("active");
    assert_eq!(
        active.eq(true).to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."active" = TRUE"#
    );
    assert_eq!(
        active.eq(true).to_sql_with_dialect(Dialect::SQLite).unwrap(),
        r#""users"."active" = 1"#
    );
    assert_eq!(Node::True.to_sql_with_dialect(Dialect::Oracle).unwrap(), "1=1");
}

#[test]
fn test_mysql_string_escaping() {
    let name = Table::new("users").attr("name");
    assert_eq!(
        name.eq("it's a \\ test").to_sql_with_dialect(Dialect::MySQL).unwrap(),
        r"`users`.`name` = 'it\'s a \\ test'"
    );
}

#[test]
fn test_offset_only_paging() {
    let users = Table::new("users");
    let manager = users.project(star()).skip(5);
    assert_eq!(manager.to_sql().unwrap(), r#"SELECT * FROM "users" OFFSET 5"#);
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET 5"
    );
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::SQLite).unwrap(),
        r#"SELECT * FROM "users" LIMIT -1 OFFSET 5"#
    );
}

#[test]
fn test_oracle_offset_fetch() {
    let users = Table::new("users");
    let manager = users.project(star()).take(10).skip(5);
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        r#"SELECT * FROM "users" OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY"#
    );
}

#[test]
fn test_oracle_limit_with_lock_errors() {
    let users = Table::new("users");
    let err = users
        .project(star())
        .take(1)
        .lock()
        .to_sql_with_dialect(Dialect::Oracle)
        .unwrap_err();
    assert!(matches!(err, ArelError::Argument(_)));
}

#[test]
fn test_sqlite_drops_lock() {
    let users = Table::new("users");
    assert_eq!(
        users.project(star()).lock().to_sql_with_dialect(Dialect::SQLite).unwrap(),
        r#"SELECT * FROM "users""#
    );
}

#[test]
fn test_distinct_on() {
    let users = Table::new("users");
    let manager = users
        .from()
        .project(users.attr("id"))
        .distinct_on([users.attr("email")]);
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#"SELECT DISTINCT ON ( "users"."email" ) "users"."id" FROM "users""#
    );
    let err = manager.to_sql_with_dialect(Dialect::MySQL).unwrap_err();
    assert!(matches!(err, ArelError::UnsupportedNode { node: "DistinctOn", .. }));
}

#[test]
fn test_matches_per_dialect() {
    let name = Table::new("users").attr("name");
    let node = name.matches("%a%");
    assert_eq!(
        node.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."name" ILIKE '%a%'"#
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "`users`.`name` LIKE '%a%'"
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        r#"LOWER("users"."name") LIKE LOWER('%a%')"#
    );
    assert_eq!(
        name.matches_with("a!%", Some("!"), true)
            .to_sql_with_dialect(Dialect::MySQL)
            .unwrap(),
        "`users`.`name` LIKE BINARY 'a!%' ESCAPE '!'"
    );
    assert_eq!(
        name.does_not_match("%a%").to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."name" NOT ILIKE '%a%'"#
    );
}

#[test]
fn test_regexp_per_dialect() {
    let name = Table::new("users").attr("name");
    assert_eq!(
        name.matches_regexp("^a", false).to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."name" ~* '^a'"#
    );
    assert_eq!(
        name.does_not_match_regexp("^a", true).to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "`users`.`name` NOT REGEXP '^a'"
    );
    let err = name
        .does_not_match_regexp("^a", true)
        .to_sql_with_dialect(Dialect::SQLite)
        .unwrap_err();
    assert!(matches!(err, ArelError::UnsupportedNode { node: "NotRegexp", .. }));
}

#[test]
fn test_distinct_from_per_dialect() {
    let a = Table::new("users").attr("a");
    let node = a.is_distinct_from(1);
    assert_eq!(
        node.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."a" IS DISTINCT FROM 1"#
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "NOT `users`.`a` <=> 1"
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::SQLite).unwrap(),
        r#""users"."a" IS NOT 1"#
    );
    assert_eq!(
        node.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        r#"DECODE("users"."a", 1, 0, 1) = 1"#
    );
    assert_eq!(
        node.to_sql().unwrap(),
        r#"CASE WHEN "users"."a" = 1 OR ("users"."a" IS NULL AND 1 IS NULL) THEN 0 ELSE 1 END = 1"#
    );
    assert_eq!(
        a.is_not_distinct_from(None::<i64>).to_sql().unwrap(),
        r#""users"."a" IS NULL"#
    );
}

#[test]
fn test_concat_per_dialect() {
    let first = Table::new("users").attr("first");
    let node = first.concat(" ");
    assert_eq!(node.to_sql().unwrap(), r#""users"."first" || ' '"#);
    assert_eq!(
        node.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "CONCAT(`users`.`first`, ' ')"
    );
}

#[test]
fn test_mysql_emulates_nulls_ordering() {
    let name = Table::new("users").attr("name");
    assert_eq!(
        name.asc().nulls_last().to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "`users`.`name` IS NULL, `users`.`name` ASC"
    );
    assert_eq!(
        name.desc().nulls_first().to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#""users"."name" DESC NULLS FIRST"#
    );
}

#[test]
fn test_placeholders() {
    let id = Table::new("users").attr("id");
    let node = id.eq(bind(1)).and(id.not_eq(bind(2)));
    for (dialect, expected) in [
        (Dialect::Postgres, r#""users"."id" = $1 AND "users"."id" != $2"#),
        (Dialect::Oracle, r#""users"."id" = :1 AND "users"."id" != :2"#),
        (Dialect::SQLite, r#""users"."id" = ? AND "users"."id" != ?"#),
    ] {
        let bound = node.to_bound_sql(&DialectConnection::new(dialect)).unwrap();
        assert_eq!(bound.sql, expected);
        assert_eq!(bound.binds, vec![Value::Int(1), Value::Int(2)]);
    }
}

#[test]
fn test_unprepared_connection_inlines_binds() {
    let id = Table::new("users").attr("id");
    let conn = DialectConnection::new(Dialect::Postgres).with_prepared_statements(false);
    assert_eq!(id.eq(bind("x")).to_sql_with(&conn).unwrap(), r#""users"."id" = 'x'"#);
}

#[test]
fn test_oracle_date_literal() {
    let born = Table::new("users").attr("born");
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_eq!(
        born.eq(date).to_sql_with_dialect(Dialect::Oracle).unwrap(),
        r#""users"."born" = DATE '2024-01-02'"#
    );
    assert_eq!(born.eq(date).to_sql().unwrap(), r#""users"."born" = '2024-01-02'"#);
}

#[test]
fn test_values_table_row_prefix() {
    let values = ValuesTable::new("t", vec![vec![Value::Int(1)], vec![Value::Int(2)]]).columns(["id"]);
    let sql_text = crate::manager::SelectManager::new()
        .project(star())
        .from(values)
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap();
    assert_eq!(sql_text, "SELECT * FROM (VALUES ROW(1), ROW(2)) `t` (`id`)");
    let sql_text = crate::manager::SelectManager::new()
        .project(star())
        .from(ValuesTable::new("t", vec![vec![1]]))
        .to_sql()
        .unwrap();
    assert_eq!(sql_text, r#"SELECT * FROM (VALUES (1)) "t""#);
}

#[test]
fn test_grouping_sets_only_on_postgres() {
    let users = Table::new("users");
    let manager = users
        .project(star())
        .group(rollup([users.attr("a"), users.attr("b")]));
    assert_eq!(
        manager.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "users" GROUP BY ROLLUP( "users"."a", "users"."b" )"#
    );
    let err = manager.to_sql_with_dialect(Dialect::MySQL).unwrap_err();
    assert!(matches!(err, ArelError::UnsupportedNode { node: "GroupingSet", .. }));
}

#[test]
fn test_raw_sql_is_verbatim_everywhere() {
    let users = Table::new("users");
    let manager = users.project(sql("max(id)"));
    assert_eq!(manager.to_sql_with_dialect(Dialect::MySQL).unwrap(), "SELECT max(id) FROM `users`");
}
