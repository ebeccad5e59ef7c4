use std::sync::Arc;

use arel::prelude::*;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn typed_users() -> Table {
    let caster = SchemaTypeCaster::new()
        .column("id", ColumnType::integer())
        .column("name", ColumnType::String)
        .alias_attribute("login", "name");
    Table::new("users").with_type_caster(Arc::new(caster))
}

#[test]
fn test_select_star() {
    let users = Table::new("users");
    let sql = users.project(star()).to_sql().expect("select renders");
    assert_eq!(sql, r#"SELECT * FROM "users""#);
}

#[test]
fn test_insert_update_delete_round() {
    init_tracing();
    let users = Table::new("users");

    let insert = InsertManager::new()
        .insert([(users.attr("name"), "nick")])
        .to_sql()
        .expect("insert renders");
    assert_eq!(insert, r#"INSERT INTO "users" ("name") VALUES ('nick')"#);

    let update = UpdateManager::new()
        .table(&users)
        .set([(users.attr("name"), "nick")])
        .filter(users.attr("id").eq(1))
        .to_sql()
        .expect("update renders");
    assert_eq!(update, r#"UPDATE "users" SET "name" = 'nick' WHERE "users"."id" = 1"#);

    let delete = DeleteManager::new()
        .from(&users)
        .filter(users.attr("id").eq(1))
        .to_sql()
        .expect("delete renders");
    assert_eq!(delete, r#"DELETE FROM "users" WHERE "users"."id" = 1"#);
}

#[test]
fn test_self_join() {
    let users = Table::new("users");
    let managers = users.alias();
    let sql = users
        .from()
        .project(users.attr("name"))
        .project(managers.attr("name"))
        .outer_join(managers.clone())
        .and_then(|m| m.on(managers.attr("id").eq(users.attr("manager_id"))))
        .expect("join builds")
        .to_sql()
        .expect("select renders");
    assert_eq!(
        sql,
        r#"SELECT "users"."name", "users_2"."name" FROM "users" LEFT OUTER JOIN "users" "users_2" ON "users_2"."id" = "users"."manager_id""#
    );
}

#[test]
fn test_or_grouping() {
    let users = Table::new("users");
    let a = users.attr("a");
    let sql = users
        .project(star())
        .filter(a.eq(1).or(a.eq(2)).and(a.eq(3)))
        .to_sql()
        .expect("select renders");
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE ("users"."a" = 1 OR "users"."a" = 2) AND "users"."a" = 3"#
    );
}

#[test]
fn test_between_inclusive_and_exclusive() {
    let age = Table::new("users").attr("age");
    assert_eq!(
        age.between(2..=5).to_sql().expect("renders"),
        r#""users"."age" BETWEEN 2 AND 5"#
    );
    assert_eq!(
        age.between(2..5).to_sql().expect("renders"),
        r#""users"."age" >= 2 AND "users"."age" < 5"#
    );
    assert_eq!(
        age.not_between(2..=5).to_sql().expect("renders"),
        r#"("users"."age" < 2 OR "users"."age" > 5)"#
    );
}

#[test]
fn test_type_caster_casts_and_bounds() {
    let users = typed_users();
    assert_eq!(
        users.attr("id").eq("42").to_sql().expect("renders"),
        r#""users"."id" = 42"#
    );
    // Out of range for a 4 byte integer column
    assert_eq!(users.attr("id").eq(4_294_967_296_i64).to_sql().expect("renders"), "1=0");
    assert_eq!(users.attr("id").not_eq(4_294_967_296_i64).to_sql().expect("renders"), "1=1");
    assert_eq!(
        users.attr("id").is_in(vec![1_i64, 4_294_967_296]).to_sql().expect("renders"),
        r#""users"."id" IN (1)"#
    );
    assert_eq!(
        users.attr("login").eq("nick").to_sql().expect("renders"),
        r#""users"."name" = 'nick'"#
    );
}

#[test]
fn test_between_with_unboundable_bounds() {
    let id = typed_users().attr("id");
    assert_eq!(id.between(4_294_967_296_i64..).to_sql().expect("renders"), "1=0");
    assert_eq!(id.between(..=-4_294_967_296_i64).to_sql().expect("renders"), "1=0");
    assert_eq!(
        id.between(-4_294_967_296_i64..=3).to_sql().expect("renders"),
        r#""users"."id" <= 3"#
    );
    assert_eq!(
        id.between(1..=4_294_967_296_i64).to_sql().expect("renders"),
        r#""users"."id" >= 1"#
    );
    assert_eq!(id.not_between(4_294_967_296_i64..).to_sql().expect("renders"), "1=1");
    assert_eq!(
        id.not_between(-4_294_967_296_i64..=3).to_sql().expect("renders"),
        r#""users"."id" > 3"#
    );
}

#[test]
fn test_connection_from_toml_config() {
    init_tracing();
    let config = ConnectionConfig::from_toml_str(
        r#"
        dialect = "mysql"
        prepared_statements = false
        "#,
    )
    .expect("config parses");
    let conn = DialectConnection::from_config(&config);
    let users = Table::new("users");
    let sql = users
        .project(star())
        .filter(users.attr("id").eq(bind(7)))
        .to_sql_with(&conn)
        .expect("select renders");
    assert_eq!(sql, "SELECT * FROM `users` WHERE `users`.`id` = 7");
}

#[test]
fn test_bad_config_is_reported() {
    let err = ConnectionConfig::from_toml_str("dialect = \"cobol\"").unwrap_err();
    assert!(matches!(err, ArelError::Config(_)));
}

#[test]
fn test_bound_sql_serializes() {
    let users = Table::new("users");
    let bound = users
        .project(star())
        .filter(users.attr("name").eq(bind("nick")))
        .to_bound_sql(&DialectConnection::new(Dialect::Postgres))
        .expect("select renders");
    let json = serde_json::to_value(&bound).expect("serializes");
    assert_eq!(json["sql"], r#"SELECT * FROM "users" WHERE "users"."name" = $1"#);
}

#[test]
fn test_managers_are_independent_after_clone() {
    let users = Table::new("users");
    let base = users.project(star());
    let filtered = base.clone().filter(users.attr("id").eq(1));
    assert_eq!(base.to_sql().expect("renders"), r#"SELECT * FROM "users""#);
    assert_eq!(
        filtered.to_sql().expect("renders"),
        r#"SELECT * FROM "users" WHERE "users"."id" = 1"#
    );
}
