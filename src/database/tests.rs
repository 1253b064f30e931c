//! Tests for database module

use super::engine::{duckdb_value_to_json, json_to_duckdb_value};
use super::*;
use crate::pagination::{PageLink, PageRequest, PaginatedResult, PaginationOptions, Paginator};
use crate::source::{BuilderSource, DataSource, QueryBuilder};
use crate::types::{JsonObject, SortOrder};
use duckdb::types::Value as DuckValue;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct User {
    id: i64,
    name: String,
    city: String,
}

/// In-memory database with 100 users spread over 3 cities
fn seeded_engine() -> DatabaseEngine {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    engine
        .execute_batch(
            "CREATE TABLE users AS
             SELECT i::BIGINT AS id,
                    'user-' || CAST(i AS VARCHAR) AS name,
                    CASE i % 3 WHEN 0 THEN 'Lisbon' WHEN 1 THEN 'Porto' ELSE 'Faro' END AS city
             FROM range(1, 101) t(i);",
        )
        .unwrap();
    engine
}

fn users(engine: &DatabaseEngine) -> SqlQuery<User> {
    SqlQuery::table(engine.clone(), "users")
        .unwrap()
        .order_by("id", SortOrder::Asc)
}

fn filters(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Engine Tests
// ============================================================================

#[test]
fn test_engine_check_connection() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    assert!(engine.check_connection().is_ok());
    assert_eq!(engine.location(), ":memory:");
}

#[test]
fn test_engine_list_tables() {
    let engine = seeded_engine();
    engine.execute_batch("CREATE TABLE audit (id INTEGER);").unwrap();

    let tables = engine.list_tables().unwrap();
    assert_eq!(tables, vec!["audit".to_string(), "users".to_string()]);
}

#[test]
fn test_engine_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagekit.duckdb");

    let engine = DatabaseEngine::open(&path).unwrap();
    engine.execute_batch("CREATE TABLE t (id INTEGER);").unwrap();
    assert_eq!(engine.list_tables().unwrap(), vec!["t".to_string()]);
    assert!(path.exists());
}

#[test]
fn test_engine_bad_sql_is_data_source_error() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    let err = engine.execute_batch("SELEC nonsense").unwrap_err();
    assert!(err.is_data_source());
}

// ============================================================================
// Value Conversion Tests
// ============================================================================

#[test]
fn test_duckdb_value_to_json() {
    assert_eq!(duckdb_value_to_json(DuckValue::Null), Value::Null);
    assert_eq!(duckdb_value_to_json(DuckValue::Boolean(true)), json!(true));
    assert_eq!(duckdb_value_to_json(DuckValue::Int(42)), json!(42));
    assert_eq!(duckdb_value_to_json(DuckValue::Double(1.5)), json!(1.5));
    assert_eq!(
        duckdb_value_to_json(DuckValue::Text("hello".to_string())),
        json!("hello")
    );
    assert_eq!(
        duckdb_value_to_json(DuckValue::Blob(b"hi".to_vec())),
        json!("aGk=")
    );
}

#[test]
fn test_json_to_duckdb_value() {
    assert_eq!(
        json_to_duckdb_value(&json!(true)).unwrap(),
        DuckValue::Boolean(true)
    );
    assert_eq!(
        json_to_duckdb_value(&json!(-7)).unwrap(),
        DuckValue::BigInt(-7)
    );
    assert_eq!(
        json_to_duckdb_value(&json!("Porto")).unwrap(),
        DuckValue::Text("Porto".to_string())
    );
    assert!(json_to_duckdb_value(&json!([1, 2])).unwrap_err().is_data_source());
    assert!(json_to_duckdb_value(&json!({"a": 1})).is_err());
}

// ============================================================================
// SQL Generation Tests
// ============================================================================

#[test]
fn test_select_sql_paged() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    let query = SqlQuery::<JsonObject>::table(engine, "users")
        .unwrap()
        .order_by("id", SortOrder::Desc)
        .filter(&filters(json!({"city": "Porto"})))
        .unwrap()
        .limit(6)
        .offset(12);

    let (sql, params) = query.select_sql(true).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE city = ? ORDER BY id DESC LIMIT 6 OFFSET 12"
    );
    assert_eq!(params, vec![DuckValue::Text("Porto".to_string())]);

    let (sql, _) = query.select_sql(false).unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE city = ? ORDER BY id DESC");
}

#[test]
fn test_count_sql_variants() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    let query = SqlQuery::<JsonObject>::from_sql(
        engine,
        "SELECT city, COUNT(*) AS n FROM users GROUP BY city;",
    )
    .filter(&filters(json!({"city": null})))
    .unwrap()
    .limit(2);

    let (sql, params) = query.count_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(*) FROM (SELECT city, COUNT(*) AS n FROM users GROUP BY city) AS source_query WHERE city IS NULL"
    );
    assert!(params.is_empty());

    let (sql, _) = query.wrapped_count_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(*) FROM (SELECT * FROM (SELECT city, COUNT(*) AS n FROM users GROUP BY city) AS source_query WHERE city IS NULL) AS paginated_count"
    );
}

#[test]
fn test_invalid_table_name() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    assert!(SqlQuery::<JsonObject>::table(engine.clone(), "main.users").is_ok());
    assert!(SqlQuery::<JsonObject>::table(engine, "users; DROP TABLE users").is_err());
}

#[test]
fn test_invalid_filter_column() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    let err = SqlQuery::<JsonObject>::table(engine, "users")
        .unwrap()
        .filter(&filters(json!({"id = 1 OR 1": 1})))
        .unwrap_err();
    assert!(err.is_data_source());
}

// ============================================================================
// Query Execution Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_and_count() {
    let engine = seeded_engine();
    let (rows, total) = users(&engine)
        .limit(3)
        .offset(6)
        .fetch_and_count()
        .await
        .unwrap();

    assert_eq!(total, 100);
    assert_eq!(
        rows,
        vec![
            User {
                id: 7,
                name: "user-7".to_string(),
                city: "Porto".to_string()
            },
            User {
                id: 8,
                name: "user-8".to_string(),
                city: "Faro".to_string()
            },
            User {
                id: 9,
                name: "user-9".to_string(),
                city: "Lisbon".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_count_wrapped_counts_groups() {
    let engine = seeded_engine();
    let query = SqlQuery::<JsonObject>::table(engine, "users")
        .unwrap()
        .select(["city", "COUNT(*) AS residents"])
        .group_by(["city"])
        .order_by("city", SortOrder::Asc);

    assert_eq!(query.count_wrapped().await.unwrap(), 3);

    let rows = query.limit(2).fetch().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["city"], json!("Faro"));
    assert_eq!(rows[0]["residents"], json!(33));
}

#[tokio::test]
async fn test_fetch_missing_table_is_data_source_error() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    let err = SqlQuery::<JsonObject>::table(engine, "missing")
        .unwrap()
        .fetch()
        .await
        .unwrap_err();
    assert!(err.is_data_source());
}

// ============================================================================
// Builder Source Tests
// ============================================================================

#[tokio::test]
async fn test_builder_source_applies_skip_and_filters() {
    let engine = seeded_engine();
    let source = BuilderSource::new(users(&engine));

    let request = PageRequest {
        skip: 2,
        take: 2,
        filters: Some(filters(json!({"city": "Lisbon"}))),
        raw: false,
    };

    let (rows, total): (Vec<User>, u64) = source.fetch_page(&request).await.unwrap();
    assert_eq!(total, 33);
    assert_eq!(rows.iter().map(|u| u.id).collect::<Vec<_>>(), vec![9, 12]);
}

#[tokio::test]
async fn test_builder_source_raw_mode() {
    let engine = seeded_engine();
    let grouped = SqlQuery::<JsonObject>::table(engine, "users")
        .unwrap()
        .select(["city", "COUNT(*) AS residents"])
        .group_by(["city"])
        .order_by("city", SortOrder::Asc);
    let source = BuilderSource::new(grouped);

    let request = PageRequest {
        skip: 0,
        take: 2,
        filters: None,
        raw: true,
    };

    let (rows, total): (Vec<JsonObject>, u64) = source.fetch_page(&request).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_paginate_sql_table() {
    let engine = seeded_engine();
    let source = BuilderSource::new(users(&engine));

    let result: PaginatedResult<User> = Paginator::new()
        .paginate(&source, &PaginationOptions::new(17, 6))
        .await
        .unwrap();

    assert_eq!(result.total_rows, 100);
    assert_eq!(result.len(), 4);
    assert_eq!(result.items[0].id, 97);
    assert_eq!(result.pages.last_page, Some(17));
    assert_eq!(result.pages.next_page, None);
    assert_eq!(result.pages.previous_page, Some(PageLink::Number(16)));
}

#[tokio::test]
async fn test_paginate_sql_beyond_last_page() {
    let engine = seeded_engine();
    let source = BuilderSource::new(users(&engine));

    let result: PaginatedResult<User> = Paginator::new()
        .paginate(&source, &PaginationOptions::new(50, 6))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.total_rows, 100);
    assert_eq!(result.pages.next_page, None);
    assert_eq!(result.pages.previous_page, None);
}

#[tokio::test]
async fn test_paginate_sql_raw_grouped() {
    let engine = seeded_engine();
    let grouped = SqlQuery::<JsonObject>::from_sql(
        engine,
        "SELECT city, COUNT(*) AS residents FROM users GROUP BY city",
    )
    .order_by("city", SortOrder::Asc);
    let source = BuilderSource::new(grouped);

    let options = PaginationOptions::new(2, 2).raw(true);
    let result: PaginatedResult<JsonObject> =
        Paginator::new().paginate(&source, &options).await.unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(result.len(), 1);
    assert_eq!(result.items[0]["city"], json!("Porto"));
    assert_eq!(result.pages.current_page, Some(2));
    assert_eq!(result.pages.last_page, Some(2));
    assert_eq!(result.pages.previous_page, Some(PageLink::Number(1)));
}
