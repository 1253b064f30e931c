//! SQL query builder over a DuckDB engine

use super::engine::{json_to_duckdb_value, query_count, query_rows, DatabaseEngine};
use crate::error::{Error, Result};
use crate::source::QueryBuilder;
use crate::types::{JsonObject, JsonValue, SortOrder};
use async_trait::async_trait;
use duckdb::types::Value as DuckValue;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("table pattern is valid")
});

/// Where the rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum QuerySource {
    Table(String),
    Sql(String),
}

/// A query over a table or sub-select, returning rows as `T`
///
/// Rows are read as JSON objects keyed by column name and deserialized into
/// `T`, so `T = JsonObject` yields raw rows. `select`, `group_by` and
/// `order_by` take SQL fragments written by the caller; filter keys come
/// from requests and must be plain column names.
pub struct SqlQuery<T> {
    engine: DatabaseEngine,
    source: QuerySource,
    columns: Vec<String>,
    conditions: Vec<(String, JsonValue)>,
    group_by: Vec<String>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<u64>,
    offset: Option<u64>,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for SqlQuery<T> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            source: self.source.clone(),
            columns: self.columns.clone(),
            conditions: self.conditions.clone(),
            group_by: self.group_by.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            _row: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SqlQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlQuery")
            .field("engine", &self.engine)
            .field("source", &self.source)
            .field("conditions", &self.conditions)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl<T> SqlQuery<T> {
    fn with_source(engine: DatabaseEngine, source: QuerySource) -> Self {
        Self {
            engine,
            source,
            columns: Vec::new(),
            conditions: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _row: PhantomData,
        }
    }

    /// Query a table (optionally schema-qualified)
    pub fn table(engine: DatabaseEngine, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !TABLE_NAME.is_match(&table) {
            return Err(Error::config(format!("Invalid table name: '{table}'")));
        }
        Ok(Self::with_source(engine, QuerySource::Table(table)))
    }

    /// Query the rows of an arbitrary SELECT statement
    pub fn from_sql(engine: DatabaseEngine, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let sql = sql.trim().trim_end_matches(';').to_string();
        Self::with_source(engine, QuerySource::Sql(sql))
    }

    /// Select these expressions instead of `*`
    #[must_use]
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Group rows by these expressions
    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append a sort key
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    /// The engine this query runs on
    pub fn engine(&self) -> &DatabaseEngine {
        &self.engine
    }

    fn from_clause(&self) -> String {
        match &self.source {
            QuerySource::Table(table) => table.clone(),
            QuerySource::Sql(sql) => format!("({sql}) AS source_query"),
        }
    }

    fn where_clause(&self) -> Result<(String, Vec<DuckValue>)> {
        if self.conditions.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::new();
        for (column, value) in &self.conditions {
            if value.is_null() {
                clauses.push(format!("{column} IS NULL"));
            } else {
                clauses.push(format!("{column} = ?"));
                params.push(json_to_duckdb_value(value)?);
            }
        }

        Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
    }

    /// The SELECT statement, with or without LIMIT/OFFSET
    pub(crate) fn select_sql(&self, paged: bool) -> Result<(String, Vec<DuckValue>)> {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let (where_sql, params) = self.where_clause()?;

        let mut sql = format!("SELECT {columns} FROM {}{where_sql}", self.from_clause());

        if !self.group_by.is_empty() {
            sql = format!("{sql} GROUP BY {}", self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            let keys: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, order)| format!("{column} {order}"))
                .collect();
            sql = format!("{sql} ORDER BY {}", keys.join(", "));
        }

        if paged {
            if let Some(limit) = self.limit {
                sql = format!("{sql} LIMIT {limit}");
            }
            if let Some(offset) = self.offset {
                sql = format!("{sql} OFFSET {offset}");
            }
        }

        Ok((sql, params))
    }

    /// Count of the source rows matching the filters
    pub(crate) fn count_sql(&self) -> Result<(String, Vec<DuckValue>)> {
        let (where_sql, params) = self.where_clause()?;
        Ok((
            format!("SELECT COUNT(*) FROM {}{where_sql}", self.from_clause()),
            params,
        ))
    }

    /// Count of the rows the whole unpaged query returns
    pub(crate) fn wrapped_count_sql(&self) -> Result<(String, Vec<DuckValue>)> {
        let (select, params) = self.select_sql(false)?;
        Ok((
            format!("SELECT COUNT(*) FROM ({select}) AS paginated_count"),
            params,
        ))
    }
}

fn deserialize_rows<T: DeserializeOwned>(rows: Vec<JsonObject>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(JsonValue::Object(row)).map_err(Error::data_source))
        .collect()
}

#[async_trait]
impl<T> QueryBuilder<T> for SqlQuery<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn filter(mut self, filters: &JsonObject) -> Result<Self> {
        for (column, value) in filters {
            if !IDENTIFIER.is_match(column) {
                return Err(Error::data_source(format!(
                    "invalid filter column: '{column}'"
                )));
            }
            json_to_duckdb_value(value)?;
            self.conditions.push((column.clone(), value.clone()));
        }
        Ok(self)
    }

    fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    async fn fetch_and_count(&self) -> Result<(Vec<T>, u64)> {
        let (select, params) = self.select_sql(true)?;
        let (count, count_params) = self.count_sql()?;

        let (rows, total) = self
            .engine
            .run(move |conn| {
                let rows = query_rows(conn, &select, &params)?;
                let total = query_count(conn, &count, &count_params)?;
                Ok((rows, total))
            })
            .await?;

        Ok((deserialize_rows(rows)?, total))
    }

    async fn fetch(&self) -> Result<Vec<T>> {
        let (select, params) = self.select_sql(true)?;
        let rows = self
            .engine
            .run(move |conn| query_rows(conn, &select, &params))
            .await?;

        deserialize_rows(rows)
    }

    async fn count_wrapped(&self) -> Result<u64> {
        let (count, params) = self.wrapped_count_sql()?;
        self.engine
            .run(move |conn| query_count(conn, &count, &params))
            .await
    }
}
