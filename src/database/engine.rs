//! DuckDB-based database engine
//!
//! Owns a single DuckDB connection. Statements run on Tokio's blocking pool
//! so async callers never block a runtime worker.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use duckdb::types::Value as DuckValue;
use duckdb::{params_from_iter, Connection};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Database engine using DuckDB
#[derive(Clone)]
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Arc<Mutex<Connection>>,
    /// Database location (for logging)
    location: String,
}

impl fmt::Debug for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseEngine")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl DatabaseEngine {
    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;

        Ok(Self::from_connection(conn, ":memory:"))
    }

    /// Open (or create) a database file
    ///
    /// `":memory:"` opens an in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open DuckDB database '{}': {e}",
                path.display()
            ))
        })?;

        Ok(Self::from_connection(conn, path.display().to_string()))
    }

    fn from_connection(conn: Connection, location: impl Into<String>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            location: location.into(),
        }
    }

    /// Where the database lives
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Execute one or more statements that return no rows
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.with_connection(|conn| conn.execute_batch(sql).map_err(Error::data_source))
    }

    /// Test the connection
    pub fn check_connection(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
                .map_err(|e| Error::config(format!("Connection check failed: {e}")))?;
            Ok(())
        })
    }

    /// Get list of tables in the main schema
    pub fn list_tables(&self) -> Result<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT table_name FROM information_schema.tables
                     WHERE table_schema = 'main'
                     ORDER BY table_name",
                )
                .map_err(Error::data_source)?;

            let tables = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(Error::data_source)?
                .filter_map(std::result::Result::ok)
                .collect();

            Ok(tables)
        })
    }

    /// Run `f` with the locked connection on the current thread
    fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::data_source("database connection lock poisoned"))?;
        f(&conn)
    }

    /// Run `f` with the locked connection on the blocking pool
    pub(crate) async fn run<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.with_connection(f))
            .await
            .map_err(Error::data_source)?
    }
}

// ============================================================================
// Statement helpers
// ============================================================================

/// Run a query and collect every row as a JSON object
pub(crate) fn query_rows(
    conn: &Connection,
    sql: &str,
    params: &[DuckValue],
) -> Result<Vec<JsonObject>> {
    tracing::debug!(sql, "Executing query");

    let mut stmt = conn.prepare(sql).map_err(Error::data_source)?;
    let mut rows = stmt
        .query(params_from_iter(params.iter()))
        .map_err(Error::data_source)?;

    let columns = rows
        .as_ref()
        .map(duckdb::Statement::column_names)
        .unwrap_or_default();

    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(Error::data_source)? {
        let mut record = JsonObject::new();
        for (idx, name) in columns.iter().enumerate() {
            let value: DuckValue = row.get(idx).map_err(Error::data_source)?;
            record.insert(name.clone(), duckdb_value_to_json(value));
        }
        records.push(record);
    }

    Ok(records)
}

/// Run a `SELECT COUNT(*)` style query
pub(crate) fn query_count(conn: &Connection, sql: &str, params: &[DuckValue]) -> Result<u64> {
    tracing::debug!(sql, "Executing count");

    let count: i64 = conn
        .query_row(sql, params_from_iter(params.iter()), |row| row.get(0))
        .map_err(Error::data_source)?;

    Ok(count.max(0) as u64)
}

// ============================================================================
// Value conversion
// ============================================================================

/// Convert a JSON filter value to a bindable DuckDB value
///
/// Arrays and objects have no scalar equivalent and are rejected.
pub(crate) fn json_to_duckdb_value(value: &JsonValue) -> Result<DuckValue> {
    match value {
        JsonValue::Null => Ok(DuckValue::Null),
        JsonValue::Bool(b) => Ok(DuckValue::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(DuckValue::BigInt(i))
            } else if let Some(u) = n.as_u64() {
                Ok(DuckValue::UBigInt(u))
            } else {
                Ok(DuckValue::Double(n.as_f64().unwrap_or_default()))
            }
        }
        JsonValue::String(s) => Ok(DuckValue::Text(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::data_source(format!(
            "unsupported filter value: {value}"
        ))),
    }
}

/// Convert DuckDB Value to JSON Value
pub(crate) fn duckdb_value_to_json(value: DuckValue) -> JsonValue {
    match value {
        DuckValue::Null => JsonValue::Null,
        DuckValue::Boolean(b) => JsonValue::Bool(b),
        DuckValue::TinyInt(i) => JsonValue::Number(i.into()),
        DuckValue::SmallInt(i) => JsonValue::Number(i.into()),
        DuckValue::Int(i) => JsonValue::Number(i.into()),
        DuckValue::BigInt(i) => JsonValue::Number(i.into()),
        DuckValue::HugeInt(i) => JsonValue::String(i.to_string()),
        DuckValue::UTinyInt(i) => JsonValue::Number(i.into()),
        DuckValue::USmallInt(i) => JsonValue::Number(i.into()),
        DuckValue::UInt(i) => JsonValue::Number(i.into()),
        DuckValue::UBigInt(i) => JsonValue::Number(i.into()),
        DuckValue::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        DuckValue::Double(f) => {
            serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
        }
        DuckValue::Text(s) => JsonValue::String(s),
        DuckValue::Blob(b) => JsonValue::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        DuckValue::Timestamp(_, i) => {
            // Microseconds since epoch
            let secs = i.div_euclid(1_000_000);
            let nsecs = (i.rem_euclid(1_000_000) * 1000) as u32;
            chrono::DateTime::from_timestamp(secs, nsecs).map_or(JsonValue::Number(i.into()), |dt| {
                JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
            })
        }
        DuckValue::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163).map_or(
                JsonValue::Number(d.into()),
                |date| JsonValue::String(date.format("%Y-%m-%d").to_string()),
            )
        }
        _ => JsonValue::String(format!("{value:?}")),
    }
}
