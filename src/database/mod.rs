//! Database support via DuckDB
//!
//! [`SqlQuery`] implements [`QueryBuilder`](crate::source::QueryBuilder), so a
//! table or SELECT statement can be paginated through
//! [`BuilderSource`](crate::source::BuilderSource).

mod engine;
mod query;

pub use engine::DatabaseEngine;
pub use query::SqlQuery;

#[cfg(test)]
mod tests;
