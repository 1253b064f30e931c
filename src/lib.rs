// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagekit
//!
//! Offset pagination over pluggable data sources.
//!
//! A caller passes a page number, a page size and optional filters; the
//! [`Paginator`] validates them, asks a [`DataSource`](source::DataSource)
//! for one window of rows plus the total count, and returns the rows with
//! navigation metadata (current, last, next and previous page).
//!
//! ## Features
//!
//! - **Page math**: offsets, last page and neighbours as plain numbers or route links
//! - **Validation**: every violated field is reported as `at '<field>': <reason>`
//! - **Repository sources**: anything with a `find_and_count(skip, take, filters)` call
//! - **Query-builder sources**: chainable builders, including a raw mode that
//!   counts a grouped query by wrapping it as a sub-select
//! - **DuckDB**: a ready-made query builder over tables and SELECT statements
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagekit::database::{DatabaseEngine, SqlQuery};
//! use pagekit::source::BuilderSource;
//! use pagekit::{paginate, JsonObject, PaginationOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let engine = DatabaseEngine::open("shop.duckdb")?;
//!     let source = BuilderSource::new(SqlQuery::<JsonObject>::table(engine, "orders")?);
//!
//!     let options = PaginationOptions::new(2, 25).with_route("/orders");
//!     let page = paginate(&source, &options).await?;
//!
//!     println!("{} of {} rows", page.len(), page.total_rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Paginator                            │
//! │   validate → skip/take → fetch_page → page_metadata → result │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                  ┌────────────┴────────────┐
//!                  │        DataSource       │
//!          ┌───────┴────────┐       ┌────────┴────────┐
//!          │ RepositorySource│       │  BuilderSource  │
//!          │ find_and_count │       │ native / raw    │
//!          └────────────────┘       └────────┬────────┘
//!                                            │
//!                                    ┌───────┴───────┐
//!                                    │   SqlQuery    │
//!                                    │   (DuckDB)    │
//!                                    └───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paginator configuration
pub mod config;

/// Page math, validation and the paginator
pub mod pagination;

/// Data source adapters
pub mod source;

/// Database support via DuckDB
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FieldViolation, Result};
pub use types::*;

pub use config::{LinkStyle, PagePolicy, PaginatorConfig};
pub use pagination::{
    paginate, validate_options, PageLink, PageMetadata, PageRequest, PaginatedResult,
    PaginationOptions, Paginator,
};
pub use source::DataSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
