//! CLI module
//!
//! Command-line interface over the paginator.
//!
//! # Commands
//!
//! - `pages` - Compute page metadata for a row count
//! - `query` - Paginate a DuckDB table or SELECT statement
//! - `tables` - List tables in a DuckDB database

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
