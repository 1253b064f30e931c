//! CLI commands and argument parsing

use crate::config::LinkStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Offset pagination for DuckDB tables and queries
#[derive(Parser, Debug)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paginator configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured link style
    #[arg(long, global = true)]
    pub link_style: Option<LinkStyle>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute page metadata for a row count
    Pages {
        /// Total number of rows
        #[arg(long)]
        total: u64,

        /// Rows per page (defaults to the configured default_limit)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Requested page
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Base route for link-style navigation
        #[arg(long)]
        route: Option<String>,
    },

    /// Paginate a table or query
    Query {
        /// DuckDB database file (or :memory:)
        #[arg(short, long, default_value = ":memory:")]
        database: PathBuf,

        /// Table to paginate
        #[arg(long, conflicts_with = "sql", required_unless_present = "sql")]
        table: Option<String>,

        /// SELECT statement to paginate
        #[arg(long)]
        sql: Option<String>,

        /// Rows per page (defaults to the configured default_limit)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Requested page
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Equality filters as a JSON object
        #[arg(long)]
        filter_json: Option<String>,

        /// Base route for link-style navigation
        #[arg(long)]
        route: Option<String>,

        /// Count the total by wrapping the query as a sub-select
        #[arg(long)]
        raw: bool,

        /// Column to sort by
        #[arg(long)]
        order_by: Option<String>,

        /// Sort descending
        #[arg(long, requires = "order_by")]
        desc: bool,
    },

    /// List tables in a database
    Tables {
        /// DuckDB database file
        #[arg(short, long)]
        database: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
