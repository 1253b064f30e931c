//! CLI runner - executes commands

use super::commands::{Cli, Commands, OutputFormat};
use crate::config::PaginatorConfig;
use crate::database::{DatabaseEngine, SqlQuery};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{math, validate_options, PaginationOptions, Paginator};
use crate::source::BuilderSource;
use crate::types::{JsonObject, JsonValue, SortOrder};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command and print its output to stdout
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        println!("{output}");
        Ok(())
    }

    /// Run the command and return its rendered output
    pub async fn execute(&self) -> Result<String> {
        let config = self.load_config()?;

        let value = match &self.cli.command {
            Commands::Pages {
                total,
                limit,
                page,
                route,
            } => self.pages(&config, *total, *limit, *page, route.as_deref())?,
            Commands::Query {
                database,
                table,
                sql,
                limit,
                page,
                filter_json,
                route,
                raw,
                order_by,
                desc,
            } => {
                let query = QueryArgs {
                    database,
                    table: table.as_deref(),
                    sql: sql.as_deref(),
                    order_by: order_by.as_deref(),
                    desc: *desc,
                };
                let mut options =
                    PaginationOptions::new(*page, resolve_limit(&config, *limit)).raw(*raw);
                if let Some(filter_json) = filter_json {
                    options = options.with_query(parse_filters(filter_json)?);
                }
                if let Some(route) = route {
                    options = options.with_route(route.clone());
                }
                Self::query(config, &query, &options).await?
            }
            Commands::Tables { database } => Self::tables(database)?,
        };

        self.render(&value)
    }

    fn load_config(&self) -> Result<PaginatorConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading paginator config");
                PaginatorConfig::from_file(path)?
            }
            None => PaginatorConfig::default(),
        };

        if let Some(style) = self.cli.link_style {
            config = config.with_link_style(style);
        }
        Ok(config)
    }

    fn pages(
        &self,
        config: &PaginatorConfig,
        total: u64,
        limit: Option<i64>,
        page: i64,
        route: Option<&str>,
    ) -> Result<JsonValue> {
        let mut options = PaginationOptions::new(page, resolve_limit(config, limit));
        if let Some(route) = route {
            options = options.with_route(route);
        }
        let options = validate_options(&options, config.page_policy)?;

        // validated limit is >= 1
        let limit = options.limit.unsigned_abs();
        let pages = math::page_metadata(
            options.page,
            total,
            limit,
            config.link_style,
            options.route.as_deref(),
        );

        tracing::debug!(total, limit, page, "Computed page metadata");

        Ok(json!({
            "totalRows": total,
            "limitRows": limit,
            "skip": math::skip_for(options.page, limit),
            "pages": pages,
        }))
    }

    async fn query(
        config: PaginatorConfig,
        args: &QueryArgs<'_>,
        options: &PaginationOptions,
    ) -> Result<JsonValue> {
        let engine = open_database(args.database)?;

        let mut query = match (args.table, args.sql) {
            (Some(table), _) => SqlQuery::<JsonObject>::table(engine, table)?,
            (None, Some(sql)) => SqlQuery::from_sql(engine, sql),
            (None, None) => return Err(Error::config("Either --table or --sql is required")),
        };
        if let Some(column) = args.order_by {
            let order = if args.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            query = query.order_by(column, order);
        }

        let source = BuilderSource::new(query);
        let result = Paginator::with_config(config)
            .paginate(&source, options)
            .await?;

        tracing::info!(
            rows = result.len(),
            total = result.total_rows,
            "Fetched page"
        );

        Ok(serde_json::to_value(result)?)
    }

    fn tables(database: &Path) -> Result<JsonValue> {
        if !database.exists() {
            return Err(Error::FileNotFound {
                path: database.display().to_string(),
            });
        }

        let engine = open_database(database)?;
        let tables = engine.list_tables()?;
        Ok(json!({ "tables": tables }))
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let output = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(output)
    }
}

struct QueryArgs<'a> {
    database: &'a Path,
    table: Option<&'a str>,
    sql: Option<&'a str>,
    order_by: Option<&'a str>,
    desc: bool,
}

fn open_database(path: &Path) -> Result<DatabaseEngine> {
    DatabaseEngine::open(path)
        .with_context(|| format!("Failed to open database '{}'", path.display()))
}

fn resolve_limit(config: &PaginatorConfig, limit: Option<i64>) -> i64 {
    limit.unwrap_or_else(|| i64::try_from(config.default_limit).unwrap_or(i64::MAX))
}

fn parse_filters(raw: &str) -> Result<JsonObject> {
    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(filters) => Ok(filters),
        other => Err(Error::config(format!(
            "--filter-json must be a JSON object, got: {other}"
        ))),
    }
}
