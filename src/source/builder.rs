//! Query-builder data sources

use super::DataSource;
use crate::error::Result;
use crate::pagination::PageRequest;
use crate::types::JsonObject;
use async_trait::async_trait;

/// A fluent query that can be limited, offset and executed
///
/// Builders are values: each step consumes the builder and returns the
/// refined one, so a template can be cloned per request.
#[async_trait]
pub trait QueryBuilder<T: Send>: Clone + Send + Sync {
    /// Narrow the query with equality criteria
    fn filter(self, filters: &JsonObject) -> Result<Self>;

    /// Return at most `limit` rows
    #[must_use]
    fn limit(self, limit: u64) -> Self;

    /// Skip the first `offset` rows
    #[must_use]
    fn offset(self, offset: u64) -> Self;

    /// Run the query and count all matches with the builder's own count
    async fn fetch_and_count(&self) -> Result<(Vec<T>, u64)>;

    /// Run the query, rows only
    async fn fetch(&self) -> Result<Vec<T>>;

    /// Count the rows of the whole query wrapped as a sub-select
    async fn count_wrapped(&self) -> Result<u64>;
}

/// Adapts a [`QueryBuilder`] to [`DataSource`]
#[derive(Debug, Clone)]
pub struct BuilderSource<B> {
    template: B,
}

impl<B> BuilderSource<B> {
    /// Wrap a query template; every page starts from a clone of it
    pub fn new(template: B) -> Self {
        Self { template }
    }

    /// Borrow the query template
    pub fn template(&self) -> &B {
        &self.template
    }
}

#[async_trait]
impl<T, B> DataSource<T> for BuilderSource<B>
where
    T: Send,
    B: QueryBuilder<T>,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<(Vec<T>, u64)> {
        let mut query = self.template.clone();
        if let Some(filters) = &request.filters {
            query = query.filter(filters)?;
        }

        let paged = query.clone().limit(request.take).offset(request.skip);

        if request.raw {
            let items = paged.fetch().await?;
            let total = query.count_wrapped().await?;
            Ok((items, total))
        } else {
            paged.fetch_and_count().await
        }
    }
}
