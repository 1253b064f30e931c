//! Data sources
//!
//! A paginator never talks to storage directly. It asks a [`DataSource`]
//! for `take` rows after `skip` and gets back the rows plus the total number
//! of matching rows. Two adapters implement the trait:
//!
//! - [`RepositorySource`] wraps a [`Repository`] that accepts find options
//!   with `skip`/`take` and extra filter fields merged in.
//! - [`BuilderSource`] wraps a fluent [`QueryBuilder`] (`limit`/`offset`
//!   then a terminal fetch). In raw mode the total comes from a separate
//!   count over the query wrapped as a sub-select.

mod builder;
mod repository;

pub use builder::{BuilderSource, QueryBuilder};
pub use repository::{FindOptions, MemoryRepository, Repository, RepositorySource};

use crate::error::Result;
use crate::pagination::PageRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can return one page of rows plus a total count
#[async_trait]
pub trait DataSource<T: Send>: Send + Sync {
    /// Fetch `request.take` rows after `request.skip`, with the total count
    async fn fetch_page(&self, request: &PageRequest) -> Result<(Vec<T>, u64)>;
}

#[async_trait]
impl<T, S> DataSource<T> for Arc<S>
where
    T: Send,
    S: DataSource<T> + ?Sized,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<(Vec<T>, u64)> {
        (**self).fetch_page(request).await
    }
}
