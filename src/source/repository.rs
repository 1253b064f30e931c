//! Repository-style data sources

use super::DataSource;
use crate::error::{Error, Result};
use crate::pagination::PageRequest;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Find Options
// ============================================================================

/// Options handed to a repository's `find_and_count`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Rows to skip
    pub skip: u64,
    /// Rows to take
    pub take: u64,
    /// Extra filter fields
    pub filters: Option<JsonObject>,
}

impl FindOptions {
    /// Create find options without filters
    pub fn new(skip: u64, take: u64) -> Self {
        Self {
            skip,
            take,
            filters: None,
        }
    }

    /// Merged object `{ "skip", "take", ...filters }`
    ///
    /// Filter keys named `skip` or `take` are ignored.
    pub fn to_json(&self) -> JsonValue {
        let mut merged = JsonObject::new();
        merged.insert("skip".to_string(), self.skip.into());
        merged.insert("take".to_string(), self.take.into());
        if let Some(filters) = &self.filters {
            for (key, value) in filters {
                if key != "skip" && key != "take" {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        JsonValue::Object(merged)
    }
}

impl From<&PageRequest> for FindOptions {
    fn from(request: &PageRequest) -> Self {
        Self {
            skip: request.skip,
            take: request.take,
            filters: request.filters.clone(),
        }
    }
}

// ============================================================================
// Repository
// ============================================================================

/// A repository that can find a window of rows and count all matches
#[async_trait]
pub trait Repository<T: Send>: Send + Sync {
    /// Return the rows selected by `options` and the unpaged match count
    async fn find_and_count(&self, options: FindOptions) -> Result<(Vec<T>, u64)>;
}

/// Adapts a [`Repository`] to [`DataSource`]
///
/// Repositories always count with their own capability, so the raw flag of a
/// request has no effect here.
#[derive(Debug, Clone)]
pub struct RepositorySource<R> {
    repository: R,
}

impl<R> RepositorySource<R> {
    /// Wrap a repository
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Borrow the wrapped repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Unwrap the repository
    pub fn into_inner(self) -> R {
        self.repository
    }
}

#[async_trait]
impl<T, R> DataSource<T> for RepositorySource<R>
where
    T: Send,
    R: Repository<T>,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<(Vec<T>, u64)> {
        self.repository
            .find_and_count(FindOptions::from(request))
            .await
    }
}

// ============================================================================
// In-memory repository
// ============================================================================

/// Repository over a `Vec` held in memory
///
/// Filters match by equality against the top-level fields of each item's
/// JSON form. Every call is counted and the last options are kept, which
/// makes this handy as a test double.
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    items: Vec<T>,
    calls: AtomicUsize,
    last_options: Mutex<Option<FindOptions>>,
}

impl<T> MemoryRepository<T> {
    /// Create a repository holding `items`
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// All stored items
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of `find_and_count` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Options passed to the most recent `find_and_count`
    pub fn last_options(&self) -> Option<FindOptions> {
        self.last_options
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl<T: Serialize> MemoryRepository<T> {
    fn matches(item: &T, filters: &JsonObject) -> Result<bool> {
        let value = serde_json::to_value(item).map_err(Error::data_source)?;
        let JsonValue::Object(fields) = value else {
            return Err(Error::data_source(
                "filters require items that serialize to JSON objects",
            ));
        };

        Ok(filters
            .iter()
            .all(|(key, expected)| fields.get(key).unwrap_or(&JsonValue::Null) == expected))
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Serialize + Clone + Send + Sync,
{
    async fn find_and_count(&self, options: FindOptions) -> Result<(Vec<T>, u64)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }

        let matching: Vec<&T> = match &options.filters {
            Some(filters) if !filters.is_empty() => {
                let mut matching = Vec::new();
                for item in &self.items {
                    if Self::matches(item, filters)? {
                        matching.push(item);
                    }
                }
                matching
            }
            _ => self.items.iter().collect(),
        };

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(options.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(options.take).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }
}
