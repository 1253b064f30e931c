//! Pagination types
//!
//! Defines the request options, the metadata computed for a page and the
//! result shape returned to callers.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// ============================================================================
// Options
// ============================================================================

/// Options for a single paginated fetch
///
/// `page` is one-based as seen by the caller. Values `<= 0` are accepted and
/// treated as the first page unless the strict page policy is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    /// Rows per page, must be greater than 0
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub limit: i64,

    /// Requested page
    pub page: i64,

    /// Extra filter criteria passed through to the data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<JsonObject>,

    /// Base route for link-style navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Count the total by wrapping the query as a sub-select
    #[serde(default)]
    pub is_raw_pagination: bool,
}

impl PaginationOptions {
    /// Create options for a page of `limit` rows
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            limit,
            page,
            ..Default::default()
        }
    }

    /// Attach filter criteria
    #[must_use]
    pub fn with_query(mut self, query: JsonObject) -> Self {
        self.query = Some(query);
        self
    }

    /// Attach a base route for link-style navigation
    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Toggle raw pagination
    #[must_use]
    pub fn raw(mut self, raw: bool) -> Self {
        self.is_raw_pagination = raw;
        self
    }
}

// ============================================================================
// Data source request
// ============================================================================

/// What a data source is asked to return
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    /// Rows to skip
    pub skip: u64,
    /// Rows to take
    pub take: u64,
    /// Extra filter criteria
    pub filters: Option<JsonObject>,
    /// Compute the total with a wrapped count query
    pub raw: bool,
}

impl PageRequest {
    /// Create a request for `take` rows after `skip`
    pub fn new(skip: u64, take: u64) -> Self {
        Self {
            skip,
            take,
            ..Default::default()
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// A navigable neighbour page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageLink {
    /// One-based page number
    Number(u64),
    /// Route with the page appended as a query parameter
    Route(String),
}

impl PageLink {
    /// Page number, if this is a numeric link
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Route(_) => None,
        }
    }

    /// Route string, if this is a route link
    pub fn as_route(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Route(route) => Some(route),
        }
    }
}

impl From<u64> for PageLink {
    fn from(page: u64) -> Self {
        Self::Number(page)
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Route(route) => f.write_str(route),
        }
    }
}

/// Navigation metadata for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub current_page: Option<u64>,
    pub last_page: Option<u64>,
    pub next_page: Option<PageLink>,
    pub previous_page: Option<PageLink>,
}

impl PageMetadata {
    /// Metadata for an empty result set: last page `0`, nothing else set
    pub fn empty() -> Self {
        Self {
            last_page: Some(0),
            ..Self::default()
        }
    }

    /// Whether this describes an empty result set
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

// ============================================================================
// Result
// ============================================================================

/// One page of items plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Number of items on this page
    pub result_length: u64,
    /// Rows matching the query across all pages
    pub total_rows: u64,
    /// Page size that was requested
    pub limit_rows: u64,
    /// Navigation metadata
    pub pages: PageMetadata,
}

impl<T> PaginatedResult<T> {
    /// Assemble a page, deriving `result_length` from `items`
    pub fn new(items: Vec<T>, total_rows: u64, limit_rows: u64, pages: PageMetadata) -> Self {
        Self {
            result_length: items.len() as u64,
            items,
            total_rows,
            limit_rows,
            pages,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping totals and metadata
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            result_length: self.result_length,
            total_rows: self.total_rows,
            limit_rows: self.limit_rows,
            pages: self.pages,
        }
    }
}
