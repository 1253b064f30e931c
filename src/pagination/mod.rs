//! Pagination module
//!
//! Offset pagination over any [`DataSource`](crate::source::DataSource).
//!
//! # Overview
//!
//! - [`math`] converts one-based pages into skip offsets and derives the
//!   last, next and previous pages.
//! - [`Paginator`] validates options, asks the data source for one window
//!   of rows plus the total, and shapes the [`PaginatedResult`].
//!
//! Pages `<= 0` are clamped: the skip offset starts at 0 and the reported
//! current page is 1. A page past the last one yields no items and no
//! navigable neighbours.

pub mod math;
mod paginator;
mod types;
mod validate;

pub use paginator::{paginate, Paginator};
pub use types::{PageLink, PageMetadata, PageRequest, PaginatedResult, PaginationOptions};
pub use validate::validate_options;
