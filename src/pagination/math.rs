//! Page arithmetic
//!
//! Pure functions converting between the one-based pages callers see and
//! the zero-based offsets data sources need.

use super::types::{PageLink, PageMetadata};
use crate::config::LinkStyle;

/// Zero-based page index used to compute the skip count
///
/// Any `page <= 0` maps to `0`.
pub fn offset_page(page: i64) -> u64 {
    if page <= 0 {
        0
    } else {
        (page - 1) as u64
    }
}

/// One-based page number reported back to the caller
///
/// Any `page <= 0` maps to `1`.
pub fn display_page(page: i64) -> u64 {
    if page <= 0 {
        1
    } else {
        page as u64
    }
}

/// Rows to skip for `page` with pages of `limit` rows
pub fn skip_for(page: i64, limit: u64) -> u64 {
    offset_page(page).saturating_mul(limit)
}

/// Number of pages needed to hold `total_rows`, `0` for an empty set
pub fn last_page(total_rows: u64, limit: u64) -> u64 {
    if total_rows == 0 || limit == 0 {
        return 0;
    }
    total_rows.div_ceil(limit)
}

/// Following page, if `display` is before the last page
pub fn next_page(display: u64, last: u64) -> Option<u64> {
    (display < last).then(|| display + 1)
}

/// Preceding page, if `display` lies in `2..=last`
pub fn previous_page(display: u64, last: u64) -> Option<u64> {
    (display > 1 && display <= last).then(|| display - 1)
}

/// `"{route}?page={page}"`
pub fn route_link(route: &str, page: u64) -> String {
    format!("{route}?page={page}")
}

/// Render a neighbour page in the configured style
///
/// `Auto` links to the route when one is given and falls back to the
/// number. Route style without a route yields `None`.
pub fn link(page: Option<u64>, style: LinkStyle, route: Option<&str>) -> Option<PageLink> {
    let page = page?;
    match (style, route) {
        (LinkStyle::Number, _) | (LinkStyle::Auto, None) => Some(PageLink::Number(page)),
        (LinkStyle::Auto | LinkStyle::Route, Some(route)) => {
            Some(PageLink::Route(route_link(route, page)))
        }
        (LinkStyle::Route, None) => None,
    }
}

/// Full navigation metadata for a requested page
pub fn page_metadata(
    page: i64,
    total_rows: u64,
    limit: u64,
    style: LinkStyle,
    route: Option<&str>,
) -> PageMetadata {
    if total_rows == 0 {
        return PageMetadata::empty();
    }

    let last = last_page(total_rows, limit);
    let current = display_page(page);

    PageMetadata {
        current_page: Some(current),
        last_page: Some(last),
        next_page: link(next_page(current, last), style, route),
        previous_page: link(previous_page(current, last), style, route),
    }
}
