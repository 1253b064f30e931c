//! Paginated fetch orchestration

use super::math;
use super::types::{PageRequest, PaginatedResult, PaginationOptions};
use super::validate::validate_options;
use crate::config::PaginatorConfig;
use crate::error::Result;
use crate::source::DataSource;

/// Runs one paginated fetch per call
///
/// Holds only its configuration, so a single paginator can serve
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginatorConfig,
}

impl Paginator {
    /// Create a paginator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paginator with the given configuration
    pub fn with_config(config: PaginatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Fetch the page described by `options` from `source`
    ///
    /// Options are validated before the source is touched. A source failure
    /// is logged once and returned unchanged.
    pub async fn paginate<T, S>(
        &self,
        source: &S,
        options: &PaginationOptions,
    ) -> Result<PaginatedResult<T>>
    where
        T: Send,
        S: DataSource<T> + ?Sized,
    {
        validate_options(options, self.config.page_policy)?;

        let limit = options.limit as u64;
        let request = PageRequest {
            skip: math::skip_for(options.page, limit),
            take: limit,
            filters: options.query.clone(),
            raw: options.is_raw_pagination,
        };

        tracing::debug!(
            page = options.page,
            skip = request.skip,
            take = request.take,
            raw = request.raw,
            "Fetching page"
        );

        let (items, total) = match source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, page = options.page, limit, "Failed to fetch page");
                return Err(e);
            }
        };

        let pages = math::page_metadata(
            options.page,
            total,
            limit,
            self.config.link_style,
            options.route.as_deref(),
        );

        Ok(PaginatedResult::new(items, total, limit, pages))
    }
}

/// Paginate with the default configuration
pub async fn paginate<T, S>(source: &S, options: &PaginationOptions) -> Result<PaginatedResult<T>>
where
    T: Send,
    S: DataSource<T> + ?Sized,
{
    Paginator::new().paginate(source, options).await
}
